use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client, Database};
use std::time::Duration;
use tracing::{error, info, warn};

use super::MongoConfig;

/// Error type for MongoDB operations
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("No MongoDB connection string configured")]
    NotConfigured,
}

/// Build a client from the config without touching the network.
///
/// The driver connects lazily on first operation, so this returns quickly
/// even when the deployment is unreachable. Only URI parsing can fail here.
pub async fn build_client(config: &MongoConfig) -> Result<Client, MongoError> {
    let uri = config.uri().ok_or(MongoError::NotConfigured)?;

    let mut options = ClientOptions::parse(uri).await?;
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    Ok(Client::with_options(options)?)
}

/// Open the database handle for the application, or `None` when data access
/// is unavailable.
///
/// Mirrors the bootstrap contract: a missing connection string or an
/// unparsable URI is logged and absorbed, never propagated, so the server
/// starts and serves non-database routes regardless.
pub async fn open(config: &MongoConfig) -> Option<Database> {
    match build_client(config).await {
        Ok(client) => {
            let db = client
                .default_database()
                .unwrap_or_else(|| client.database(&config.fallback_database));
            info!("MongoDB client ready for database '{}'", db.name());
            Some(db)
        }
        Err(MongoError::NotConfigured) => {
            warn!("DEV_MONGODB_URI / MONGODB_URI not set, starting without data access");
            None
        }
        Err(e) => {
            error!("MongoDB connection error: {}", e);
            None
        }
    }
}

/// Spawn a background connectivity probe.
///
/// Pings the deployment once without holding up request handling. A failure
/// is logged to match the out-of-band error contract; routes that need data
/// access fail independently when invoked.
pub fn spawn_probe(db: Database) {
    tokio::spawn(async move {
        match db.run_command(doc! {"ping": 1}).await {
            Ok(_) => info!("MongoDB connection established to '{}'", db.name()),
            Err(e) => error!("MongoDB connection error: {}", e),
        }
    });
}

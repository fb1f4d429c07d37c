use axum_helpers::auth::TokenAuth;
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

use sal_web::{app, AppState, Config};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load .env, then compose configuration from the environment
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    init_tracing(&config.environment);

    // Explicit strategy initialization, not an import side effect
    let auth = TokenAuth::from_env();

    // Non-blocking: the server accepts requests before the connection is
    // verified; the probe reports failures out of band.
    let db = database::mongo::open(&config.mongodb).await;
    if let Some(db) = &db {
        database::mongo::spawn_probe(db.clone());
    }

    let state = AppState {
        config: config.clone(),
        db,
        auth,
    };

    let router = app::build_router(state);

    info!("Starting sal-web ({:?})", config.environment);
    axum_helpers::server::serve(router, &config.server).await?;

    info!("sal-web shutdown complete");
    Ok(())
}

use core_config::{env_optional, server::ServerConfig, FromEnv};
use database::mongo::MongoConfig;
use std::path::PathBuf;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration.
///
/// Composes the shared config components; read once at startup and immutable
/// for the process lifetime.
#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Root of the static asset surface (favicon, stylesheets, images).
    pub public_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let public_dir = env_optional("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_public_dir);

        Ok(Self {
            mongodb,
            server,
            environment,
            public_dir,
        })
    }
}

fn default_public_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public")
}

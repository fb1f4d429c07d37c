use core_config::{env_optional, ConfigError, FromEnv};

/// MongoDB configuration.
///
/// The connection string comes from `DEV_MONGODB_URI` when set, otherwise
/// `MONGODB_URI`. Neither is required: an absent URI means the application
/// starts without data access and routes that need it fail on their own.
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Connection string, e.g. "mongodb://localhost:27017/salsite".
    /// `None` when neither environment variable is set.
    pub uri: Option<String>,

    /// Database name used when the URI carries no default database.
    pub fallback_database: String,

    /// Server selection timeout in seconds. Kept short so the background
    /// connectivity probe reports failure promptly.
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: None,
            fallback_database: "app".to_string(),
            server_selection_timeout_secs: 10,
        }
    }
}

impl FromEnv for MongoConfig {
    /// Reads `DEV_MONGODB_URI` first, then `MONGODB_URI`. A missing URI is
    /// not a startup error; it surfaces later as a logged connection failure.
    fn from_env() -> Result<Self, ConfigError> {
        let uri = env_optional("DEV_MONGODB_URI").or_else(|| env_optional("MONGODB_URI"));

        let server_selection_timeout_secs = match env_optional("MONGODB_SERVER_SELECTION_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::ParseError {
                key: "MONGODB_SERVER_SELECTION_TIMEOUT_SECS".to_string(),
                details: format!("{}", e),
            })?,
            None => 10,
        };

        Ok(Self {
            uri,
            fallback_database: env_optional("MONGODB_DATABASE").unwrap_or_else(|| "app".to_string()),
            server_selection_timeout_secs,
        })
    }
}

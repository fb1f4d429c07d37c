//! Application state management.
//!
//! The explicit context object constructed once at startup and passed by
//! reference to every component that needs it: route collaborators, the
//! auth guard, and the error-rendering stage. No globals.

use axum_helpers::auth::TokenAuth;
use mongodb::Database;

use crate::config::Config;

/// Shared application state.
///
/// Cloned per handler (inexpensive: the database handle shares its
/// underlying connection pool).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// MongoDB database handle; `None` when no connection string was
    /// configured or the URI failed to parse. Data-access routes fail
    /// independently in that case.
    pub db: Option<Database>,
    /// Token authentication strategy, initialized explicitly at bootstrap
    pub auth: TokenAuth,
}

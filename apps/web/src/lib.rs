//! Sal web-application bootstrap.
//!
//! Wires the HTTP framework, MongoDB connection, templating, and the
//! cross-cutting middleware chain, mounts the `/` and `/api` route groups,
//! and normalizes every failure into a single error-rendering stage.

pub mod app;
pub mod config;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod views;

pub use config::Config;
pub use state::AppState;

//! Shared axum plumbing for the web application.
//!
//! - `http` — CORS and security-header layers
//! - `errors` — the `HttpError` type every in-band failure converges on
//! - `auth` — token authentication, initialized explicitly at bootstrap
//! - `assets` — compile-on-demand SCSS in front of static serving
//! - `server` — listener setup with graceful shutdown

pub mod assets;
pub mod auth;
pub mod errors;
pub mod http;
pub mod server;

pub use errors::{not_found, HttpError};

//! HTTP-level middleware: CORS configuration and security headers.

pub mod cors;
pub mod security;

pub use cors::{cors_layer, permissive_cors_layer};
pub use security::security_headers;

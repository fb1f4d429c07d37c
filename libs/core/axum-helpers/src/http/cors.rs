use axum::http::{HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Creates a permissive CORS layer that allows any origin.
///
/// This is the policy the bootstrap currently ships with. It is a known
/// placeholder, not a contract: tighten it with [`cors_layer`] once the set
/// of allowed clients is decided.
pub fn permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Creates a CORS layer restricted to an explicit origin list.
///
/// Configuration:
/// - Methods: GET, POST, PUT, DELETE, PATCH, OPTIONS
/// - Headers: Content-Type, Authorization, Accept, Cookie
/// - Credentials allowed, 1 hour max age
pub fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
            axum::http::header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

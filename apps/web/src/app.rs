//! Router assembly: the fixed middleware chain, the two route groups, the
//! static-asset surface, and the terminal error stage.

use axum::{handler::HandlerWithoutStateExt, middleware, Router};
use axum_helpers::assets::{compile_scss, ScssCompiler};
use axum_helpers::http::{permissive_cors_layer, security_headers};
use axum_helpers::not_found;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::pipeline::render_error_pages;
use crate::routes;
use crate::state::AppState;

/// Build the full request pipeline.
///
/// Request flow: CORS -> compression -> security headers -> request logging
/// -> error stage -> SCSS compile -> favicon -> `/` routes -> `/api` routes
/// -> static files -> not-found. Body and cookie parsing happen per route
/// via extractors; a body the extractor rejects never reaches its handler.
pub fn build_router(state: AppState) -> Router {
    let public = state.config.public_dir.clone();
    let compiler = ScssCompiler::new(&public, &public);

    // Unmatched paths try the static surface first, then synthesize 404.
    let static_files = ServeDir::new(&public)
        .append_index_html_on_directories(false)
        .not_found_service(not_found.into_service());

    let environment = state.config.environment.clone();

    Router::new()
        .merge(routes::index::router())
        .nest("/api", routes::api::router(state.clone()))
        .route_service(
            "/favicon.ico",
            ServeFile::new(public.join("images/sal.png")),
        )
        .fallback_service(static_files)
        .with_state(state)
        .layer(middleware::from_fn_with_state(compiler, compile_scss))
        .layer(middleware::from_fn_with_state(
            environment,
            render_error_pages,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        // Known placeholder: allow all clients until the origin list is decided
        .layer(permissive_cors_layer())
        .layer(CompressionLayer::new())
}

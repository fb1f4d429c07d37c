//! Terminal error-rendering stage.
//!
//! A typed middleware invoked for every request after the inner service
//! runs, rather than a handler recognized by its parameter count. Any
//! response carrying an error converges here and leaves as a rendered
//! "error" view with the original status.

use askama::Template;
use axum::{
    body::{self, Body},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use axum_helpers::HttpError;
use core_config::Environment;
use serde_json::json;
use tracing::error;

use crate::views::ErrorPage;

/// Upper bound when buffering an error body to recover its message.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// Render every error-status response through the error view.
///
/// The message comes from the propagated [`HttpError`] when one is present,
/// otherwise from the framework-produced body (body-parse rejections carry
/// their message there), otherwise from the status reason phrase. Structured
/// detail is exposed only in development; other environments render `{}`.
pub async fn render_error_pages(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let propagated = response.extensions().get::<HttpError>().cloned();
    let message = match propagated {
        Some(err) => err.message,
        None => message_from_body(status, response.into_body()).await,
    };

    let detail = if environment.is_development() {
        json!({
            "status": status.as_u16(),
            "message": message,
        })
    } else {
        json!({})
    };

    let page = ErrorPage {
        message: message.clone(),
        error: serde_json::to_string_pretty(&detail).unwrap_or_else(|_| "{}".to_string()),
    };

    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render error view: {}", e);
            (status, message).into_response()
        }
    }
}

async fn message_from_body(status: StatusCode, body: Body) -> String {
    match body::to_bytes(body, ERROR_BODY_LIMIT).await {
        Ok(bytes) if !bytes.is_empty() => String::from_utf8_lossy(&bytes).into_owned(),
        _ => status
            .canonical_reason()
            .unwrap_or("Internal Server Error")
            .to_string(),
    }
}

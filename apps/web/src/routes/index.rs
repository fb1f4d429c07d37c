use askama::Template;
use axum::{
    response::Html,
    routing::get,
    Router,
};
use axum_helpers::HttpError;

use crate::state::AppState;
use crate::views::IndexPage;

/// Primary route group, mounted at `/`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

async fn home() -> Result<Html<String>, HttpError> {
    let page = IndexPage {
        title: "Sal".to_string(),
    };
    let html = page
        .render()
        .map_err(|e| HttpError::internal(e.to_string()))?;
    Ok(Html(html))
}

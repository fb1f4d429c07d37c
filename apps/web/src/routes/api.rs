use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_helpers::auth::{require_auth, Claims};
use axum_helpers::HttpError;
use mongodb::bson::doc;
use serde_json::{json, Value};
use tracing::error;

use crate::state::AppState;

/// Secondary route group, mounted at `/api`.
pub fn router(state: AppState) -> Router<AppState> {
    let guarded = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_auth,
        ));

    Router::new()
        .route("/status", get(status))
        .route("/echo", post(echo))
        .route("/db/ping", get(db_ping))
        .merge(guarded)
}

async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "database": state.db.is_some(),
    }))
}

/// Echoes the parsed JSON body. Malformed bodies are rejected by the
/// extractor with a client error before this handler runs.
async fn echo(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

async fn me(Extension(claims): Extension<Claims>) -> Json<Value> {
    Json(json!({
        "subject": claims.sub,
        "expires_at": claims.exp,
    }))
}

/// Data-access route: fails on its own when the connection was never
/// configured or the deployment is unreachable. The bootstrap itself never
/// blocks on the database.
async fn db_ping(State(state): State<AppState>) -> Result<Json<Value>, HttpError> {
    let db = state
        .db
        .as_ref()
        .ok_or_else(|| HttpError::service_unavailable("Database is not configured"))?;

    db.run_command(doc! {"ping": 1}).await.map_err(|e| {
        error!("MongoDB connection error: {}", e);
        HttpError::service_unavailable("Database is unreachable")
    })?;

    Ok(Json(json!({"ok": 1, "database": db.name()})))
}

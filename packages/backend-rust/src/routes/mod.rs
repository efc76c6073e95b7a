mod health;
mod notebooks;
mod sessions;
mod stats;
mod words;

use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::response::AppError;
use crate::state::AppState;

/// Every endpoint, for the startup log.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/health"),
    ("GET, POST", "/api/notebooks"),
    ("GET, PUT, DELETE", "/api/notebooks/{notebook_id}"),
    ("POST", "/api/notebooks/{notebook_id}/reset-progress"),
    ("GET, PUT", "/api/notebook-settings"),
    ("GET, POST", "/api/words"),
    ("GET", "/api/words/search"),
    ("GET", "/api/words/wrong-only"),
    ("POST", "/api/words/import"),
    ("GET, PUT, DELETE", "/api/words/{word_id}"),
    ("PUT", "/api/words/{word_id}/progress"),
    ("POST", "/api/sessions"),
    ("GET", "/api/sessions/latest"),
    ("PUT", "/api/sessions/{session_id}"),
    ("GET", "/api/stats/daily"),
];

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/health", health::router())
        .nest("/api/notebooks", notebooks::router())
        .nest("/api/notebook-settings", notebooks::settings_router())
        .nest("/api/words", words::router())
        .nest("/api/sessions", sessions::router())
        .nest("/api/stats", stats::router())
        .fallback(fallback_handler)
        .with_state(state)
}

pub fn log_endpoints() {
    for (methods, path) in ENDPOINTS {
        tracing::info!(methods = *methods, path = *path, "route registered");
    }
}

async fn root() -> Response {
    Json(json!({ "message": "Tangocho API" })).into_response()
}

async fn fallback_handler() -> Response {
    AppError::not_found("Endpoint not found").into_response()
}

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::response::AppError;
use crate::services::study_session::{self, SessionPatch};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    start_time: Option<DateTime<Utc>>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/latest", get(latest_session))
        .route("/:sessionId", put(update_session))
}

async fn create_session(
    State(state): State<AppState>,
    payload: Option<Json<CreateSessionRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.unwrap_or_default();
    let session =
        study_session::start_session(state.pool(), state.clock(), payload.start_time).await?;
    Ok(Json(session))
}

async fn update_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Json(patch): Json<SessionPatch>,
) -> Result<impl IntoResponse, AppError> {
    patch.validate().map_err(AppError::validation)?;

    let update = study_session::update_session(state.pool(), state.clock(), session_id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;
    Ok(Json(update.session))
}

async fn latest_session(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = study_session::latest_session(state.pool()).await?;
    Ok(Json(session))
}

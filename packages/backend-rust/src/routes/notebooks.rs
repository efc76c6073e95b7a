use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::db::operations::{notebooks, words, Notebook};
use crate::response::{AppError, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotebookRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    notebook_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SettingsUpdateRequest {
    settings: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct NotebookResponse {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    settings: Option<Map<String, Value>>,
}

impl From<Notebook> for NotebookResponse {
    fn from(notebook: Notebook) -> Self {
        let settings = notebook.settings_json();
        Self {
            id: notebook.id,
            name: notebook.name,
            created_at: notebook.created_at,
            settings,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notebooks).post(create_notebook))
        .route(
            "/:notebookId",
            get(get_notebook).put(update_notebook).delete(delete_notebook),
        )
        .route("/:notebookId/reset-progress", post(reset_progress))
}

pub fn settings_router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}

fn not_found() -> AppError {
    AppError::not_found("Notebook not found")
}

fn validated_name(request: &NotebookRequest) -> Result<&str, AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    Ok(name)
}

async fn list_notebooks(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let notebooks = notebooks::list_notebooks(state.pool()).await?;
    let body: Vec<NotebookResponse> = notebooks.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

async fn create_notebook(
    State(state): State<AppState>,
    Json(payload): Json<NotebookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = validated_name(&payload)?;
    let notebook = notebooks::insert_notebook(state.pool(), name, state.clock().now()).await?;
    tracing::info!(notebook_id = notebook.id, "notebook created");
    Ok(Json(NotebookResponse::from(notebook)))
}

async fn get_notebook(
    State(state): State<AppState>,
    Path(notebook_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let notebook = notebooks::find_notebook(state.pool(), notebook_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(NotebookResponse::from(notebook)))
}

async fn update_notebook(
    State(state): State<AppState>,
    Path(notebook_id): Path<i64>,
    Json(payload): Json<NotebookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = validated_name(&payload)?;
    let notebook = notebooks::rename_notebook(state.pool(), notebook_id, name)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(NotebookResponse::from(notebook)))
}

async fn delete_notebook(
    State(state): State<AppState>,
    Path(notebook_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !notebooks::delete_notebook(state.pool(), notebook_id).await? {
        return Err(not_found());
    }
    tracing::info!(notebook_id, "notebook deleted");
    Ok(MessageResponse::new("Notebook deleted"))
}

async fn reset_progress(
    State(state): State<AppState>,
    Path(notebook_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let notebook = notebooks::find_notebook(state.pool(), notebook_id)
        .await?
        .ok_or_else(not_found)?;
    let reset = words::reset_notebook_progress(state.pool(), notebook_id).await?;
    tracing::info!(notebook_id, words = reset, "notebook progress reset");
    Ok(MessageResponse::new(format!(
        "Progress of every word in \"{}\" has been reset",
        notebook.name
    )))
}

async fn get_settings(
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let notebook = notebooks::find_notebook(state.pool(), query.notebook_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(notebook.effective_settings()))
}

async fn update_settings(
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
    Json(payload): Json<SettingsUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let raw = serde_json::to_string(&payload.settings)
        .map_err(|e| AppError::bad_request(format!("settings could not be encoded: {e}")))?;
    let notebook = notebooks::store_settings(state.pool(), query.notebook_id, &raw)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(notebook.settings_json().unwrap_or(payload.settings)))
}

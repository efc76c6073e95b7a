use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::db::operations::{notebooks, words, WordSearchHit};
use crate::response::{AppError, MessageResponse};
use crate::services::word_import;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct ListWordsQuery {
    notebook_id: Option<i64>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NotebookFilter {
    notebook_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct WordRequest {
    word: String,
    meaning: String,
    notebook_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    correct: bool,
    mastered: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    notebook_id: i64,
    text: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_words).post(create_word))
        .route("/search", get(search_words))
        .route("/wrong-only", get(wrong_words))
        .route("/import", post(import_words))
        .route(
            "/:wordId",
            get(get_word).put(update_word).delete(delete_word),
        )
        .route("/:wordId/progress", put(update_progress))
}

fn word_not_found() -> AppError {
    AppError::not_found("Word not found")
}

async fn ensure_notebook(state: &AppState, notebook_id: i64) -> Result<(), AppError> {
    notebooks::find_notebook(state.pool(), notebook_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Notebook not found"))
}

async fn list_words(
    State(state): State<AppState>,
    Query(query): Query<ListWordsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(0, MAX_PAGE_SIZE);
    let words = words::list_words(state.pool(), query.notebook_id, skip, limit).await?;
    Ok(Json(words))
}

async fn search_words(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let needle = query.q.trim();
    if needle.is_empty() {
        return Ok(Json(Vec::<WordSearchHit>::new()));
    }
    let hits = words::search_words(state.pool(), needle).await?;
    Ok(Json(hits))
}

async fn wrong_words(
    State(state): State<AppState>,
    Query(filter): Query<NotebookFilter>,
) -> Result<impl IntoResponse, AppError> {
    let words = words::list_wrong_words(state.pool(), filter.notebook_id).await?;
    Ok(Json(words))
}

async fn get_word(
    State(state): State<AppState>,
    Path(word_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let word = words::find_word(state.pool(), word_id)
        .await?
        .ok_or_else(word_not_found)?;
    Ok(Json(word))
}

async fn create_word(
    State(state): State<AppState>,
    Json(payload): Json<WordRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_notebook(&state, payload.notebook_id).await?;

    let mut conn = state.pool().acquire().await?;
    let word = words::insert_word(&mut conn, payload.notebook_id, &payload.word, &payload.meaning)
        .await?;
    Ok(Json(word))
}

async fn import_words(
    State(state): State<AppState>,
    Json(payload): Json<ImportRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_notebook(&state, payload.notebook_id).await?;
    let report =
        word_import::import_into_notebook(state.pool(), payload.notebook_id, &payload.text)
            .await?;
    Ok(Json(report))
}

async fn update_word(
    State(state): State<AppState>,
    Path(word_id): Path<i64>,
    Json(payload): Json<WordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let word = words::update_word_text(state.pool(), word_id, &payload.word, &payload.meaning)
        .await?
        .ok_or_else(word_not_found)?;
    Ok(Json(word))
}

async fn delete_word(
    State(state): State<AppState>,
    Path(word_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !words::delete_word(state.pool(), word_id).await? {
        return Err(word_not_found());
    }
    Ok(MessageResponse::new("Word deleted"))
}

async fn update_progress(
    State(state): State<AppState>,
    Path(word_id): Path<i64>,
    Json(payload): Json<ProgressRequest>,
) -> Result<impl IntoResponse, AppError> {
    let word = words::record_answer(
        state.pool(),
        word_id,
        payload.correct,
        payload.mastered,
        state.clock().now(),
    )
    .await?
    .ok_or_else(word_not_found)?;
    Ok(Json(word))
}

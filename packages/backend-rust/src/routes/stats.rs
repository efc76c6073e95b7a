use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::response::AppError;
use crate::services::daily_stats::{self, DEFAULT_HISTORY_DAYS};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DailyStatsQuery {
    days: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/daily", get(list_daily_stats))
}

async fn list_daily_stats(
    State(state): State<AppState>,
    Query(query): Query<DailyStatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    if days < 0 {
        return Err(AppError::validation("days must not be negative"));
    }
    let stats = daily_stats::history(state.pool(), state.clock().today(), days).await?;
    Ok(Json(stats))
}

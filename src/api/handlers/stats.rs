//! Handlers for short link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::{BasicStatsResponse, StatsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns a short link's metadata and click count.
///
/// # Endpoint
///
/// `GET /api/stats/{short_code}`
///
/// # Response
///
/// ```json
/// {
///   "short_code": "Ab3dE9z",
///   "long_url": "https://example.com/a",
///   "created_at": "2025-01-01T12:00:00Z",
///   "click_count": 3
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let mapping = state.resolution_service.stats(&short_code).await?;
    Ok(Json(mapping.into()))
}

/// Returns a short link's metadata without the click count.
///
/// # Endpoint
///
/// `GET /stats/{short_code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn basic_stats_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<BasicStatsResponse>, AppError> {
    let mapping = state.resolution_service.stats(&short_code).await?;
    Ok(Json(mapping.into()))
}

//! Handler for the shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the short code for a long URL, creating it on first use.
///
/// # Endpoint
///
/// `POST /shorten` (also `POST /shorten/`)
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/a" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "https://example.com/a",
///   "short_code": "Ab3dE9z",
///   "short_url": "http://localhost:8000/Ab3dE9z",
///   "created": true
/// }
/// ```
///
/// Shortening the same URL again returns the same code with `"created": false`.
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed body or a URL without an
/// `http://` / `https://` prefix.
/// Returns 500 Internal Server Error if no free code could be allocated or
/// the store failed.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let outcome = state.mapping_service.create_or_get(&payload.url).await?;
    let short_url = state
        .mapping_service
        .short_url(&outcome.mapping.short_code);

    Ok(Json(ShortenResponse {
        url: outcome.mapping.long_url,
        short_code: outcome.mapping.short_code,
        short_url,
        created: outcome.created,
    }))
}

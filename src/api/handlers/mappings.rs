//! Handlers for mapping management: listing, deletion and the welcome route.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::message::MessageResponse;
use crate::domain::entities::UrlMapping;
use crate::error::AppError;
use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "WELCOME TO URL SHORTENER APP :)";

/// `GET /` - welcome string.
pub async fn root_handler() -> Json<&'static str> {
    Json(WELCOME_MESSAGE)
}

/// Lists every mapping.
///
/// # Endpoint
///
/// `GET /show`
///
/// The whole table is returned in one response, ordered by id.
pub async fn list_handler(State(state): State<AppState>) -> Result<Json<Vec<UrlMapping>>, AppError> {
    Ok(Json(state.mapping_service.list_all().await?))
}

/// Hard-deletes a mapping.
///
/// # Endpoint
///
/// `DELETE /api/delete/{short_code}`
///
/// # Response
///
/// ```json
/// { "message": "Short URL 'Ab3dE9z' deleted successfully" }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.resolution_service.delete(&short_code).await?;

    Ok(Json(MessageResponse::new(format!(
        "Short URL '{}' deleted successfully",
        short_code
    ))))
}

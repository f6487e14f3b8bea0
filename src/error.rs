//! Application error type and its HTTP representation.
//!
//! Every variant carries a human-readable message plus structured JSON details.
//! The variants map one-to-one onto the error taxonomy of the service:
//!
//! | Variant | Status | `code` |
//! |---|---|---|
//! | [`AppError::Validation`] | 400 | `validation_error` |
//! | [`AppError::NotFound`] | 404 | `not_found` |
//! | [`AppError::CodeAllocation`] | 500 | `code_allocation_failed` |
//! | [`AppError::Internal`] | 500 | `internal_error` |
//!
//! Short code collisions are not represented here: they never leave the
//! repository/service pair (see [`crate::domain::repositories::MappingRepository::insert_if_absent`]).

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serialized error payload, shared by all error responses.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    /// The collision retry budget ran out. Points at code space or store health,
    /// not at a transient per-request failure.
    #[error("{message}")]
    CodeAllocation { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn code_allocation(message: impl Into<String>, details: Value) -> Self {
        Self::CodeAllocation {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Not-found error for an unknown short code, worded as the public API expects.
    pub fn short_code_not_found(short_code: &str) -> Self {
        Self::not_found(
            format!("Short URL '{}' not found", short_code),
            json!({ "short_code": short_code }),
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::CodeAllocation { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::CodeAllocation { message, details } => {
                ("code_allocation_failed", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        AppError::bad_request("Invalid request", json!({ "fields": fields }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

/// Maps a driver error to [`AppError::Internal`].
///
/// This is where the driver text is logged; it never reaches the response.
///
/// Callers that expect a unique violation (the short code insert) must inspect
/// the error themselves before falling back to this mapping.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    tracing::error!(error = %e, "database error");

    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::internal(
            "Unexpected unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    AppError::internal("Database error", json!({}))
}

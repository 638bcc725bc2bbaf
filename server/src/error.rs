//! API Error Types
//!
//! Error taxonomy shared by the resource handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::assessment::AssessmentError;
use crate::permissions::PermissionError;

/// Errors returned by resource handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),

    /// Authorization denied.
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// Assessment breakdown rejected or inconsistent.
    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    /// Row does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness violation.
    #[error("{0}")]
    Conflict(String),

    /// Database failure.
    #[error("Database error")]
    Database(sqlx::Error),

    /// Internal server error.
    #[error("Internal server error")]
    Internal(String),
}

/// Result type for resource handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let detail = db_err.constraint().unwrap_or("unique key");
                Self::Conflict(format!("Duplicate entry ({detail})"))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                Self::Validation("Referenced row does not exist".to_string())
            }
            _ => Self::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::Permission(err) => return err.into_response(),
            Self::Assessment(err) => return err.clone().into_response(),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Database(err) => {
                tracing::error!(%err, "Request failed with database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
            Self::Internal(msg) => {
                tracing::error!(message = %msg, "Request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "message": self.to_string() })),
        )
            .into_response()
    }
}

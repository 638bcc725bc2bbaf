//! Assessment Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Failures while validating or normalizing an assessment breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    #[error("Assessment breakdown must contain at least one component")]
    Empty,

    #[error("Assessment component {index} has an empty type")]
    EmptyType { index: usize },

    #[error("Duplicate assessment type: {0}")]
    DuplicateType(String),

    #[error("Weight for '{kind}' must be a whole number")]
    NotAnInteger { kind: String },

    #[error("Weight for '{kind}' must be between 0 and 100 (got {weight})")]
    OutOfRange { kind: String, weight: i64 },

    #[error("A single assessment component must weigh 100 (got {0})")]
    SingleNotFull(i64),

    #[error("Assessment weights sum to {0}, which exceeds 100")]
    Overallocated(i64),

    #[error("Assessment weights sum to {0}, expected exactly 100")]
    Underallocated(i64),

    /// Normalized output did not sum to 100. This is a defect, not bad input.
    #[error("Normalized assessment weights sum to {0}")]
    Inconsistent(i64),
}

impl AssessmentError {
    /// Whether the error was caused by the caller's input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Inconsistent(_))
    }
}

impl IntoResponse for AssessmentError {
    fn into_response(self) -> Response {
        let (status, code) = if self.is_user_error() {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        } else {
            tracing::error!(error = %self, "Assessment normalization invariant violated");
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "message": self.to_string() })),
        )
            .into_response()
    }
}

//! Maps the domain error taxonomy onto HTTP responses. Store-level
//! failures become a generic 500; nothing internal reaches a body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domains::error::DomainError;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, self.0.to_string()),
            DomainError::Storage(detail) => {
                tracing::error!(error = %detail, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
            // Validation and state-conflict errors are all client
            // mistakes: nothing was mutated.
            _ => (StatusCode::BAD_REQUEST, self.0.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Shorthand used by every handler.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

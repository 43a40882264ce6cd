//! Request handlers, grouped by surface.

pub mod acl;
pub mod boards;
pub mod categories;
pub mod menus;
pub mod pages;
pub mod setup;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use domains::error::DomainError;

use crate::error::ApiError;

/// Unwraps an admin-action body, turning malformed JSON or an unknown
/// `action` discriminator into the documented 400 shape instead of the
/// framework default.
pub(crate) fn require_action<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(action)) => Ok(action),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected admin action payload");
            Err(DomainError::Validation("unsupported or malformed action".into()).into())
        }
    }
}

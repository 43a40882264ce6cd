//! First-run status endpoint consumed by the setup gate and the setup
//! UI.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/setup`
pub async fn status(State(state): State<AppState>) -> ApiResult<Response> {
    let needs_setup = state.setup.needs_setup().await?;
    Ok(Json(json!({ "needsSetup": needs_setup })).into_response())
}

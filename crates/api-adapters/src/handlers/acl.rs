//! The ACL read endpoint consumed by the edge gate.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::ApiResult;
use crate::state::AppState;

/// Marker header restricting the endpoint to gate-originated calls.
pub const MARKER_HEADER: &str = "x-middleware-request";

/// `GET /api/acl`: the current protected-slug sets, recomputed from
/// store state on every call. Anything without the marker header gets
/// a plain 404, indistinguishable from a missing route.
pub async fn read(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let marked = headers
        .get(MARKER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "1")
        .unwrap_or(false);
    if !marked {
        return Ok((StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response());
    }

    let sets = state.acl.resolve().await?;
    Ok(Json(sets).into_response())
}

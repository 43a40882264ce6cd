//! Board handlers: public listing and the admin action endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use domains::models::ItemOrder;
use services::BoardInput;

use crate::error::ApiResult;
use crate::extract::AdminSession;
use crate::handlers::menus::required;
use crate::handlers::require_action;
use crate::state::AppState;

/// `GET /api/boards`: visible boards, in display order.
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let boards = state.community.list_boards(false).await?;
    Ok(Json(boards).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BoardAction {
    Create {
        #[serde(default)]
        data: BoardInput,
    },
    Update {
        id: Option<Uuid>,
        #[serde(default)]
        data: BoardInput,
    },
    Delete {
        id: Option<Uuid>,
    },
    Reorder {
        #[serde(default)]
        items: Vec<ItemOrder>,
    },
}

/// `POST /api/admin/boards`
pub async fn admin_actions(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    payload: Result<Json<BoardAction>, JsonRejection>,
) -> ApiResult<Response> {
    match require_action(payload)? {
        BoardAction::Create { data } => {
            let board = state.community.create_board(data).await?;
            Ok((StatusCode::CREATED, Json(board)).into_response())
        }
        BoardAction::Update { id, data } => {
            let id = required(id, "an id is required")?;
            let board = state.community.update_board(id, data).await?;
            Ok(Json(board).into_response())
        }
        BoardAction::Delete { id } => {
            let id = required(id, "an id is required")?;
            state.community.delete_board(id).await?;
            Ok(Json(json!({ "success": true })).into_response())
        }
        BoardAction::Reorder { items } => {
            state.community.reorder(items).await?;
            Ok(Json(json!({ "success": true })).into_response())
        }
    }
}

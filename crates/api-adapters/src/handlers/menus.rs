//! Menu handlers: the public menu read and the action-discriminated
//! admin endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use domains::error::DomainError;
use domains::models::ItemOrder;
use services::MenuItemInput;

use crate::error::{ApiError, ApiResult};
use crate::extract::AdminSession;
use crate::handlers::require_action;
use crate::state::AppState;

/// `GET /api/menus/{key}`: the rendered menu, defaults included.
pub async fn get_menu(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Response> {
    let view = state.menus.get_menu(&key).await?;
    Ok(Json(view).into_response())
}

/// Every mutation the menu admin screen can issue. The tag mirrors the
/// wire `action` field; adding a variant forces every match below to
/// handle it.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MenuAction {
    Create {
        menu_key: Option<String>,
        #[serde(default)]
        data: MenuItemInput,
    },
    Update {
        id: Option<Uuid>,
        #[serde(default)]
        data: MenuItemInput,
    },
    Delete {
        id: Option<Uuid>,
    },
    Reorder {
        menu_key: Option<String>,
        #[serde(default)]
        items: Vec<ItemOrder>,
    },
}

/// `POST /api/admin/menus`
pub async fn admin_actions(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    payload: Result<Json<MenuAction>, JsonRejection>,
) -> ApiResult<Response> {
    match require_action(payload)? {
        MenuAction::Create { menu_key, data } => {
            let menu_key = required(menu_key.filter(|k| !k.is_empty()), "a menu key is required")?;
            let item = state.menus.create_item(&menu_key, data).await?;
            Ok((StatusCode::CREATED, Json(item)).into_response())
        }
        MenuAction::Update { id, data } => {
            let id = required(id, "an id is required")?;
            let item = state.menus.update_item(id, data).await?;
            Ok(Json(item).into_response())
        }
        MenuAction::Delete { id } => {
            let id = required(id, "an id is required")?;
            state.menus.delete_item(id).await?;
            Ok(Json(json!({ "success": true })).into_response())
        }
        MenuAction::Reorder { menu_key, items } => {
            let menu_key = required(menu_key.filter(|k| !k.is_empty()), "a menu key is required")?;
            state.menus.reorder(&menu_key, items).await?;
            Ok(Json(json!({ "success": true })).into_response())
        }
    }
}

pub(crate) fn required<T>(value: Option<T>, message: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| DomainError::Validation(message.to_string()).into())
}

//! Category handlers: public/admin listings and the admin action
//! endpoint covering the hidden-category lifecycle.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use domains::defaults::MAIN_MENU_KEY;
use domains::error::DomainError;
use domains::models::CategoryFilter;

use crate::error::ApiResult;
use crate::extract::{current_session, AdminSession};
use crate::handlers::menus::required;
use crate::handlers::require_action;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    all: Option<String>,
    hidden: Option<String>,
}

/// `GET /api/categories`: visible categories for everyone; `all=true`
/// and `hidden=true` are admin-only slices.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let include_all = query.all.as_deref() == Some("true");
    let hidden_only = query.hidden.as_deref() == Some("true");

    if include_all || hidden_only {
        let is_admin = current_session(&headers, &state)
            .map(|claims| claims.is_admin())
            .unwrap_or(false);
        if !is_admin {
            return Err(DomainError::Forbidden("administrator privileges are required").into());
        }
    }

    let filter = if include_all {
        CategoryFilter::All
    } else if hidden_only {
        CategoryFilter::Hidden
    } else {
        CategoryFilter::Visible
    };
    let categories = state.catalog.list_with_counts(filter).await?;
    Ok(Json(categories).into_response())
}

/// `GET /api/admin/categories`: every category, counts included.
pub async fn admin_list(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
) -> ApiResult<Response> {
    let categories = state.catalog.list_with_counts(CategoryFilter::All).await?;
    Ok(Json(categories).into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryMetaInput {
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CategoryAction {
    Update {
        id: Option<Uuid>,
        #[serde(default)]
        data: CategoryMetaInput,
    },
    Restore {
        id: Option<Uuid>,
    },
    MoveContents {
        from_category_id: Option<Uuid>,
        to_category_id: Option<Uuid>,
    },
    PermanentDelete {
        id: Option<Uuid>,
    },
}

/// `POST /api/admin/categories`
pub async fn admin_actions(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    payload: Result<Json<CategoryAction>, JsonRejection>,
) -> ApiResult<Response> {
    match require_action(payload)? {
        CategoryAction::Update { id, data } => {
            let id = required(id, "a category id is required")?;
            let category = state
                .catalog
                .update_meta(id, data.thumbnail_url, data.description)
                .await?;
            Ok(Json(category).into_response())
        }
        CategoryAction::Restore { id } => {
            let id = required(id, "a category id is required")?;
            let (category, item) = state.catalog.restore(id, MAIN_MENU_KEY).await?;
            Ok(Json(json!({
                "success": true,
                "category": category,
                "menuItem": item,
            }))
            .into_response())
        }
        CategoryAction::MoveContents {
            from_category_id,
            to_category_id,
        } => {
            let from = required(from_category_id, "a source category id is required")?;
            let to = required(to_category_id, "a target category id is required")?;
            let moved = state.catalog.move_contents(from, to).await?;
            Ok(Json(json!({
                "success": true,
                "movedCount": moved,
                "message": format!("{moved} content item(s) moved"),
            }))
            .into_response())
        }
        CategoryAction::PermanentDelete { id } => {
            let id = required(id, "a category id is required")?;
            state.catalog.permanent_delete(id).await?;
            Ok(Json(json!({ "success": true })).into_response())
        }
    }
}

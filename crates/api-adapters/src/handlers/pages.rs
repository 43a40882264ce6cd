//! Page-data handlers for the content and community routes.
//!
//! Each handler re-derives visibility and auth from the store on its
//! own, independent of the edge gate. Both layers must agree; if the
//! gate ever fails open, these checks still hold the line for
//! protected pages.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use domains::error::DomainError;
use domains::models::Category;

use crate::error::ApiResult;
use crate::extract::current_session;
use crate::state::AppState;

async fn visible_category(state: &AppState, slug: &str) -> Result<Category, DomainError> {
    state
        .catalog
        .find_by_slug(slug)
        .await?
        .filter(|category| category.is_visible)
        .ok_or(DomainError::not_found("category"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "authentication required" })),
    )
        .into_response()
}

/// `GET /contents/{slug}`: a category page with its contents.
pub async fn category_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let category = visible_category(&state, &slug).await?;

    if state.acl.category_requires_auth(&category).await?
        && current_session(&headers, &state).is_none()
    {
        return Ok(unauthorized());
    }

    let contents = state.catalog.list_contents(category.id).await?;
    Ok(Json(json!({ "category": category, "contents": contents })).into_response())
}

/// `GET /contents/{slug}/{id}`: a single content item.
pub async fn content_page(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, Uuid)>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let category = visible_category(&state, &slug).await?;

    if state.acl.category_requires_auth(&category).await?
        && current_session(&headers, &state).is_none()
    {
        return Ok(unauthorized());
    }

    let content = state
        .catalog
        .list_contents(category.id)
        .await?
        .into_iter()
        .find(|content| content.id == id)
        .ok_or(DomainError::not_found("content"))?;
    Ok(Json(content).into_response())
}

/// `GET /community`: the visible board index.
pub async fn community_index(State(state): State<AppState>) -> ApiResult<Response> {
    let boards = state.community.list_boards(false).await?;
    Ok(Json(json!({ "boards": boards })).into_response())
}

/// `GET /community/{group}/{board}`: a board page with its posts.
pub async fn board_page(
    State(state): State<AppState>,
    Path((group, board_key)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let board = state
        .community
        .find_by_key(&board_key)
        .await?
        .filter(|board| board.is_visible)
        .ok_or(DomainError::not_found("board"))?;

    if state.acl.community_requires_auth(&group).await?
        && current_session(&headers, &state).is_none()
    {
        return Ok(unauthorized());
    }

    let posts = state.community.list_posts(&board.key).await?;
    Ok(Json(json!({ "board": board, "posts": posts })).into_response())
}

//! Router-level tests for the admin API surface: authorization order,
//! action dispatch, and error mapping.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use serde_json::json;

use common::{body_json, get, get_as, post_json};
use integration_tests::{test_router, FakeStore};
use services::ManualClock;

fn app_with_store() -> (Router, Arc<FakeStore>) {
    let store = Arc::new(FakeStore::new());
    let app = test_router(
        store.clone(),
        Arc::new(ManualClock::new()),
        Duration::from_secs(60),
    );
    (app, store)
}

#[tokio::test]
async fn admin_endpoints_reject_anonymous_and_non_admin_callers() {
    let (app, _) = app_with_store();

    // Authorization is checked before the payload is even looked at:
    // this body is garbage and the response is still a 403.
    let res = post_json(&app, "/api/admin/menus", None, json!({ "nope": 1 })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = post_json(
        &app,
        "/api/admin/boards",
        Some("user-token"),
        json!({ "action": "create", "data": { "name": "x" } }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = body_json(res).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_actions_map_to_a_plain_400() {
    let (app, _) = app_with_store();
    let res = post_json(
        &app,
        "/api/admin/menus",
        Some("admin-token"),
        json!({ "action": "explode" }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["error"], "unsupported or malformed action");
}

#[tokio::test]
async fn menu_create_returns_the_created_item() {
    let (app, store) = app_with_store();
    let res = post_json(
        &app,
        "/api/admin/menus",
        Some("admin-token"),
        json!({
            "action": "create",
            "menuKey": "main",
            "data": { "label": "카지노", "order": 1 }
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    assert_eq!(body["linkType"], "category");
    assert!(body["href"].as_str().unwrap().starts_with("/products/"));

    store.mutate(|s| {
        assert_eq!(s.items.len(), 1);
        assert_eq!(s.categories.len(), 1);
    });
}

#[tokio::test]
async fn menu_create_without_label_is_a_validation_error() {
    let (app, _) = app_with_store();
    let res = post_json(
        &app,
        "/api/admin/menus",
        Some("admin-token"),
        json!({ "action": "create", "menuKey": "main", "data": {} }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn board_delete_surfaces_the_post_guard() {
    let (app, store) = app_with_store();

    let res = post_json(
        &app,
        "/api/admin/boards",
        Some("admin-token"),
        json!({ "action": "create", "data": { "name": "free" } }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let board_id = body_json(res).await["id"].as_str().unwrap().to_string();

    store.mutate(|s| {
        s.posts.push(domains::models::Post {
            id: uuid::Uuid::now_v7(),
            board_key: "FREE".into(),
            title: "t".into(),
            body: "b".into(),
            created_at: chrono::Utc::now(),
        })
    });

    let res = post_json(
        &app,
        "/api/admin/boards",
        Some("admin-token"),
        json!({ "action": "delete", "id": board_id }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("post"));
}

#[tokio::test]
async fn category_restore_of_unknown_id_is_a_404() {
    let (app, _) = app_with_store();
    let res = post_json(
        &app,
        "/api/admin/categories",
        Some("admin-token"),
        json!({ "action": "restore", "id": uuid::Uuid::now_v7() }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn move_contents_reports_the_moved_count() {
    let (app, store) = app_with_store();
    let from = store.insert_category("old", false, false);
    let to = store.insert_category("new", true, false);
    store.insert_content(from.id, "a");
    store.insert_content(from.id, "b");

    let res = post_json(
        &app,
        "/api/admin/categories",
        Some("admin-token"),
        json!({
            "action": "moveContents",
            "fromCategoryId": from.id,
            "toCategoryId": to.id
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["movedCount"], 2);
}

#[tokio::test]
async fn hidden_listing_is_admin_only() {
    let (app, store) = app_with_store();
    store.insert_category("ghost", false, false);

    let res = get(&app, "/api/categories?hidden=true").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = get_as(&app, "/api/categories?hidden=true", "admin-token").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["slug"], "ghost");
    assert_eq!(body[0]["contentCount"], 0);
}

#[tokio::test]
async fn acl_endpoint_requires_the_marker_header() {
    let (app, store) = app_with_store();
    store.insert_category("vault", true, true);

    let res = get(&app, "/api/acl").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = common::send(
        &app,
        axum::http::Request::builder()
            .uri("/api/acl")
            .header("x-middleware-request", "1")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["protectedCategorySlugs"], json!(["vault"]));
    assert_eq!(body["protectedCommunitySlugs"], json!([]));
}

#[tokio::test]
async fn setup_endpoint_reflects_admin_presence() {
    let (app, store) = app_with_store();

    let res = get(&app, "/api/setup").await;
    let body = body_json(res).await;
    assert_eq!(body["needsSetup"], false);

    store.mutate(|s| s.admin_exists = false);
    let res = get(&app, "/api/setup").await;
    let body = body_json(res).await;
    assert_eq!(body["needsSetup"], true);
}

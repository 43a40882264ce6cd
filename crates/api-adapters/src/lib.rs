//! # api-adapters
//!
//! The web routing and orchestration layer for driftwood: the admin
//! API with its action-discriminated endpoints, the public reads, the
//! ACL read endpoint, the page-data routes, and the two gates layered
//! in front of them.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::{AppState, GateConfig};

/// Builds the full application router.
///
/// The edge gate wraps only the content/community page routes (its
/// route matcher); the setup gate wraps everything and excludes the
/// API surface internally.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/menus/{key}", get(handlers::menus::get_menu))
        .route("/api/categories", get(handlers::categories::list))
        .route("/api/boards", get(handlers::boards::list))
        .route("/api/acl", get(handlers::acl::read))
        .route("/api/setup", get(handlers::setup::status))
        .route("/api/admin/menus", post(handlers::menus::admin_actions))
        .route(
            "/api/admin/categories",
            get(handlers::categories::admin_list).post(handlers::categories::admin_actions),
        )
        .route("/api/admin/boards", post(handlers::boards::admin_actions));

    let pages = Router::new()
        .route("/contents/{slug}", get(handlers::pages::category_page))
        .route("/contents/{slug}/{id}", get(handlers::pages::content_page))
        .route("/community", get(handlers::pages::community_index))
        .route(
            "/community/{group}/{board}",
            get(handlers::pages::board_page),
        )
        .layer(from_fn_with_state(state.clone(), middleware::edge_gate));

    Router::new()
        .merge(api)
        .merge(pages)
        .layer(from_fn_with_state(state.clone(), middleware::setup_gate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

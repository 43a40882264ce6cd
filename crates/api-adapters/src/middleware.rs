//! # Gates
//!
//! Request-interception layers that run before any page handler: the
//! edge gate redirects anonymous requests away from protected slugs,
//! and the setup gate funnels everything to `/setup` until an admin
//! account exists. Both consult short-TTL probes and fail OPEN when a
//! probe errors: availability over strictness, backed by the
//! independent checks inside the page handlers themselves.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::extract::current_session;
use crate::state::AppState;

/// Prefixes the gates never touch: the API surface and framework
/// internals.
const EXCLUDED_PREFIXES: [&str; 2] = ["/api", "/_next"];

fn is_excluded(path: &str) -> bool {
    EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
        // Anything with a dot looks like a static file.
        || path.contains('.')
}

fn is_auth_page(path: &str, state: &AppState) -> bool {
    path == state.gate.login_path || path == "/register" || path == state.gate.setup_path
}

/// Edge gate over the content/community routes.
///
/// Order of checks mirrors the reverse proxy it replaces: exclusions,
/// auth pages, route kind, session, then the ACL membership test. A
/// failed ACL fetch lets the request through unmodified.
pub async fn edge_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    if !state.gate.enabled || is_excluded(&path) || is_auth_page(&path, &state) {
        return next.run(req).await;
    }

    let is_content = path.starts_with(&state.gate.content_prefix);
    let is_community = path.starts_with(&state.gate.community_prefix);
    if !is_content && !is_community {
        return next.run(req).await;
    }

    if current_session(req.headers(), &state).is_some() {
        return next.run(req).await;
    }

    // Second path segment is the category or community-group slug.
    let Some(slug) = path.split('/').filter(|s| !s.is_empty()).nth(1) else {
        return next.run(req).await;
    };

    let Some(acl) = state.acl_probe.protected_sets().await else {
        // Fail open; the page handler re-checks on its own.
        return next.run(req).await;
    };

    let protected = if is_content {
        acl.protected_category_slugs.contains(slug)
    } else {
        acl.protected_community_slugs.contains(slug)
    };
    if !protected {
        return next.run(req).await;
    }

    let callback = match req.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };
    login_redirect(&state, &callback).into_response()
}

fn login_redirect(state: &AppState, callback: &str) -> Redirect {
    let query = serde_urlencoded::to_string([("callbackUrl", callback)])
        .unwrap_or_else(|_| String::from("callbackUrl=/"));
    Redirect::temporary(&format!("{}?{}", state.gate.login_path, query))
}

/// Setup gate: until an admin account exists, every page request is
/// redirected to the setup flow. The probe answer is cached and a
/// probe failure lets the request through.
pub async fn setup_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path();

    if path.starts_with(&state.gate.setup_path)
        || path.starts_with("/favicon")
        || is_excluded(path)
    {
        return next.run(req).await;
    }

    if state.setup_probe.needs_setup().await == Some(true) {
        return Redirect::temporary(&state.gate.setup_path).into_response();
    }
    next.run(req).await
}

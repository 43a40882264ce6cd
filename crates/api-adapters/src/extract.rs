//! Session extraction. Tokens arrive either as a bearer header or in
//! the session cookie; verification is delegated to the configured
//! [`SessionVerifier`].
//!
//! [`SessionVerifier`]: domains::traits::SessionVerifier

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

use domains::error::DomainError;
use domains::models::SessionClaims;

use crate::error::ApiError;
use crate::state::AppState;

/// The verified session of the current request, if any.
pub fn current_session(headers: &HeaderMap, state: &AppState) -> Option<SessionClaims> {
    let token = bearer_token(headers)
        .or_else(|| cookie_value(headers, &state.gate.session_cookie))?;
    state.sessions.verify(&token)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}

/// Extractor gating the admin API. Authorization is checked before any
/// payload validation: no session or a non-admin role is a 403, full
/// stop.
pub struct AdminSession(pub SessionClaims);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match current_session(&parts.headers, state) {
            Some(claims) if claims.is_admin() => Ok(Self(claims)),
            _ => Err(DomainError::Forbidden("administrator privileges are required").into()),
        }
    }
}

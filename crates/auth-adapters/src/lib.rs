//! # auth-adapters
//!
//! HS256 session-token verification. Token issuance belongs to the
//! external auth collaborator; this crate only answers "is this token
//! valid, and whose is it".

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use domains::models::SessionClaims;
use domains::traits::SessionVerifier;

/// Raw claims as they appear on the wire. `exp` is enforced by the
/// validation step, not read here.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: String,
    #[serde(default)]
    role: String,
}

pub struct JwtSessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtSessionVerifier {
    pub fn new(secret: &SecretString) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl SessionVerifier for JwtSessionVerifier {
    fn verify(&self, token: &str) -> Option<SessionClaims> {
        match decode::<TokenClaims>(token, &self.key, &self.validation) {
            Ok(data) => Some(SessionClaims {
                sub: data.claims.sub,
                role: data.claims.role,
            }),
            Err(err) => {
                // Expired and garbage tokens are everyday traffic, not
                // incidents.
                tracing::debug!(error = %err, "rejected session token");
                None
            }
        }
    }
}

/// Verifier used when no session secret is configured: every token is
/// rejected, so nothing authenticates and the admin surface stays
/// closed until a secret is provisioned.
pub struct DenyAllVerifier;

impl SessionVerifier for DenyAllVerifier {
    fn verify(&self, _token: &str) -> Option<SessionClaims> {
        None
    }
}

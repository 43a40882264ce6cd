//! # configs
//!
//! Layered runtime configuration: an optional `config/default.toml`
//! file overridden by `APP__`-prefixed environment variables (e.g.
//! `APP__SERVER__PORT=9000`). Every field carries a default so the
//! binary starts with nothing configured at all.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite:driftwood.db".to_string(),
        }
    }
}

/// Session verification. With no secret configured the edge gate lets
/// everything through (the page-level checks still apply); that
/// mirrors how the original deployment behaved before auth was set up.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub secret: Option<SecretString>,
    pub session_cookie: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: None,
            session_cookie: "session_token".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    pub content_prefix: String,
    pub community_prefix: String,
    pub login_path: String,
    pub setup_path: String,
    /// Seconds the gate may serve a stale protected-slug set.
    pub acl_ttl_secs: u64,
    /// Seconds the gate may serve a stale setup-completion answer.
    pub setup_ttl_secs: u64,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            content_prefix: "/contents/".to_string(),
            community_prefix: "/community/".to_string(),
            login_path: "/login".to_string(),
            setup_path: "/setup".to_string(),
            acl_ttl_secs: 60,
            setup_ttl_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub gate: GateSettings,
}

/// Loads `.env` into the process environment; missing files are fine.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

pub fn load() -> Result<Settings, ConfigError> {
    let cfg = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;
    let settings: Settings = cfg.try_deserialize()?;
    tracing::debug!(
        host = %settings.server.host,
        port = settings.server.port,
        "configuration loaded"
    );
    Ok(settings)
}

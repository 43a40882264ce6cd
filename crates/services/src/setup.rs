//! # Setup Probe
//!
//! Answers "does the site still need first-run setup" for the setup
//! gate and the `/api/setup` endpoint. The gate path is cached with
//! the same TTL machinery as the ACL probe and fails open.

use std::sync::Arc;

use domains::error::Result;
use domains::traits::AccountRepo;

use crate::cache::TtlCache;

#[derive(Clone)]
pub struct SetupService {
    accounts: Arc<dyn AccountRepo>,
}

impl SetupService {
    pub fn new(accounts: Arc<dyn AccountRepo>) -> Self {
        Self { accounts }
    }

    /// Uncached check for the API endpoint.
    pub async fn needs_setup(&self) -> Result<bool> {
        Ok(!self.accounts.admin_exists().await?)
    }
}

/// Gate-facing wrapper: cached, failing open (`None`) when the probe
/// errors so a store hiccup never locks users out of the whole site.
pub struct CachedSetupProbe {
    setup: SetupService,
    cache: TtlCache<bool>,
}

impl CachedSetupProbe {
    pub fn new(setup: SetupService, cache: TtlCache<bool>) -> Self {
        Self { setup, cache }
    }

    pub async fn needs_setup(&self) -> Option<bool> {
        if let Some(cached) = self.cache.get() {
            return Some(cached);
        }
        match self.setup.needs_setup().await {
            Ok(needs) => {
                self.cache.put(needs);
                Some(needs)
            }
            Err(err) => {
                tracing::warn!(error = %err, "setup probe failed; letting the request through");
                None
            }
        }
    }
}

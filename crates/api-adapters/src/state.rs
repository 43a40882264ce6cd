//! State shared across all request handlers.

use std::sync::Arc;

use domains::traits::SessionVerifier;
use services::{
    AclService, CachedAclResolver, CachedSetupProbe, CatalogService, CommunityService,
    MenuService, SetupService,
};

/// Routing knobs for the two gates; the binary maps its settings onto
/// this so the adapter stays configuration-agnostic.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// `false` when no session secret is configured: the edge gate
    /// passes everything through, exactly like the original deployment
    /// before auth was set up.
    pub enabled: bool,
    pub content_prefix: String,
    pub community_prefix: String,
    pub login_path: String,
    pub setup_path: String,
    pub session_cookie: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            content_prefix: "/contents/".to_string(),
            community_prefix: "/community/".to_string(),
            login_path: "/login".to_string(),
            setup_path: "/setup".to_string(),
            session_cookie: "session_token".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub menus: MenuService,
    pub catalog: CatalogService,
    pub community: CommunityService,
    pub acl: AclService,
    pub setup: SetupService,
    pub sessions: Arc<dyn SessionVerifier>,
    pub gate: Arc<GateConfig>,
    pub acl_probe: Arc<CachedAclResolver>,
    pub setup_probe: Arc<CachedSetupProbe>,
}

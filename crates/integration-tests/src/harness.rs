//! Builders wiring the fake store into real services and a real
//! router, mirroring the assembly the server binary performs.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use api_adapters::{router, AppState, GateConfig};
use services::{
    AclService, CachedAclResolver, CachedSetupProbe, CatalogService, Clock, CommunityService,
    ManualClock, MenuService, SetupService, TtlCache,
};

use crate::fakes::{FakeStore, StaticVerifier};

pub struct TestServices {
    pub store: Arc<FakeStore>,
    pub menus: MenuService,
    pub catalog: CatalogService,
    pub community: CommunityService,
    pub acl: AclService,
}

/// Services over a fresh fake store, for suites that bypass HTTP.
pub fn test_services() -> TestServices {
    let store = Arc::new(FakeStore::new());
    TestServices {
        menus: MenuService::new(store.clone(), store.clone(), store.clone()),
        catalog: CatalogService::new(store.clone()),
        community: CommunityService::new(store.clone()),
        acl: AclService::new(store.clone(), store.clone()),
        store,
    }
}

/// The full router over a fake store, with the gate caches driven by a
/// manual clock so suites can expire them on demand.
pub fn test_router(store: Arc<FakeStore>, clock: Arc<ManualClock>, ttl: Duration) -> Router {
    let clock: Arc<dyn Clock> = clock;
    let menus = MenuService::new(store.clone(), store.clone(), store.clone());
    let catalog = CatalogService::new(store.clone());
    let community = CommunityService::new(store.clone());
    let acl = AclService::new(store.clone(), store.clone());
    let setup = SetupService::new(store.clone());

    let acl_probe = Arc::new(CachedAclResolver::new(
        acl.clone(),
        TtlCache::new(ttl, clock.clone()),
    ));
    let setup_probe = Arc::new(CachedSetupProbe::new(
        setup.clone(),
        TtlCache::new(ttl, clock),
    ));

    router(AppState {
        menus,
        catalog,
        community,
        acl,
        setup,
        sessions: Arc::new(StaticVerifier),
        gate: Arc::new(GateConfig::default()),
        acl_probe,
        setup_probe,
    })
}

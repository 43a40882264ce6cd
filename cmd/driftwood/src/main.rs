//! # driftwood
//!
//! The server binary: wires the SQLite adapters into the services,
//! seeds what must exist, and serves the router.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use api_adapters::{router, AppState, GateConfig};
use auth_adapters::{DenyAllVerifier, JwtSessionVerifier};
use domains::traits::{AccountRepo, CatalogRepo, CommunityRepo, MenuRepo, SessionVerifier};
use services::{
    AclService, CachedAclResolver, CachedSetupProbe, CatalogService, Clock, CommunityService,
    MenuService, SetupService, SystemClock, TtlCache,
};
use storage_adapters::{
    SqliteAccountRepo, SqliteCatalogRepo, SqliteCommunityRepo, SqliteMenuRepo,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    configs::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = configs::load()?;

    // 1. Storage
    let pool = storage_adapters::connect(&settings.database.url).await?;
    storage_adapters::init_schema(&pool).await?;

    let catalog_repo: Arc<dyn CatalogRepo> = Arc::new(SqliteCatalogRepo::new(pool.clone()));
    let community_repo: Arc<dyn CommunityRepo> = Arc::new(SqliteCommunityRepo::new(pool.clone()));
    let menu_repo: Arc<dyn MenuRepo> = Arc::new(SqliteMenuRepo::new(pool.clone()));
    let account_repo: Arc<dyn AccountRepo> = Arc::new(SqliteAccountRepo::new(pool));

    // 2. Sessions: without a secret the edge gate stays open and the
    // admin surface stays closed.
    let sessions: Arc<dyn SessionVerifier> = match &settings.auth.secret {
        Some(secret) => Arc::new(JwtSessionVerifier::new(secret)),
        None => {
            tracing::warn!("no session secret configured; admin API is unreachable");
            Arc::new(DenyAllVerifier)
        }
    };

    // 3. Services and gate probes
    let menus = MenuService::new(menu_repo.clone(), catalog_repo.clone(), community_repo.clone());
    let catalog = CatalogService::new(catalog_repo.clone());
    let community = CommunityService::new(community_repo);
    let acl = AclService::new(menu_repo, catalog_repo);
    let setup = SetupService::new(account_repo);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let acl_probe = Arc::new(CachedAclResolver::new(
        acl.clone(),
        TtlCache::new(Duration::from_secs(settings.gate.acl_ttl_secs), clock.clone()),
    ));
    let setup_probe = Arc::new(CachedSetupProbe::new(
        setup.clone(),
        TtlCache::new(Duration::from_secs(settings.gate.setup_ttl_secs), clock),
    ));

    // 4. Explicit startup seeding; read paths stay side-effect free.
    community.ensure_default_boards().await?;

    let gate = Arc::new(GateConfig {
        enabled: settings.auth.secret.is_some(),
        content_prefix: settings.gate.content_prefix.clone(),
        community_prefix: settings.gate.community_prefix.clone(),
        login_path: settings.gate.login_path.clone(),
        setup_path: settings.gate.setup_path.clone(),
        session_cookie: settings.auth.session_cookie.clone(),
    });

    let state = AppState {
        menus,
        catalog,
        community,
        acl,
        setup,
        sessions,
        gate,
        acl_probe,
        setup_probe,
    };

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 driftwood listening on http://{addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

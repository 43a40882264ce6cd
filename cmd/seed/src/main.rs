//! Seeds a fresh database: default boards, the default main menu with
//! its backing categories, an initial admin account, and a little demo
//! content. Safe to re-run; existing data is left alone.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use domains::defaults::{DEFAULT_MAIN_MENU, MAIN_MENU_KEY};
use domains::models::{NewAccount, NewContent, NewPost};
use domains::traits::{AccountRepo, CatalogRepo, CommunityRepo, MenuRepo};
use services::{CommunityService, MenuItemInput, MenuService};
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
    let pool = storage_adapters::connect(&settings.database.url).await?;
    storage_adapters::init_schema(&pool).await?;

    let catalog_repo: Arc<dyn CatalogRepo> = Arc::new(SqliteCatalogRepo::new(pool.clone()));
    let community_repo: Arc<dyn CommunityRepo> = Arc::new(SqliteCommunityRepo::new(pool.clone()));
    let menu_repo: Arc<dyn MenuRepo> = Arc::new(SqliteMenuRepo::new(pool.clone()));
    let account_repo = SqliteAccountRepo::new(pool);

    let community = CommunityService::new(community_repo.clone());
    let menus = MenuService::new(menu_repo.clone(), catalog_repo.clone(), community_repo);

    community.ensure_default_boards().await?;

    // Persist the default main menu only when nothing is there yet.
    let already_seeded = match menu_repo.find_menu(MAIN_MENU_KEY).await? {
        Some(menu) => !menu_repo.list_items(menu.id).await?.is_empty(),
        None => false,
    };
    if already_seeded {
        tracing::info!("main menu already has items; leaving it alone");
    } else {
        for entry in DEFAULT_MAIN_MENU {
            menus
                .create_item(
                    MAIN_MENU_KEY,
                    MenuItemInput {
                        label: Some(entry.label.to_string()),
                        href: Some(entry.href.to_string()),
                        order: Some(entry.order),
                        requires_auth: Some(entry.requires_auth),
                        link_type: Some(entry.link_type),
                        ..Default::default()
                    },
                )
                .await?;
        }
        tracing::info!(items = DEFAULT_MAIN_MENU.len(), "seeded the default main menu");

        // A couple of demo rows so the pages are not empty.
        if let Some(category) = catalog_repo.find_category_by_slug("casino").await? {
            catalog_repo
                .create_content(NewContent {
                    category_id: category.id,
                    title: "Welcome".into(),
                    slug: "welcome".into(),
                    body: "First catalog entry.".into(),
                })
                .await?;
        }
        community
            .create_post(NewPost {
                board_key: "free".into(),
                title: "Hello".into(),
                body: "First post.".into(),
            })
            .await?;
    }

    if account_repo.admin_exists().await? {
        tracing::info!("admin account already present");
    } else {
        let admin = account_repo
            .create_admin(NewAccount {
                email: "admin@example.com".into(),
                role: "admin".into(),
            })
            .await?;
        tracing::info!(email = %admin.email, "created the initial admin account");
    }

    tracing::info!("seed complete");
    Ok(())
}

//! In-memory fake store. Behaves like the SQLite adapters (same
//! guards, same atomicity contracts), with switches to make any port
//! fail on demand.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domains::defaults::menu_name_for_key;
use domains::error::{DomainError, Result};
use domains::links::category_href;
use domains::models::{
    Account, Board, BoardUpdate, Category, CategoryFilter, CategoryPatch, CategoryUpsert, Content,
    ItemOrder, LinkType, Menu, MenuItem, MenuItemPatch, NewAccount, NewBoard, NewContent,
    NewMenuItem, NewPost, Post, SessionClaims,
};
use domains::traits::{AccountRepo, CatalogRepo, CommunityRepo, MenuRepo, SessionVerifier};

#[derive(Default)]
pub struct StoreState {
    pub categories: Vec<Category>,
    pub contents: Vec<Content>,
    pub boards: Vec<Board>,
    pub posts: Vec<Post>,
    pub menus: Vec<Menu>,
    pub items: Vec<MenuItem>,
    pub admin_exists: bool,
}

/// Per-port failure switches; a raised switch makes every call on that
/// port return a storage error without touching state.
#[derive(Default)]
pub struct FailureFlags {
    pub catalog: AtomicBool,
    pub community: AtomicBool,
    pub menus: AtomicBool,
    pub accounts: AtomicBool,
    /// Fails only `restore_category`, for the atomicity tests.
    pub restore: AtomicBool,
}

impl FailureFlags {
    fn check(&self, flag: &AtomicBool) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("injected failure".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
    pub fail: FailureFlags,
}

impl FakeStore {
    pub fn new() -> Self {
        let store = Self::default();
        // Most tests assume a set-up site; the setup-gate tests flip
        // this off themselves.
        store.state.lock().unwrap().admin_exists = true;
        store
    }

    /// Direct state access for arranging and asserting.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn insert_category(&self, slug: &str, visible: bool, requires_auth: bool) -> Category {
        let now = Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            name: slug.to_string(),
            slug: slug.to_string(),
            order: 0,
            is_visible: visible,
            requires_auth,
            thumbnail_url: None,
            description: None,
            created_at: now,
            updated_at: now,
        };
        self.mutate(|s| s.categories.push(category.clone()));
        category
    }

    pub fn insert_content(&self, category_id: Uuid, title: &str) -> Content {
        let now = Utc::now();
        let content = Content {
            id: Uuid::now_v7(),
            category_id,
            title: title.to_string(),
            slug: title.to_string(),
            body: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.mutate(|s| s.contents.push(content.clone()));
        content
    }
}

#[async_trait]
impl CatalogRepo for FakeStore {
    async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>> {
        self.fail.check(&self.fail.catalog)?;
        let mut out: Vec<Category> = self.mutate(|s| {
            s.categories
                .iter()
                .filter(|c| match filter {
                    CategoryFilter::Visible => c.is_visible,
                    CategoryFilter::Hidden => !c.is_visible,
                    CategoryFilter::All => true,
                })
                .cloned()
                .collect()
        });
        out.sort_by_key(|c| c.order);
        Ok(out)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>> {
        self.fail.check(&self.fail.catalog)?;
        Ok(self.mutate(|s| s.categories.iter().find(|c| c.id == id).cloned()))
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        self.fail.check(&self.fail.catalog)?;
        Ok(self.mutate(|s| s.categories.iter().find(|c| c.slug == slug).cloned()))
    }

    async fn categories_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>> {
        self.fail.check(&self.fail.catalog)?;
        Ok(self.mutate(|s| {
            s.categories
                .iter()
                .filter(|c| ids.contains(&c.id))
                .cloned()
                .collect()
        }))
    }

    async fn categories_by_slugs(&self, slugs: &[String]) -> Result<Vec<Category>> {
        self.fail.check(&self.fail.catalog)?;
        Ok(self.mutate(|s| {
            s.categories
                .iter()
                .filter(|c| slugs.contains(&c.slug))
                .cloned()
                .collect()
        }))
    }

    async fn protected_categories(&self) -> Result<Vec<Category>> {
        self.fail.check(&self.fail.catalog)?;
        Ok(self.mutate(|s| {
            s.categories
                .iter()
                .filter(|c| c.requires_auth)
                .cloned()
                .collect()
        }))
    }

    async fn upsert_category_by_slug(&self, slug: &str, up: CategoryUpsert) -> Result<Category> {
        self.fail.check(&self.fail.catalog)?;
        let now = Utc::now();
        Ok(self.mutate(|s| {
            if let Some(existing) = s.categories.iter_mut().find(|c| c.slug == slug) {
                existing.name = up.name.clone();
                existing.is_visible = up.is_visible;
                if let Some(order) = up.order {
                    existing.order = order;
                }
                existing.updated_at = now;
                existing.clone()
            } else {
                let category = Category {
                    id: Uuid::now_v7(),
                    name: up.name.clone(),
                    slug: slug.to_string(),
                    order: up.order.unwrap_or(0),
                    is_visible: up.is_visible,
                    requires_auth: false,
                    thumbnail_url: None,
                    description: None,
                    created_at: now,
                    updated_at: now,
                };
                s.categories.push(category.clone());
                category
            }
        }))
    }

    async fn update_category(&self, id: Uuid, patch: CategoryPatch) -> Result<Category> {
        self.fail.check(&self.fail.catalog)?;
        self.mutate(|s| {
            let category = s
                .categories
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(DomainError::not_found("category"))?;
            if let Some(name) = patch.name {
                category.name = name;
            }
            if let Some(slug) = patch.slug {
                category.slug = slug;
            }
            if let Some(v) = patch.is_visible {
                category.is_visible = v;
            }
            if let Some(r) = patch.requires_auth {
                category.requires_auth = r;
            }
            if let Some(t) = patch.thumbnail_url {
                category.thumbnail_url = Some(t);
            }
            if let Some(d) = patch.description {
                category.description = Some(d);
            }
            category.updated_at = Utc::now();
            Ok(category.clone())
        })
    }

    async fn set_category_visibility(&self, id: Uuid, visible: bool) -> Result<()> {
        self.fail.check(&self.fail.catalog)?;
        self.mutate(|s| {
            let category = s
                .categories
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(DomainError::not_found("category"))?;
            category.is_visible = visible;
            category.updated_at = Utc::now();
            Ok(())
        })
    }

    async fn restore_category(&self, id: Uuid, menu_key: &str) -> Result<(Category, MenuItem)> {
        self.fail.check(&self.fail.catalog)?;
        // Atomicity contract: an injected failure applies neither
        // effect.
        self.fail.check(&self.fail.restore)?;
        self.mutate(|s| {
            let category = s
                .categories
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(DomainError::not_found("category"))?;
            if category.is_visible {
                return Err(DomainError::AlreadyVisible);
            }
            category.is_visible = true;
            category.updated_at = Utc::now();
            let category = category.clone();

            let menu_id = match s.menus.iter().find(|m| m.key == menu_key) {
                Some(menu) => menu.id,
                None => {
                    let menu = Menu {
                        id: Uuid::now_v7(),
                        key: menu_key.to_string(),
                        name: menu_name_for_key(menu_key).to_string(),
                    };
                    let id = menu.id;
                    s.menus.push(menu);
                    id
                }
            };
            let next_order = s
                .items
                .iter()
                .filter(|i| i.menu_id == menu_id)
                .map(|i| i.order)
                .max()
                .unwrap_or(0)
                + 1;
            let item = MenuItem {
                id: Uuid::now_v7(),
                menu_id,
                label: category.name.clone(),
                href: category_href(&category.slug),
                order: next_order,
                is_visible: true,
                is_external: false,
                open_in_new: false,
                requires_auth: false,
                badge_text: None,
                link_type: LinkType::Category,
                linked_id: Some(category.id),
            };
            s.items.push(item.clone());
            Ok((category, item))
        })
    }

    async fn delete_category(&self, id: Uuid) -> Result<()> {
        self.fail.check(&self.fail.catalog)?;
        self.mutate(|s| {
            let category = s
                .categories
                .iter()
                .find(|c| c.id == id)
                .ok_or(DomainError::not_found("category"))?;
            if category.is_visible {
                return Err(DomainError::CategoryVisible);
            }
            let owned = s.contents.iter().filter(|c| c.category_id == id).count();
            if owned > 0 {
                return Err(DomainError::HasContent(owned as u64));
            }
            s.categories.retain(|c| c.id != id);
            Ok(())
        })
    }

    async fn content_count(&self, category_id: Uuid) -> Result<u64> {
        self.fail.check(&self.fail.catalog)?;
        Ok(self.mutate(|s| s.contents.iter().filter(|c| c.category_id == category_id).count())
            as u64)
    }

    async fn move_contents(&self, from: Uuid, to: Uuid) -> Result<u64> {
        self.fail.check(&self.fail.catalog)?;
        Ok(self.mutate(|s| {
            let mut moved = 0;
            for content in s.contents.iter_mut().filter(|c| c.category_id == from) {
                content.category_id = to;
                content.updated_at = Utc::now();
                moved += 1;
            }
            moved
        }))
    }

    async fn create_content(&self, content: NewContent) -> Result<Content> {
        self.fail.check(&self.fail.catalog)?;
        let now = Utc::now();
        let content = Content {
            id: Uuid::now_v7(),
            category_id: content.category_id,
            title: content.title,
            slug: content.slug,
            body: content.body,
            created_at: now,
            updated_at: now,
        };
        self.mutate(|s| s.contents.push(content.clone()));
        Ok(content)
    }

    async fn list_contents(&self, category_id: Uuid) -> Result<Vec<Content>> {
        self.fail.check(&self.fail.catalog)?;
        Ok(self.mutate(|s| {
            s.contents
                .iter()
                .filter(|c| c.category_id == category_id)
                .cloned()
                .collect()
        }))
    }
}

#[async_trait]
impl CommunityRepo for FakeStore {
    async fn seed_boards_if_empty(&self, boards: &[NewBoard]) -> Result<bool> {
        self.fail.check(&self.fail.community)?;
        let now = Utc::now();
        Ok(self.mutate(|s| {
            if !s.boards.is_empty() {
                return false;
            }
            for b in boards {
                s.boards.push(Board {
                    id: Uuid::now_v7(),
                    key: b.key.clone(),
                    name: b.name.clone(),
                    description: b.description.clone(),
                    order: b.order,
                    is_visible: b.is_visible,
                    created_at: now,
                });
            }
            true
        }))
    }

    async fn list_boards(&self, include_hidden: bool) -> Result<Vec<Board>> {
        self.fail.check(&self.fail.community)?;
        let mut out: Vec<Board> = self.mutate(|s| {
            s.boards
                .iter()
                .filter(|b| include_hidden || b.is_visible)
                .cloned()
                .collect()
        });
        out.sort_by_key(|b| b.order);
        Ok(out)
    }

    async fn find_board(&self, id: Uuid) -> Result<Option<Board>> {
        self.fail.check(&self.fail.community)?;
        Ok(self.mutate(|s| s.boards.iter().find(|b| b.id == id).cloned()))
    }

    async fn find_board_by_key(&self, key: &str) -> Result<Option<Board>> {
        self.fail.check(&self.fail.community)?;
        Ok(self.mutate(|s| s.boards.iter().find(|b| b.key == key).cloned()))
    }

    async fn count_boards(&self) -> Result<u64> {
        self.fail.check(&self.fail.community)?;
        Ok(self.mutate(|s| s.boards.len()) as u64)
    }

    async fn create_board(&self, board: NewBoard) -> Result<Board> {
        self.fail.check(&self.fail.community)?;
        let created = Board {
            id: Uuid::now_v7(),
            key: board.key,
            name: board.name,
            description: board.description,
            order: board.order,
            is_visible: board.is_visible,
            created_at: Utc::now(),
        };
        self.mutate(|s| {
            if s.boards.iter().any(|b| b.key == created.key) {
                return Err(DomainError::DuplicateKey(created.key.clone()));
            }
            s.boards.push(created.clone());
            Ok(created)
        })
    }

    async fn update_board(&self, id: Uuid, update: BoardUpdate) -> Result<(Board, u64)> {
        self.fail.check(&self.fail.community)?;
        self.mutate(|s| {
            let old_key = s
                .boards
                .iter()
                .find(|b| b.id == id)
                .ok_or(DomainError::not_found("board"))?
                .key
                .clone();

            let mut retagged = 0;
            if update.key != old_key {
                for post in s
                    .posts
                    .iter_mut()
                    .filter(|p| p.board_key.eq_ignore_ascii_case(&old_key))
                {
                    post.board_key = update.key.clone();
                    retagged += 1;
                }
            }
            let board = s.boards.iter_mut().find(|b| b.id == id).expect("checked");
            board.key = update.key;
            board.name = update.name;
            board.description = update.description;
            board.is_visible = update.is_visible;
            Ok((board.clone(), retagged))
        })
    }

    async fn delete_board(&self, id: Uuid) -> Result<()> {
        self.fail.check(&self.fail.community)?;
        self.mutate(|s| {
            let board = s
                .boards
                .iter()
                .find(|b| b.id == id)
                .ok_or(DomainError::not_found("board"))?;
            let posts = s
                .posts
                .iter()
                .filter(|p| p.board_key.eq_ignore_ascii_case(&board.key))
                .count();
            if posts > 0 {
                return Err(DomainError::BoardHasPosts(posts as u64));
            }
            s.boards.retain(|b| b.id != id);
            Ok(())
        })
    }

    async fn reorder_boards(&self, orders: &[ItemOrder]) -> Result<()> {
        self.fail.check(&self.fail.community)?;
        self.mutate(|s| {
            // All-or-nothing: validate before touching anything.
            for entry in orders {
                if !s.boards.iter().any(|b| b.id == entry.id) {
                    return Err(DomainError::not_found("board"));
                }
            }
            for entry in orders {
                if let Some(board) = s.boards.iter_mut().find(|b| b.id == entry.id) {
                    board.order = entry.order;
                }
            }
            Ok(())
        })
    }

    async fn count_posts(&self, board_key: &str) -> Result<u64> {
        self.fail.check(&self.fail.community)?;
        Ok(self.mutate(|s| {
            s.posts
                .iter()
                .filter(|p| p.board_key.eq_ignore_ascii_case(board_key))
                .count()
        }) as u64)
    }

    async fn list_posts(&self, board_key: &str) -> Result<Vec<Post>> {
        self.fail.check(&self.fail.community)?;
        Ok(self.mutate(|s| {
            s.posts
                .iter()
                .filter(|p| p.board_key.eq_ignore_ascii_case(board_key))
                .cloned()
                .collect()
        }))
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        self.fail.check(&self.fail.community)?;
        let post = Post {
            id: Uuid::now_v7(),
            board_key: post.board_key,
            title: post.title,
            body: post.body,
            created_at: Utc::now(),
        };
        self.mutate(|s| s.posts.push(post.clone()));
        Ok(post)
    }
}

#[async_trait]
impl MenuRepo for FakeStore {
    async fn find_menu(&self, key: &str) -> Result<Option<Menu>> {
        self.fail.check(&self.fail.menus)?;
        Ok(self.mutate(|s| s.menus.iter().find(|m| m.key == key).cloned()))
    }

    async fn get_or_create_menu(&self, key: &str, name: &str) -> Result<Menu> {
        self.fail.check(&self.fail.menus)?;
        Ok(self.mutate(|s| {
            if let Some(menu) = s.menus.iter().find(|m| m.key == key) {
                return menu.clone();
            }
            let menu = Menu {
                id: Uuid::now_v7(),
                key: key.to_string(),
                name: name.to_string(),
            };
            s.menus.push(menu.clone());
            menu
        }))
    }

    async fn list_items(&self, menu_id: Uuid) -> Result<Vec<MenuItem>> {
        self.fail.check(&self.fail.menus)?;
        let mut out: Vec<MenuItem> = self.mutate(|s| {
            s.items
                .iter()
                .filter(|i| i.menu_id == menu_id)
                .cloned()
                .collect()
        });
        out.sort_by_key(|i| i.order);
        Ok(out)
    }

    async fn find_item(&self, id: Uuid) -> Result<Option<MenuItem>> {
        self.fail.check(&self.fail.menus)?;
        Ok(self.mutate(|s| s.items.iter().find(|i| i.id == id).cloned()))
    }

    async fn create_item(&self, item: NewMenuItem) -> Result<MenuItem> {
        self.fail.check(&self.fail.menus)?;
        let item = MenuItem {
            id: Uuid::now_v7(),
            menu_id: item.menu_id,
            label: item.label,
            href: item.href,
            order: item.order,
            is_visible: item.is_visible,
            is_external: item.is_external,
            open_in_new: item.open_in_new,
            requires_auth: item.requires_auth,
            badge_text: item.badge_text,
            link_type: item.link_type,
            linked_id: item.linked_id,
        };
        self.mutate(|s| s.items.push(item.clone()));
        Ok(item)
    }

    async fn update_item(&self, id: Uuid, patch: MenuItemPatch) -> Result<MenuItem> {
        self.fail.check(&self.fail.menus)?;
        self.mutate(|s| {
            let item = s
                .items
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or(DomainError::not_found("menu item"))?;
            if let Some(label) = patch.label {
                item.label = label;
            }
            if let Some(v) = patch.is_visible {
                item.is_visible = v;
            }
            if let Some(v) = patch.is_external {
                item.is_external = v;
            }
            if let Some(v) = patch.open_in_new {
                item.open_in_new = v;
            }
            if let Some(v) = patch.requires_auth {
                item.requires_auth = v;
            }
            item.href = patch.href;
            item.badge_text = patch.badge_text;
            item.link_type = patch.link_type;
            item.linked_id = patch.linked_id;
            Ok(item.clone())
        })
    }

    async fn delete_item(&self, id: Uuid) -> Result<()> {
        self.fail.check(&self.fail.menus)?;
        self.mutate(|s| {
            let before = s.items.len();
            s.items.retain(|i| i.id != id);
            if s.items.len() == before {
                return Err(DomainError::not_found("menu item"));
            }
            Ok(())
        })
    }

    async fn items_requiring_auth(&self) -> Result<Vec<MenuItem>> {
        self.fail.check(&self.fail.menus)?;
        Ok(self.mutate(|s| {
            s.items
                .iter()
                .filter(|i| i.requires_auth)
                .cloned()
                .collect()
        }))
    }

    async fn reorder_items(&self, menu_id: Uuid, orders: &[ItemOrder]) -> Result<()> {
        self.fail.check(&self.fail.menus)?;
        self.mutate(|s| {
            for entry in orders {
                if !s.items.iter().any(|i| i.id == entry.id) {
                    return Err(DomainError::not_found("menu item"));
                }
            }
            for entry in orders {
                let mut linked = None;
                if let Some(item) = s.items.iter_mut().find(|i| i.id == entry.id) {
                    item.order = entry.order;
                    item.menu_id = menu_id;
                    if item.link_type == LinkType::Category {
                        linked = item.linked_id;
                    }
                }
                if let Some(category_id) = linked {
                    if let Some(category) =
                        s.categories.iter_mut().find(|c| c.id == category_id)
                    {
                        category.order = entry.order;
                    }
                }
            }
            Ok(())
        })
    }
}

#[async_trait]
impl AccountRepo for FakeStore {
    async fn admin_exists(&self) -> Result<bool> {
        self.fail.check(&self.fail.accounts)?;
        Ok(self.mutate(|s| s.admin_exists))
    }

    async fn create_admin(&self, account: NewAccount) -> Result<Account> {
        self.fail.check(&self.fail.accounts)?;
        self.mutate(|s| s.admin_exists = true);
        Ok(Account {
            id: Uuid::now_v7(),
            email: account.email,
            role: account.role,
            created_at: Utc::now(),
        })
    }
}

/// Fixed-token verifier: `"admin-token"` is an admin session,
/// `"user-token"` a plain one, everything else anonymous.
pub struct StaticVerifier;

impl SessionVerifier for StaticVerifier {
    fn verify(&self, token: &str) -> Option<SessionClaims> {
        match token {
            "admin-token" => Some(SessionClaims {
                sub: "admin-1".into(),
                role: "admin".into(),
            }),
            "user-token" => Some(SessionClaims {
                sub: "user-1".into(),
                role: "user".into(),
            }),
            _ => None,
        }
    }
}

//! # Core Traits (Ports)
//!
//! Any store adapter must implement these traits to be wired into the
//! binary. Multi-step operations documented as atomic (restore, key
//! rename, guarded deletes) must run inside a single transaction of the
//! backing store; partial application is an invariant violation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Account, Board, BoardUpdate, Category, CategoryFilter, CategoryPatch, CategoryUpsert, Content,
    ItemOrder, Menu, MenuItem, MenuItemPatch, NewAccount, NewBoard, NewContent, NewMenuItem,
    NewPost, Post, SessionClaims,
};

/// Persistence contract for categories and the contents they own.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>>;
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>>;
    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>>;
    async fn categories_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>>;
    async fn categories_by_slugs(&self, slugs: &[String]) -> Result<Vec<Category>>;
    /// Categories whose own requires-auth flag is set, independent of
    /// any menu state.
    async fn protected_categories(&self) -> Result<Vec<Category>>;

    /// Creates the category if the slug is absent, else updates
    /// name/visibility (and order when given).
    async fn upsert_category_by_slug(&self, slug: &str, up: CategoryUpsert) -> Result<Category>;
    async fn update_category(&self, id: Uuid, patch: CategoryPatch) -> Result<Category>;
    async fn set_category_visibility(&self, id: Uuid, visible: bool) -> Result<()>;

    /// Atomically sets the category visible again and appends a
    /// category-type menu item at the end of the target menu's order
    /// sequence. Fails with `AlreadyVisible` when the category is not
    /// hidden; both effects or neither.
    async fn restore_category(&self, id: Uuid, menu_key: &str) -> Result<(Category, MenuItem)>;

    /// Permanently removes the row. Fails with `CategoryVisible` while
    /// visible and `HasContent` while contents remain; the checks and
    /// the delete share one transaction.
    async fn delete_category(&self, id: Uuid) -> Result<()>;

    async fn content_count(&self, category_id: Uuid) -> Result<u64>;
    /// Reassigns every content row from one category to another,
    /// returning the moved count. Validation belongs to the caller.
    async fn move_contents(&self, from: Uuid, to: Uuid) -> Result<u64>;
    async fn create_content(&self, content: NewContent) -> Result<Content>;
    async fn list_contents(&self, category_id: Uuid) -> Result<Vec<Content>>;
}

/// Persistence contract for boards and the posts tagged with their keys.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommunityRepo: Send + Sync {
    /// Inserts the given boards only when the board table is empty.
    /// Returns whether anything was inserted. Check and insert share
    /// one transaction so concurrent callers cannot double-seed.
    async fn seed_boards_if_empty(&self, boards: &[NewBoard]) -> Result<bool>;

    async fn list_boards(&self, include_hidden: bool) -> Result<Vec<Board>>;
    async fn find_board(&self, id: Uuid) -> Result<Option<Board>>;
    async fn find_board_by_key(&self, key: &str) -> Result<Option<Board>>;
    async fn count_boards(&self) -> Result<u64>;
    async fn create_board(&self, board: NewBoard) -> Result<Board>;

    /// Applies a fully-resolved update. When the key changes, every
    /// post carrying the old key (case-insensitive) is retagged to the
    /// new key in the same transaction; the retagged count is returned.
    async fn update_board(&self, id: Uuid, update: BoardUpdate) -> Result<(Board, u64)>;

    /// Deletes the board. Fails with `BoardHasPosts` while any post
    /// (case-insensitive key match) references it; the check and the
    /// delete share one transaction.
    async fn delete_board(&self, id: Uuid) -> Result<()>;

    /// Applies all order updates atomically; no partial reorder.
    async fn reorder_boards(&self, orders: &[ItemOrder]) -> Result<()>;

    async fn count_posts(&self, board_key: &str) -> Result<u64>;
    async fn list_posts(&self, board_key: &str) -> Result<Vec<Post>>;
    async fn create_post(&self, post: NewPost) -> Result<Post>;
}

/// Persistence contract for menus and their ordered items.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MenuRepo: Send + Sync {
    async fn find_menu(&self, key: &str) -> Result<Option<Menu>>;
    async fn get_or_create_menu(&self, key: &str, name: &str) -> Result<Menu>;

    /// Items of a menu, ordered by `order` ascending.
    async fn list_items(&self, menu_id: Uuid) -> Result<Vec<MenuItem>>;
    async fn find_item(&self, id: Uuid) -> Result<Option<MenuItem>>;
    async fn create_item(&self, item: NewMenuItem) -> Result<MenuItem>;
    async fn update_item(&self, id: Uuid, patch: MenuItemPatch) -> Result<MenuItem>;
    async fn delete_item(&self, id: Uuid) -> Result<()>;

    /// Items with the requires-auth flag set and a resolvable link
    /// type; input to the ACL resolver.
    async fn items_requiring_auth(&self) -> Result<Vec<MenuItem>>;

    /// Applies all order updates atomically, re-homing items to
    /// `menu_id` and mirroring the new order onto linked categories in
    /// the same transaction.
    async fn reorder_items(&self, menu_id: Uuid, orders: &[ItemOrder]) -> Result<()>;
}

/// Minimal account lookups for the setup gate and the seed binary.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn admin_exists(&self) -> Result<bool>;
    async fn create_admin(&self, account: NewAccount) -> Result<Account>;
}

/// Validates session tokens minted by the external auth collaborator.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionVerifier: Send + Sync {
    /// Returns the claims for a valid, unexpired token; `None` for
    /// anything else. Never errors: an unverifiable token is simply
    /// an anonymous request.
    fn verify(&self, token: &str) -> Option<SessionClaims>;
}

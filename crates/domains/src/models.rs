//! # Domain Models
//!
//! These structs represent the core entities of driftwood: the product
//! catalog (categories and contents), the community side (boards and
//! posts), and the navigation menu graph that ties both together.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named bucket of catalog contents with a unique, URL-safe slug.
///
/// Categories are soft-deleted: removing one from the menu only flips
/// `is_visible`; the row (and its slug reservation) survives until an
/// explicit permanent delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Globally unique among categories; reserved even while hidden.
    pub slug: String,
    pub order: i64,
    pub is_visible: bool,
    /// Defense-in-depth flag read by the ACL resolver independently of
    /// any menu state.
    pub requires_auth: bool,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single catalog item owned by a [`Category`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A discussion board scoped under the community group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    /// Globally unique, slug-like key. Posts reference boards by this
    /// key (matched case-insensitively), not by id.
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub order: i64,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

/// The fundamental unit of community conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    /// Board key at the time of posting; retagged in bulk when the
    /// board's key is renamed.
    pub board_key: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A named collection of [`MenuItem`]s (e.g. "main", "footer").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: Uuid,
    pub key: String,
    pub name: String,
}

/// Discriminates what a menu item links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Category,
    Community,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Category => "category",
            LinkType::Community => "community",
        }
    }
}

/// Ordered navigation entry, linking either to a category or to the
/// community group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub label: String,
    pub href: String,
    pub order: i64,
    pub is_visible: bool,
    pub is_external: bool,
    pub open_in_new: bool,
    pub requires_auth: bool,
    pub badge_text: Option<String>,
    pub link_type: LinkType,
    /// The backing [`Category`] when `link_type` is `Category`.
    pub linked_id: Option<Uuid>,
}

/// Minimal account row; only the role matters to this crate. Credential
/// storage and login flows live outside the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Claims carried by a verified session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: String,
}

impl SessionClaims {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

// ---------------------------------------------------------------------------
// Write-side payloads consumed by the port traits.
// ---------------------------------------------------------------------------

/// Fields applied by [`upsert_category_by_slug`]: updates name/visibility
/// (and order when given) on an existing row, or creates the row with
/// `order.unwrap_or(0)`.
///
/// [`upsert_category_by_slug`]: crate::traits::CatalogRepo::upsert_category_by_slug
#[derive(Debug, Clone)]
pub struct CategoryUpsert {
    pub name: String,
    pub is_visible: bool,
    pub order: Option<i64>,
}

/// Partial category update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub is_visible: Option<bool>,
    pub requires_auth: Option<bool>,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewContent {
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct NewBoard {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub order: i64,
    pub is_visible: bool,
}

/// Fully-resolved board update; the caller computes every final value.
/// A changed `key` retags all posts carrying the old key in the same
/// transaction as the rename.
#[derive(Debug, Clone)]
pub struct BoardUpdate {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub is_visible: bool,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub board_key: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub menu_id: Uuid,
    pub label: String,
    pub href: String,
    pub order: i64,
    pub is_visible: bool,
    pub is_external: bool,
    pub open_in_new: bool,
    pub requires_auth: bool,
    pub badge_text: Option<String>,
    pub link_type: LinkType,
    pub linked_id: Option<Uuid>,
}

/// Partial menu-item update. Link-derived fields (`href`, `link_type`,
/// `linked_id`, `badge_text`) are always written because the caller has
/// already re-resolved them; the rest follow patch semantics.
#[derive(Debug, Clone)]
pub struct MenuItemPatch {
    pub label: Option<String>,
    pub is_visible: Option<bool>,
    pub is_external: Option<bool>,
    pub open_in_new: Option<bool>,
    pub requires_auth: Option<bool>,
    pub href: String,
    pub badge_text: Option<String>,
    pub link_type: LinkType,
    pub linked_id: Option<Uuid>,
}

/// One entry of a bulk reorder request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOrder {
    pub id: Uuid,
    pub order: i64,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub role: String,
}

/// Which visibility slice of the category table to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Visible,
    Hidden,
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LinkType::Category).unwrap(),
            "\"category\""
        );
        assert_eq!(
            serde_json::from_str::<LinkType>("\"community\"").unwrap(),
            LinkType::Community
        );
    }

    #[test]
    fn admin_role_check_is_case_insensitive() {
        let claims = SessionClaims {
            sub: "u1".into(),
            role: "ADMIN".into(),
        };
        assert!(claims.is_admin());
        let claims = SessionClaims {
            sub: "u2".into(),
            role: "user".into(),
        };
        assert!(!claims.is_admin());
    }
}

//! # Menu Graph Service
//!
//! Owns the ordered tree of navigation items: link-type resolution,
//! the coupling between category-type items and their backing category
//! rows, default synthesis for empty menus, and atomic reordering.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domains::defaults::{menu_name_for_key, DEFAULT_MAIN_MENU};
use domains::error::{DomainError, Result};
use domains::links::{category_href, resolve_category_slug, resolve_link_type, COMMUNITY_BASE};
use domains::models::{
    CategoryUpsert, ItemOrder, LinkType, MenuItem, MenuItemPatch, NewMenuItem,
};
use domains::traits::{CatalogRepo, CommunityRepo, MenuRepo};

use crate::community::CommunityService;

/// Admin-supplied fields of a menu item; everything optional so create
/// and update share one shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuItemInput {
    pub label: Option<String>,
    pub href: Option<String>,
    pub order: Option<i64>,
    pub is_visible: Option<bool>,
    pub is_external: Option<bool>,
    pub open_in_new: Option<bool>,
    pub requires_auth: Option<bool>,
    pub badge_text: Option<String>,
    pub link_type: Option<LinkType>,
}

/// A menu as served to navigation consumers. Synthesized defaults use
/// `default-<key>-<index>` ids, so the id is a string rather than a
/// UUID here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuView {
    pub id: String,
    pub key: String,
    pub name: String,
    pub items: Vec<MenuItemView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    pub id: String,
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

impl MenuItemView {
    fn from_item(item: MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
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
        }
    }
}

#[derive(Clone)]
pub struct MenuService {
    menus: Arc<dyn MenuRepo>,
    catalog: Arc<dyn CatalogRepo>,
    community: CommunityService,
}

impl MenuService {
    pub fn new(
        menus: Arc<dyn MenuRepo>,
        catalog: Arc<dyn CatalogRepo>,
        community: Arc<dyn CommunityRepo>,
    ) -> Self {
        Self {
            menus,
            catalog,
            community: CommunityService::new(community),
        }
    }

    /// Fetches a menu for rendering. An absent menu (or one with no
    /// persisted items) yields the synthesized default list; reading
    /// never mutates storage.
    pub async fn get_menu(&self, key: &str) -> Result<MenuView> {
        let menu = self.menus.find_menu(key).await?;

        if let Some(menu) = menu {
            let items = self.menus.list_items(menu.id).await?;
            if !items.is_empty() {
                let items = items
                    .into_iter()
                    .filter(|item| item.is_visible)
                    .map(MenuItemView::from_item)
                    .collect();
                return Ok(MenuView {
                    id: menu.id.to_string(),
                    key: menu.key,
                    name: menu.name,
                    items,
                });
            }
            return Ok(Self::default_menu(key, Some(menu.id)));
        }

        Ok(Self::default_menu(key, None))
    }

    fn default_menu(key: &str, menu_id: Option<Uuid>) -> MenuView {
        let items = DEFAULT_MAIN_MENU
            .iter()
            .enumerate()
            .map(|(index, d)| MenuItemView {
                id: format!("default-{key}-{index}"),
                label: d.label.to_string(),
                href: d.href.to_string(),
                order: d.order,
                is_visible: true,
                is_external: false,
                open_in_new: false,
                requires_auth: d.requires_auth,
                badge_text: None,
                link_type: d.link_type,
                linked_id: None,
            })
            .collect();

        MenuView {
            id: menu_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "default".to_string()),
            key: key.to_string(),
            name: menu_name_for_key(key).to_string(),
            items,
        }
    }

    /// Creates a menu item, resolving its link. Category items upsert
    /// their backing category and record `linked_id`; community items
    /// are forced onto the community base path and make sure the
    /// default boards exist.
    pub async fn create_item(&self, menu_key: &str, input: MenuItemInput) -> Result<MenuItem> {
        let label = input
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| DomainError::Validation("a menu label is required".into()))?
            .to_string();

        let menu = self
            .menus
            .get_or_create_menu(menu_key, menu_name_for_key(menu_key))
            .await?;

        let link_type = resolve_link_type(input.link_type, input.href.as_deref());
        let (href, linked_id) = match link_type {
            LinkType::Community => {
                self.community.ensure_default_boards().await?;
                (COMMUNITY_BASE.to_string(), None)
            }
            LinkType::Category => {
                let slug = resolve_category_slug(input.href.as_deref(), Some(&label));
                if slug.is_empty() {
                    return Err(DomainError::MissingSlug);
                }
                let category = self
                    .catalog
                    .upsert_category_by_slug(
                        &slug,
                        CategoryUpsert {
                            name: label.clone(),
                            is_visible: input.is_visible.unwrap_or(true),
                            order: Some(input.order.unwrap_or(0)),
                        },
                    )
                    .await?;
                (category_href(&slug), Some(category.id))
            }
        };

        self.menus
            .create_item(NewMenuItem {
                menu_id: menu.id,
                label,
                href,
                order: input.order.unwrap_or(0),
                is_visible: input.is_visible.unwrap_or(true),
                is_external: input.is_external.unwrap_or(false),
                open_in_new: input.open_in_new.unwrap_or(false),
                requires_auth: input.requires_auth.unwrap_or(false),
                badge_text: input.badge_text.filter(|b| !b.is_empty()),
                link_type,
                linked_id,
            })
            .await
    }

    /// Updates a menu item with the same link-resolution rules as
    /// create. A transition away from `category` hides the previously
    /// linked category and clears `linked_id`. A category slug change
    /// does not migrate content tagged under the old slug; moving
    /// content is an explicit, separate step.
    pub async fn update_item(&self, id: Uuid, input: MenuItemInput) -> Result<MenuItem> {
        let existing = self
            .menus
            .find_item(id)
            .await?
            .ok_or(DomainError::not_found("menu item"))?;

        let href_hint = input.href.as_deref().unwrap_or(&existing.href);
        let link_type = resolve_link_type(input.link_type, Some(href_hint));

        let (href, linked_id) = match link_type {
            LinkType::Community => {
                if existing.link_type == LinkType::Category {
                    if let Some(prev) = existing.linked_id {
                        self.catalog.set_category_visibility(prev, false).await?;
                    }
                }
                self.community.ensure_default_boards().await?;
                (COMMUNITY_BASE.to_string(), None)
            }
            LinkType::Category => {
                let label_hint = input.label.as_deref().unwrap_or(&existing.label);
                let slug = resolve_category_slug(Some(href_hint), Some(label_hint));
                if slug.is_empty() {
                    return Err(DomainError::MissingSlug);
                }

                let linked = if let Some(linked) = existing.linked_id {
                    self.catalog
                        .update_category(
                            linked,
                            domains::models::CategoryPatch {
                                name: Some(label_hint.to_string()),
                                slug: Some(slug.clone()),
                                is_visible: input.is_visible,
                                ..Default::default()
                            },
                        )
                        .await?;
                    linked
                } else {
                    self.catalog
                        .upsert_category_by_slug(
                            &slug,
                            CategoryUpsert {
                                name: label_hint.to_string(),
                                is_visible: input.is_visible.unwrap_or(true),
                                order: Some(existing.order),
                            },
                        )
                        .await?
                        .id
                };
                (category_href(&slug), Some(linked))
            }
        };

        self.menus
            .update_item(
                id,
                MenuItemPatch {
                    label: input.label,
                    is_visible: input.is_visible,
                    is_external: input.is_external,
                    open_in_new: input.open_in_new,
                    requires_auth: input.requires_auth,
                    href,
                    badge_text: input.badge_text.filter(|b| !b.is_empty()),
                    link_type,
                    linked_id,
                },
            )
            .await
    }

    /// Removes a menu item. A category-linked item hides (never
    /// deletes) its category, keeping the slug reserved for restore.
    pub async fn delete_item(&self, id: Uuid) -> Result<()> {
        let existing = self
            .menus
            .find_item(id)
            .await?
            .ok_or(DomainError::not_found("menu item"))?;

        self.menus.delete_item(id).await?;

        if existing.link_type == LinkType::Category {
            if let Some(linked) = existing.linked_id {
                self.catalog.set_category_visibility(linked, false).await?;
            }
        }
        Ok(())
    }

    /// Applies a bulk reorder. The adapter mirrors the new order onto
    /// linked categories inside the same transaction, keeping category
    /// listings visually consistent with the menu.
    pub async fn reorder(&self, menu_key: &str, orders: Vec<ItemOrder>) -> Result<()> {
        if orders.is_empty() {
            return Err(DomainError::Validation("ordering data is required".into()));
        }
        let menu = self
            .menus
            .get_or_create_menu(menu_key, menu_name_for_key(menu_key))
            .await?;
        self.menus.reorder_items(menu.id, &orders).await
    }
}

//! # SQLite Menu Adapter
//!
//! Menus and their ordered items. Reordering re-homes items and
//! mirrors the new order onto linked categories in one transaction.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::links::COMMUNITY_BASE;
use domains::models::{ItemOrder, LinkType, Menu, MenuItem, MenuItemPatch, NewMenuItem};
use domains::traits::MenuRepo;

use crate::{blob_to_uuid, map_sqlx_err, uuid_to_blob};

pub struct SqliteMenuRepo {
    pool: SqlitePool,
}

impl SqliteMenuRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn menu_from_row(row: &SqliteRow) -> Menu {
    Menu {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        key: row.get("key"),
        name: row.get("name"),
    }
}

// Legacy rows may carry anything in link_type; fall back to href
// inference, the same rule the menu service applies on input.
fn link_type_from(raw: &str, href: &str) -> LinkType {
    match raw {
        "community" => LinkType::Community,
        "category" => LinkType::Category,
        _ if href.starts_with(COMMUNITY_BASE) => LinkType::Community,
        _ => LinkType::Category,
    }
}

fn item_from_row(row: &SqliteRow) -> MenuItem {
    let raw_type: String = row.get("link_type");
    let href: String = row.get("href");
    let link_type = link_type_from(&raw_type, &href);
    MenuItem {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        menu_id: blob_to_uuid(row.get::<Vec<u8>, _>("menu_id").as_slice()),
        label: row.get("label"),
        href,
        order: row.get("sort_order"),
        is_visible: row.get("is_visible"),
        is_external: row.get("is_external"),
        open_in_new: row.get("open_in_new"),
        requires_auth: row.get("requires_auth"),
        badge_text: row.get("badge_text"),
        link_type,
        linked_id: row
            .get::<Option<Vec<u8>>, _>("linked_id")
            .map(|blob| blob_to_uuid(blob.as_slice())),
    }
}

#[async_trait]
impl MenuRepo for SqliteMenuRepo {
    async fn find_menu(&self, key: &str) -> Result<Option<Menu>> {
        let row = sqlx::query("SELECT * FROM menus WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(row.as_ref().map(menu_from_row))
    }

    async fn get_or_create_menu(&self, key: &str, name: &str) -> Result<Menu> {
        if let Some(menu) = self.find_menu(key).await? {
            return Ok(menu);
        }
        let menu = Menu {
            id: Uuid::now_v7(),
            key: key.to_string(),
            name: name.to_string(),
        };
        sqlx::query("INSERT INTO menus (id, key, name) VALUES (?, ?, ?)")
            .bind(uuid_to_blob(menu.id))
            .bind(&menu.key)
            .bind(&menu.name)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(menu)
    }

    async fn list_items(&self, menu_id: Uuid) -> Result<Vec<MenuItem>> {
        let rows =
            sqlx::query("SELECT * FROM menu_items WHERE menu_id = ? ORDER BY sort_order ASC")
                .bind(uuid_to_blob(menu_id))
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_err)?;
        Ok(rows.iter().map(item_from_row).collect())
    }

    async fn find_item(&self, id: Uuid) -> Result<Option<MenuItem>> {
        let row = sqlx::query("SELECT * FROM menu_items WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(row.as_ref().map(item_from_row))
    }

    async fn create_item(&self, item: NewMenuItem) -> Result<MenuItem> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO menu_items (id, menu_id, label, href, sort_order, is_visible, is_external, open_in_new, requires_auth, badge_text, link_type, linked_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(id))
        .bind(uuid_to_blob(item.menu_id))
        .bind(&item.label)
        .bind(&item.href)
        .bind(item.order)
        .bind(item.is_visible)
        .bind(item.is_external)
        .bind(item.open_in_new)
        .bind(item.requires_auth)
        .bind(&item.badge_text)
        .bind(item.link_type.as_str())
        .bind(item.linked_id.map(uuid_to_blob))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(MenuItem {
            id,
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
        })
    }

    async fn update_item(&self, id: Uuid, patch: MenuItemPatch) -> Result<MenuItem> {
        let result = sqlx::query(
            "UPDATE menu_items SET \
                label = COALESCE(?, label), \
                is_visible = COALESCE(?, is_visible), \
                is_external = COALESCE(?, is_external), \
                open_in_new = COALESCE(?, open_in_new), \
                requires_auth = COALESCE(?, requires_auth), \
                href = ?, \
                badge_text = ?, \
                link_type = ?, \
                linked_id = ? \
             WHERE id = ?",
        )
        .bind(patch.label)
        .bind(patch.is_visible)
        .bind(patch.is_external)
        .bind(patch.open_in_new)
        .bind(patch.requires_auth)
        .bind(&patch.href)
        .bind(&patch.badge_text)
        .bind(patch.link_type.as_str())
        .bind(patch.linked_id.map(uuid_to_blob))
        .bind(uuid_to_blob(id))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("menu item"));
        }
        let row = sqlx::query("SELECT * FROM menu_items WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(item_from_row(&row))
    }

    async fn delete_item(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("menu item"));
        }
        Ok(())
    }

    async fn items_requiring_auth(&self) -> Result<Vec<MenuItem>> {
        let rows = sqlx::query(
            "SELECT * FROM menu_items WHERE requires_auth = 1 AND link_type IN ('category', 'community')",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(rows.iter().map(item_from_row).collect())
    }

    async fn reorder_items(&self, menu_id: Uuid, orders: &[ItemOrder]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;
        let now = Utc::now();

        for entry in orders {
            let result =
                sqlx::query("UPDATE menu_items SET sort_order = ?, menu_id = ? WHERE id = ?")
                    .bind(entry.order)
                    .bind(uuid_to_blob(menu_id))
                    .bind(uuid_to_blob(entry.id))
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;
            if result.rows_affected() == 0 {
                return Err(DomainError::not_found("menu item"));
            }

            // Mirror onto the linked category so catalog listings keep
            // the menu's order.
            let row = sqlx::query("SELECT link_type, href, linked_id FROM menu_items WHERE id = ?")
                .bind(uuid_to_blob(entry.id))
                .fetch_one(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
            let raw_type: String = row.get("link_type");
            let href: String = row.get("href");
            let linked_id: Option<Vec<u8>> = row.get("linked_id");
            if link_type_from(&raw_type, &href) == LinkType::Category {
                if let Some(blob) = linked_id {
                    sqlx::query(
                        "UPDATE categories SET sort_order = ?, updated_at = ? WHERE id = ?",
                    )
                    .bind(entry.order)
                    .bind(now)
                    .bind(&blob)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;
                }
            }
        }

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }
}

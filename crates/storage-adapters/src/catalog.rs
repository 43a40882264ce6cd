//! # SQLite Catalog Adapter
//!
//! Maps the category/content tables onto [`CatalogRepo`]. Restore and
//! permanent delete wrap their multi-step work in one transaction so a
//! failure can never leave mixed state.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use domains::defaults::menu_name_for_key;
use domains::error::{DomainError, Result};
use domains::links::category_href;
use domains::models::{
    Category, CategoryFilter, CategoryPatch, CategoryUpsert, Content, LinkType, MenuItem,
    NewContent,
};
use domains::traits::CatalogRepo;

use crate::{blob_to_uuid, map_sqlx_err, uuid_to_blob};

pub struct SqliteCatalogRepo {
    pool: SqlitePool,
}

impl SqliteCatalogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn category_from_row(row: &SqliteRow) -> Category {
    Category {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        name: row.get("name"),
        slug: row.get("slug"),
        order: row.get("sort_order"),
        is_visible: row.get("is_visible"),
        requires_auth: row.get("requires_auth"),
        thumbnail_url: row.get("thumbnail_url"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn content_from_row(row: &SqliteRow) -> Content {
    Content {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        category_id: blob_to_uuid(row.get::<Vec<u8>, _>("category_id").as_slice()),
        title: row.get("title"),
        slug: row.get("slug"),
        body: row.get("body"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const CATEGORY_COLS: &str =
    "id, name, slug, sort_order, is_visible, requires_auth, thumbnail_url, description, created_at, updated_at";

#[async_trait]
impl CatalogRepo for SqliteCatalogRepo {
    async fn list_categories(&self, filter: CategoryFilter) -> Result<Vec<Category>> {
        let sql = match filter {
            CategoryFilter::Visible => {
                "SELECT * FROM categories WHERE is_visible = 1 ORDER BY sort_order ASC"
            }
            CategoryFilter::Hidden => {
                "SELECT * FROM categories WHERE is_visible = 0 ORDER BY sort_order ASC"
            }
            CategoryFilter::All => "SELECT * FROM categories ORDER BY sort_order ASC",
        };
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(row.as_ref().map(category_from_row))
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(row.as_ref().map(category_from_row))
    }

    async fn categories_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT * FROM categories WHERE id IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(uuid_to_blob(*id));
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx_err)?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn categories_by_slugs(&self, slugs: &[String]) -> Result<Vec<Category>> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; slugs.len()].join(", ");
        let sql = format!("SELECT * FROM categories WHERE slug IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for slug in slugs {
            query = query.bind(slug);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx_err)?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn protected_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories WHERE requires_auth = 1")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn upsert_category_by_slug(&self, slug: &str, up: CategoryUpsert) -> Result<Category> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;
        let now = Utc::now();

        let existing = sqlx::query("SELECT * FROM categories WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        let id = match existing {
            Some(row) => {
                let id: Vec<u8> = row.get("id");
                sqlx::query(
                    "UPDATE categories SET name = ?, is_visible = ?, sort_order = COALESCE(?, sort_order), updated_at = ? WHERE id = ?",
                )
                .bind(&up.name)
                .bind(up.is_visible)
                .bind(up.order)
                .bind(now)
                .bind(&id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
                blob_to_uuid(&id)
            }
            None => {
                let id = Uuid::now_v7();
                sqlx::query(
                    "INSERT INTO categories (id, name, slug, sort_order, is_visible, requires_auth, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
                )
                .bind(uuid_to_blob(id))
                .bind(&up.name)
                .bind(slug)
                .bind(up.order.unwrap_or(0))
                .bind(up.is_visible)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
                id
            }
        };

        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(category_from_row(&row))
    }

    async fn update_category(&self, id: Uuid, patch: CategoryPatch) -> Result<Category> {
        let result = sqlx::query(
            "UPDATE categories SET \
                name = COALESCE(?, name), \
                slug = COALESCE(?, slug), \
                is_visible = COALESCE(?, is_visible), \
                requires_auth = COALESCE(?, requires_auth), \
                thumbnail_url = COALESCE(?, thumbnail_url), \
                description = COALESCE(?, description), \
                updated_at = ? \
             WHERE id = ?",
        )
        .bind(patch.name)
        .bind(patch.slug)
        .bind(patch.is_visible)
        .bind(patch.requires_auth)
        .bind(patch.thumbnail_url)
        .bind(patch.description)
        .bind(Utc::now())
        .bind(uuid_to_blob(id))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("category"));
        }
        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(category_from_row(&row))
    }

    async fn set_category_visibility(&self, id: Uuid, visible: bool) -> Result<()> {
        let result = sqlx::query("UPDATE categories SET is_visible = ?, updated_at = ? WHERE id = ?")
            .bind(visible)
            .bind(Utc::now())
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("category"));
        }
        Ok(())
    }

    /// Unhide + menu append, both inside one transaction.
    async fn restore_category(&self, id: Uuid, menu_key: &str) -> Result<(Category, MenuItem)> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;
        let now = Utc::now();

        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_err)?
            .ok_or(DomainError::not_found("category"))?;
        let category = category_from_row(&row);
        if category.is_visible {
            return Err(DomainError::AlreadyVisible);
        }

        sqlx::query("UPDATE categories SET is_visible = 1, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        // Resolve (or create) the target menu inside the same tx.
        let menu_id = match sqlx::query("SELECT id FROM menus WHERE key = ?")
            .bind(menu_key)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_err)?
        {
            Some(row) => blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
            None => {
                let menu_id = Uuid::now_v7();
                sqlx::query("INSERT INTO menus (id, key, name) VALUES (?, ?, ?)")
                    .bind(uuid_to_blob(menu_id))
                    .bind(menu_key)
                    .bind(menu_name_for_key(menu_key))
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;
                menu_id
            }
        };

        let next_order: i64 = sqlx::query(
            "SELECT COALESCE(MAX(sort_order), 0) + 1 AS next_order FROM menu_items WHERE menu_id = ?",
        )
        .bind(uuid_to_blob(menu_id))
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_err)?
        .get("next_order");

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
        sqlx::query(
            "INSERT INTO menu_items (id, menu_id, label, href, sort_order, is_visible, is_external, open_in_new, requires_auth, badge_text, link_type, linked_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(item.id))
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
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;

        let restored = Category {
            is_visible: true,
            updated_at: now,
            ..category
        };
        Ok((restored, item))
    }

    /// Guard checks and the delete share one transaction.
    async fn delete_category(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_err)?
            .ok_or(DomainError::not_found("category"))?;
        if row.get::<bool, _>("is_visible") {
            return Err(DomainError::CategoryVisible);
        }

        let owned: i64 = sqlx::query("SELECT COUNT(*) AS n FROM contents WHERE category_id = ?")
            .bind(uuid_to_blob(id))
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_err)?
            .get("n");
        if owned > 0 {
            return Err(DomainError::HasContent(owned as u64));
        }

        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn content_count(&self, category_id: Uuid) -> Result<u64> {
        let n: i64 = sqlx::query("SELECT COUNT(*) AS n FROM contents WHERE category_id = ?")
            .bind(uuid_to_blob(category_id))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_err)?
            .get("n");
        Ok(n as u64)
    }

    async fn move_contents(&self, from: Uuid, to: Uuid) -> Result<u64> {
        let result =
            sqlx::query("UPDATE contents SET category_id = ?, updated_at = ? WHERE category_id = ?")
                .bind(uuid_to_blob(to))
                .bind(Utc::now())
                .bind(uuid_to_blob(from))
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_err)?;
        Ok(result.rows_affected())
    }

    async fn create_content(&self, content: NewContent) -> Result<Content> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO contents (id, category_id, title, slug, body, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(id))
        .bind(uuid_to_blob(content.category_id))
        .bind(&content.title)
        .bind(&content.slug)
        .bind(&content.body)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(Content {
            id,
            category_id: content.category_id,
            title: content.title,
            slug: content.slug,
            body: content.body,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_contents(&self, category_id: Uuid) -> Result<Vec<Content>> {
        let rows = sqlx::query(
            "SELECT * FROM contents WHERE category_id = ? ORDER BY created_at DESC",
        )
        .bind(uuid_to_blob(category_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(rows.iter().map(content_from_row).collect())
    }
}

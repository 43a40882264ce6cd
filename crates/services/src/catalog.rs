//! # Catalog Service
//!
//! Category lifecycle on top of the store port: listing, metadata
//! edits, the hide/restore soft-delete cycle, bulk content moves, and
//! the guarded permanent delete.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::models::{Category, CategoryFilter, CategoryPatch, Content, MenuItem, NewContent};
use domains::traits::CatalogRepo;

/// A category plus how many contents it still owns; the admin screen
/// for hidden categories needs the count to decide which actions to
/// offer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub content_count: u64,
}

#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepo>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepo>) -> Self {
        Self { catalog }
    }

    pub async fn list_with_counts(&self, filter: CategoryFilter) -> Result<Vec<CategoryWithCount>> {
        let categories = self.catalog.list_categories(filter).await?;
        let mut out = Vec::with_capacity(categories.len());
        for category in categories {
            let content_count = self.catalog.content_count(category.id).await?;
            out.push(CategoryWithCount {
                category,
                content_count,
            });
        }
        Ok(out)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        self.catalog.find_category_by_slug(slug).await
    }

    /// Admin metadata edit; only thumbnail and description are
    /// reachable from this path.
    pub async fn update_meta(
        &self,
        id: Uuid,
        thumbnail_url: Option<String>,
        description: Option<String>,
    ) -> Result<Category> {
        self.catalog
            .find_category(id)
            .await?
            .ok_or(DomainError::not_found("category"))?;
        self.catalog
            .update_category(
                id,
                CategoryPatch {
                    thumbnail_url,
                    description,
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn hide(&self, id: Uuid) -> Result<()> {
        self.catalog
            .find_category(id)
            .await?
            .ok_or(DomainError::not_found("category"))?;
        self.catalog.set_category_visibility(id, false).await
    }

    /// Brings a hidden category back: visible again and re-appended to
    /// the target menu in one transaction. A visible category cannot
    /// be restored.
    pub async fn restore(&self, id: Uuid, menu_key: &str) -> Result<(Category, MenuItem)> {
        self.catalog.restore_category(id, menu_key).await
    }

    /// Bulk-reassigns contents between categories. The target must be
    /// a different, visible category.
    pub async fn move_contents(&self, from: Uuid, to: Uuid) -> Result<u64> {
        if from == to {
            return Err(DomainError::InvalidTarget(
                "source and target are the same category",
            ));
        }
        self.catalog
            .find_category(from)
            .await?
            .ok_or(DomainError::not_found("category"))?;
        let target = self
            .catalog
            .find_category(to)
            .await?
            .ok_or(DomainError::not_found("category"))?;
        if !target.is_visible {
            return Err(DomainError::InvalidTarget("target category is hidden"));
        }

        let moved = self.catalog.move_contents(from, to).await?;
        tracing::info!(%from, %to, moved, "reassigned contents between categories");
        Ok(moved)
    }

    /// Physically removes a category. Only reachable once it is hidden
    /// and owns zero contents; the store checks both inside the delete
    /// transaction.
    pub async fn permanent_delete(&self, id: Uuid) -> Result<()> {
        self.catalog.delete_category(id).await
    }

    pub async fn list_contents(&self, category_id: Uuid) -> Result<Vec<Content>> {
        self.catalog.list_contents(category_id).await
    }

    pub async fn create_content(&self, content: NewContent) -> Result<Content> {
        self.catalog.create_content(content).await
    }
}

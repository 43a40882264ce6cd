//! # Access Control Resolver
//!
//! Derives, from the current menu graph plus category flags, the full
//! set of slugs that require authentication. The result is a pure
//! function of store state: no caching in here, deterministic
//! ordering, and an empty store yields two empty sets.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domains::error::Result;
use domains::links::{extract_community_slug, parse_category_slug_from_href};
use domains::models::{Category, LinkType};
use domains::traits::{CatalogRepo, MenuRepo};

use crate::cache::TtlCache;

/// The derived protected-slug sets. `BTreeSet` keeps iteration (and
/// serialization) order stable across calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclSets {
    pub protected_category_slugs: BTreeSet<String>,
    pub protected_community_slugs: BTreeSet<String>,
}

#[derive(Clone)]
pub struct AclService {
    menus: Arc<dyn MenuRepo>,
    catalog: Arc<dyn CatalogRepo>,
}

impl AclService {
    pub fn new(menus: Arc<dyn MenuRepo>, catalog: Arc<dyn CatalogRepo>) -> Self {
        Self { menus, catalog }
    }

    /// Recomputes both protected sets from scratch.
    ///
    /// Category protection is the union of three sources: categories
    /// whose own flag is set, categories linked by id from a protected
    /// menu item, and categories matched by the slug parsed out of a
    /// protected item's href. Community protection comes from the
    /// group slug of protected community items.
    pub async fn resolve(&self) -> Result<AclSets> {
        let mut sets = AclSets::default();

        // Direct flags first; this path works even with no menu rows.
        for category in self.catalog.protected_categories().await? {
            sets.protected_category_slugs.insert(category.slug);
        }

        let items = self.menus.items_requiring_auth().await?;

        let mut linked_ids: Vec<Uuid> = Vec::new();
        let mut href_slugs: Vec<String> = Vec::new();

        for item in &items {
            match item.link_type {
                LinkType::Community => {
                    let slug = extract_community_slug(&item.href, &item.label);
                    if !slug.is_empty() {
                        sets.protected_community_slugs.insert(slug);
                    }
                }
                LinkType::Category => {
                    if let Some(linked) = item.linked_id {
                        linked_ids.push(linked);
                    }
                    if let Some(slug) = parse_category_slug_from_href(&item.href) {
                        sets.protected_category_slugs.insert(slug.clone());
                        href_slugs.push(slug);
                    }
                }
            }
        }

        if !linked_ids.is_empty() {
            for category in self.catalog.categories_by_ids(&linked_ids).await? {
                sets.protected_category_slugs.insert(category.slug);
            }
        }
        if !href_slugs.is_empty() {
            for category in self.catalog.categories_by_slugs(&href_slugs).await? {
                sets.protected_category_slugs.insert(category.slug);
            }
        }

        Ok(sets)
    }

    /// Page-level defense-in-depth: does this category require auth,
    /// either through its own flag or through any protected menu item
    /// linking to it (by id or by href-derived slug)?
    pub async fn category_requires_auth(&self, category: &Category) -> Result<bool> {
        if category.requires_auth {
            return Ok(true);
        }
        let items = self.menus.items_requiring_auth().await?;
        Ok(items.iter().any(|item| {
            item.link_type == LinkType::Category
                && (item.linked_id == Some(category.id)
                    || parse_category_slug_from_href(&item.href).as_deref()
                        == Some(category.slug.as_str()))
        }))
    }

    /// Page-level defense-in-depth for community groups.
    pub async fn community_requires_auth(&self, group_slug: &str) -> Result<bool> {
        let items = self.menus.items_requiring_auth().await?;
        Ok(items.iter().any(|item| {
            item.link_type == LinkType::Community
                && extract_community_slug(&item.href, &item.label) == group_slug
        }))
    }
}

/// The edge gate's view of the resolver: short-TTL cached, and failing
/// OPEN. A resolver error yields `None`, which the gate treats as "no
/// protected slugs". Availability over strictness, backed by the
/// independent page-level checks.
pub struct CachedAclResolver {
    acl: AclService,
    cache: TtlCache<AclSets>,
}

impl CachedAclResolver {
    pub fn new(acl: AclService, cache: TtlCache<AclSets>) -> Self {
        Self { acl, cache }
    }

    pub async fn protected_sets(&self) -> Option<AclSets> {
        if let Some(sets) = self.cache.get() {
            return Some(sets);
        }
        match self.acl.resolve().await {
            Ok(sets) => {
                self.cache.put(sets.clone());
                Some(sets)
            }
            Err(err) => {
                tracing::warn!(error = %err, "ACL resolve failed; edge gate will fail open");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::*;
    use domains::traits::{MockCatalogRepo, MockMenuRepo};

    // Timestamps do not matter to the resolver.
    mod fixtures {
        use domains::models::{Category, LinkType, MenuItem};
        use uuid::Uuid;

        pub fn category(slug: &str, requires_auth: bool) -> Category {
            Category {
                id: Uuid::now_v7(),
                name: slug.to_string(),
                slug: slug.to_string(),
                order: 0,
                is_visible: true,
                requires_auth,
                thumbnail_url: None,
                description: None,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            }
        }

        pub fn protected_item(link_type: LinkType, href: &str, label: &str) -> MenuItem {
            MenuItem {
                id: Uuid::now_v7(),
                menu_id: Uuid::now_v7(),
                label: label.to_string(),
                href: href.to_string(),
                order: 0,
                is_visible: true,
                is_external: false,
                open_in_new: false,
                requires_auth: true,
                badge_text: None,
                link_type,
                linked_id: None,
            }
        }
    }

    fn service(menus: MockMenuRepo, catalog: MockCatalogRepo) -> AclService {
        AclService::new(Arc::new(menus), Arc::new(catalog))
    }

    #[tokio::test]
    async fn empty_store_yields_empty_sets() {
        let mut menus = MockMenuRepo::new();
        menus.expect_items_requiring_auth().returning(|| Ok(vec![]));
        let mut catalog = MockCatalogRepo::new();
        catalog.expect_protected_categories().returning(|| Ok(vec![]));

        let sets = service(menus, catalog).resolve().await.unwrap();
        assert_eq!(sets, AclSets::default());
    }

    #[tokio::test]
    async fn unions_direct_flags_linked_ids_and_href_slugs() {
        let direct = category("secret", true);
        let linked = category("vip-trip", false);
        let by_href = category("golf", false);

        let mut item_by_id = protected_item(LinkType::Category, "/elsewhere", "VIP");
        item_by_id.linked_id = Some(linked.id);
        let item_by_href = protected_item(LinkType::Category, "/contents/golf", "골프");
        let community_item = protected_item(LinkType::Community, "/community/lounge", "라운지");

        let mut menus = MockMenuRepo::new();
        menus
            .expect_items_requiring_auth()
            .returning(move || Ok(vec![item_by_id.clone(), item_by_href.clone(), community_item.clone()]));

        let mut catalog = MockCatalogRepo::new();
        let direct_clone = direct.clone();
        catalog
            .expect_protected_categories()
            .returning(move || Ok(vec![direct_clone.clone()]));
        let linked_clone = linked.clone();
        catalog
            .expect_categories_by_ids()
            .returning(move |_| Ok(vec![linked_clone.clone()]));
        let by_href_clone = by_href.clone();
        catalog
            .expect_categories_by_slugs()
            .returning(move |_| Ok(vec![by_href_clone.clone()]));

        let sets = service(menus, catalog).resolve().await.unwrap();

        let cats: Vec<&str> = sets
            .protected_category_slugs
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(cats, vec!["golf", "secret", "vip-trip"]);
        assert!(sets.protected_community_slugs.contains("lounge"));
    }

    #[tokio::test]
    async fn resolve_is_deterministic_across_calls() {
        fn build() -> (MockMenuRepo, MockCatalogRepo) {
            let mut menus = MockMenuRepo::new();
            menus.expect_items_requiring_auth().returning(|| {
                Ok(vec![protected_item(
                    LinkType::Category,
                    "/contents/vip-trip",
                    "VIP",
                )])
            });
            let mut catalog = MockCatalogRepo::new();
            catalog.expect_protected_categories().returning(|| Ok(vec![]));
            catalog
                .expect_categories_by_slugs()
                .returning(|_| Ok(vec![category("vip-trip", false)]));
            (menus, catalog)
        }

        let (menus, catalog) = build();
        let svc = service(menus, catalog);
        let first = svc.resolve().await.unwrap();
        let second = svc.resolve().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn category_check_matches_link_by_id_or_href() {
        let target = category("vip-trip", false);
        let mut by_id = protected_item(LinkType::Category, "/somewhere", "VIP");
        by_id.linked_id = Some(target.id);

        let mut menus = MockMenuRepo::new();
        menus
            .expect_items_requiring_auth()
            .returning(move || Ok(vec![by_id.clone()]));
        let svc = service(menus, MockCatalogRepo::new());
        assert!(svc.category_requires_auth(&target).await.unwrap());

        let unrelated = category("free-stuff", false);
        let mut menus = MockMenuRepo::new();
        menus.expect_items_requiring_auth().returning(|| Ok(vec![]));
        let svc = service(menus, MockCatalogRepo::new());
        assert!(!svc.category_requires_auth(&unrelated).await.unwrap());
    }

    #[tokio::test]
    async fn own_flag_short_circuits_menu_lookup() {
        let flagged = category("secret", true);
        // No expectation on items_requiring_auth: the mock would panic
        // if the service consulted the menu for a directly-flagged
        // category.
        let svc = service(MockMenuRepo::new(), MockCatalogRepo::new());
        assert!(svc.category_requires_auth(&flagged).await.unwrap());
    }
}

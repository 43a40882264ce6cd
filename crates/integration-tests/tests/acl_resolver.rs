//! ACL resolution over a live (fake) store, exercised through the same
//! services the admin API uses.

use domains::models::LinkType;
use domains::slug::slugify;
use integration_tests::test_services;
use services::MenuItemInput;

fn protected(label: &str) -> MenuItemInput {
    MenuItemInput {
        label: Some(label.to_string()),
        requires_auth: Some(true),
        ..Default::default()
    }
}

#[tokio::test]
async fn empty_store_resolves_to_empty_sets() {
    let svc = test_services();
    let sets = svc.acl.resolve().await.unwrap();
    assert!(sets.protected_category_slugs.is_empty());
    assert!(sets.protected_community_slugs.is_empty());
}

#[tokio::test]
async fn resolve_is_deterministic_without_intervening_mutations() {
    let svc = test_services();
    svc.menus.create_item("main", protected("VIP 여행")).await.unwrap();
    svc.store.insert_category("secret", true, true);

    let first = svc.acl.resolve().await.unwrap();
    let second = svc.acl.resolve().await.unwrap();
    assert_eq!(first, second);
    assert!(first.protected_category_slugs.contains("secret"));
    assert!(first
        .protected_category_slugs
        .contains(&slugify("VIP 여행")));
}

#[tokio::test]
async fn menu_protection_follows_the_linked_category() {
    let svc = test_services();
    let item = svc
        .menus
        .create_item(
            "main",
            MenuItemInput {
                href: Some("/products/vip-trip".into()),
                ..protected("VIP")
            },
        )
        .await
        .unwrap();
    assert!(item.linked_id.is_some());

    let sets = svc.acl.resolve().await.unwrap();
    assert!(sets.protected_category_slugs.contains("vip-trip"));
}

#[tokio::test]
async fn removing_the_last_protecting_item_releases_the_slug() {
    let svc = test_services();
    let item = svc
        .menus
        .create_item(
            "main",
            MenuItemInput {
                href: Some("/products/vip-trip".into()),
                ..protected("VIP")
            },
        )
        .await
        .unwrap();
    assert!(svc
        .acl
        .resolve()
        .await
        .unwrap()
        .protected_category_slugs
        .contains("vip-trip"));

    svc.menus.delete_item(item.id).await.unwrap();

    let sets = svc.acl.resolve().await.unwrap();
    assert!(
        !sets.protected_category_slugs.contains("vip-trip"),
        "no protector left for the slug"
    );
}

#[tokio::test]
async fn community_group_slug_falls_back_to_the_label() {
    let svc = test_services();
    svc.menus
        .create_item(
            "main",
            MenuItemInput {
                link_type: Some(LinkType::Community),
                ..protected("커뮤니티")
            },
        )
        .await
        .unwrap();

    let sets = svc.acl.resolve().await.unwrap();
    assert!(sets
        .protected_community_slugs
        .contains(&slugify("커뮤니티")));
    assert!(sets.protected_category_slugs.is_empty());
}

#[tokio::test]
async fn directly_flagged_categories_need_no_menu_presence() {
    let svc = test_services();
    let category = svc.store.insert_category("vault", true, true);

    let sets = svc.acl.resolve().await.unwrap();
    assert!(sets.protected_category_slugs.contains("vault"));

    // And the page-level check agrees.
    assert!(svc.acl.category_requires_auth(&category).await.unwrap());
}

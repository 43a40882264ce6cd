//! Category lifecycle: the hide/restore cycle, content moves, and the
//! guarded permanent delete.

use std::sync::atomic::Ordering;

use domains::error::DomainError;
use integration_tests::test_services;

#[tokio::test]
async fn hide_then_restore_round_trips_with_the_slug_reserved() {
    let svc = test_services();
    let category = svc.store.insert_category("promo", true, false);

    svc.catalog.hide(category.id).await.unwrap();
    svc.store.mutate(|s| assert!(!s.categories[0].is_visible));

    // The slug stays reserved while hidden: an upsert under the same
    // slug must hit the same row, not mint a new one.
    let (restored, _) = svc.catalog.restore(category.id, "main").await.unwrap();
    assert_eq!(restored.id, category.id);
    assert_eq!(restored.slug, "promo");
    assert!(restored.is_visible);
}

#[tokio::test]
async fn restore_applies_both_effects_together() {
    let svc = test_services();
    let hidden = svc.store.insert_category("vip-trip", false, false);

    let (category, item) = svc.catalog.restore(hidden.id, "main").await.unwrap();

    assert!(category.is_visible);
    assert_eq!(item.href, "/products/vip-trip");
    assert_eq!(item.linked_id, Some(hidden.id));
    svc.store.mutate(|s| {
        assert_eq!(s.items.len(), 1, "menu entry appended");
        assert!(s.categories[0].is_visible);
    });
}

#[tokio::test]
async fn failed_restore_applies_neither_effect() {
    let svc = test_services();
    let hidden = svc.store.insert_category("vip-trip", false, false);

    svc.store.fail.restore.store(true, Ordering::SeqCst);
    let err = svc.catalog.restore(hidden.id, "main").await.unwrap_err();
    assert!(matches!(err, DomainError::Storage(_)));

    // Never exactly one of the two effects.
    svc.store.mutate(|s| {
        assert!(!s.categories[0].is_visible, "category still hidden");
        assert!(s.items.is_empty(), "no menu entry appeared");
    });
}

#[tokio::test]
async fn restore_of_a_visible_category_is_rejected() {
    let svc = test_services();
    let visible = svc.store.insert_category("golf", true, false);

    let err = svc.catalog.restore(visible.id, "main").await.unwrap_err();
    assert!(matches!(err, DomainError::AlreadyVisible));
    svc.store.mutate(|s| assert!(s.items.is_empty()));
}

#[tokio::test]
async fn move_contents_validates_target_before_touching_rows() {
    let svc = test_services();
    let source = svc.store.insert_category("old", false, false);
    let hidden_target = svc.store.insert_category("hidden", false, false);
    let visible_target = svc.store.insert_category("new", true, false);
    svc.store.insert_content(source.id, "a");
    svc.store.insert_content(source.id, "b");

    let err = svc.catalog.move_contents(source.id, source.id).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidTarget(_)));

    let err = svc
        .catalog
        .move_contents(source.id, hidden_target.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTarget(_)));

    let err = svc
        .catalog
        .move_contents(uuid::Uuid::now_v7(), visible_target.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    // Nothing moved across the failed attempts.
    svc.store.mutate(|s| {
        assert!(s.contents.iter().all(|c| c.category_id == source.id));
    });

    let moved = svc
        .catalog
        .move_contents(source.id, visible_target.id)
        .await
        .unwrap();
    assert_eq!(moved, 2);
    svc.store.mutate(|s| {
        assert!(s.contents.iter().all(|c| c.category_id == visible_target.id));
    });
}

#[tokio::test]
async fn permanent_delete_requires_hidden_and_empty() {
    let svc = test_services();

    // Visible: rejected regardless of contents.
    let visible = svc.store.insert_category("visible", true, false);
    let err = svc.catalog.permanent_delete(visible.id).await.unwrap_err();
    assert!(matches!(err, DomainError::CategoryVisible));

    // Hidden but occupied: rejected with the owned count.
    let occupied = svc.store.insert_category("occupied", false, false);
    svc.store.insert_content(occupied.id, "x");
    let err = svc.catalog.permanent_delete(occupied.id).await.unwrap_err();
    assert!(matches!(err, DomainError::HasContent(1)));
    svc.store
        .mutate(|s| assert!(s.categories.iter().any(|c| c.id == occupied.id)));

    // Hidden and empty: the row goes away and the slug is released.
    let target = svc.store.insert_category("target", true, false);
    svc.catalog
        .move_contents(occupied.id, target.id)
        .await
        .unwrap();
    svc.catalog.permanent_delete(occupied.id).await.unwrap();
    svc.store.mutate(|s| {
        assert!(!s.categories.iter().any(|c| c.id == occupied.id));
    });
}

#[tokio::test]
async fn update_meta_only_touches_thumbnail_and_description() {
    let svc = test_services();
    let category = svc.store.insert_category("tip", true, false);

    let updated = svc
        .catalog
        .update_meta(
            category.id,
            Some("/uploads/tip.webp".into()),
            Some("travel tips".into()),
        )
        .await
        .unwrap();

    assert_eq!(updated.thumbnail_url.as_deref(), Some("/uploads/tip.webp"));
    assert_eq!(updated.description.as_deref(), Some("travel tips"));
    assert_eq!(updated.slug, "tip");
    assert!(updated.is_visible);
}

//! Board lifecycle: explicit seeding, key normalization, the atomic
//! rename-with-retag, and the guarded delete.

use domains::error::DomainError;
use domains::models::{ItemOrder, NewPost};
use domains::slug::slugify;
use integration_tests::test_services;
use services::BoardInput;

fn named(name: &str) -> BoardInput {
    BoardInput {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn default_seeding_runs_exactly_once() {
    let svc = test_services();

    svc.community.ensure_default_boards().await.unwrap();
    svc.community.ensure_default_boards().await.unwrap();

    let boards = svc.community.list_boards(true).await.unwrap();
    assert_eq!(boards.len(), 2);
    assert_eq!(boards[0].key, "review");
    assert_eq!(boards[1].key, "free");
}

#[tokio::test]
async fn listing_never_seeds_as_a_side_effect() {
    let svc = test_services();
    let boards = svc.community.list_boards(false).await.unwrap();
    assert!(boards.is_empty());
    svc.store.mutate(|s| assert!(s.boards.is_empty()));
}

#[tokio::test]
async fn board_key_is_derived_from_the_name_when_omitted() {
    let svc = test_services();

    let board = svc.community.create_board(named("공지사항")).await.unwrap();
    assert_eq!(board.key, slugify("공지사항"));
    assert_eq!(board.order, 1, "first board lands at the end: count + 1");

    let explicit = svc
        .community
        .create_board(BoardInput {
            key: Some("Notice Board".into()),
            ..named("ignored name")
        })
        .await
        .unwrap();
    assert_eq!(explicit.key, "notice-board");
    assert_eq!(explicit.order, 2);
}

#[tokio::test]
async fn colliding_keys_are_rejected_before_any_mutation() {
    let svc = test_services();
    svc.community.create_board(named("free")).await.unwrap();

    let err = svc.community.create_board(named("free")).await.unwrap_err();
    assert!(matches!(err, DomainError::DuplicateKey(_)));
    assert_eq!(svc.community.list_boards(true).await.unwrap().len(), 1);

    // Renaming onto an existing key is equally rejected.
    let other = svc.community.create_board(named("etc")).await.unwrap();
    let err = svc
        .community
        .update_board(
            other.id,
            BoardInput {
                key: Some("free".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateKey(_)));
}

#[tokio::test]
async fn key_rename_retags_every_post_case_insensitively() {
    let svc = test_services();
    let board = svc.community.create_board(named("review")).await.unwrap();

    for key in ["review", "Review", "REVIEW"] {
        svc.community
            .create_post(NewPost {
                board_key: key.into(),
                title: "t".into(),
                body: "b".into(),
            })
            .await
            .unwrap();
    }
    let before = svc.community.list_posts("review").await.unwrap().len();

    svc.community
        .update_board(
            board.id,
            BoardInput {
                key: Some("reviews".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(svc.community.list_posts("reviews").await.unwrap().len(), before);
    assert_eq!(svc.community.list_posts("review").await.unwrap().len(), 0);
}

#[tokio::test]
async fn delete_succeeds_iff_no_posts_reference_the_key() {
    let svc = test_services();
    let board = svc.community.create_board(named("free")).await.unwrap();
    svc.community
        .create_post(NewPost {
            board_key: "FREE".into(),
            title: "t".into(),
            body: "b".into(),
        })
        .await
        .unwrap();

    let err = svc.community.delete_board(board.id).await.unwrap_err();
    assert!(matches!(err, DomainError::BoardHasPosts(1)));

    svc.store.mutate(|s| s.posts.clear());
    svc.community.delete_board(board.id).await.unwrap();
    assert!(svc.community.find_by_key("free").await.unwrap().is_none());
}

#[tokio::test]
async fn reorder_rejects_empty_and_applies_in_bulk() {
    let svc = test_services();
    let a = svc.community.create_board(named("a")).await.unwrap();
    let b = svc.community.create_board(named("b")).await.unwrap();

    let err = svc.community.reorder(vec![]).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    svc.community
        .reorder(vec![
            ItemOrder { id: a.id, order: 2 },
            ItemOrder { id: b.id, order: 1 },
        ])
        .await
        .unwrap();
    let boards = svc.community.list_boards(true).await.unwrap();
    assert_eq!(boards[0].key, "b");
}

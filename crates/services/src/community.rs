//! # Community Service
//!
//! Board lifecycle for the community group: explicit default seeding,
//! key normalization, the atomic rename-with-retag, and the guarded
//! delete. Posts are touched only through their board key.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use domains::defaults::DEFAULT_BOARDS;
use domains::error::{DomainError, Result};
use domains::models::{Board, BoardUpdate, ItemOrder, NewBoard, NewPost, Post};
use domains::slug::normalize_board_key;
use domains::traits::CommunityRepo;

/// Admin-supplied fields of a board; create and update share the shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardInput {
    pub key: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
    pub is_visible: Option<bool>,
}

#[derive(Clone)]
pub struct CommunityService {
    community: Arc<dyn CommunityRepo>,
}

impl CommunityService {
    pub fn new(community: Arc<dyn CommunityRepo>) -> Self {
        Self { community }
    }

    /// Seeds the default board set when the board table is empty.
    /// Idempotent; called explicitly at startup and by community-type
    /// menu mutations, never from a read path.
    pub async fn ensure_default_boards(&self) -> Result<()> {
        let defaults: Vec<NewBoard> = DEFAULT_BOARDS
            .iter()
            .map(|d| NewBoard {
                key: d.key.to_string(),
                name: d.name.to_string(),
                description: None,
                order: d.order,
                is_visible: true,
            })
            .collect();

        if self.community.seed_boards_if_empty(&defaults).await? {
            tracing::info!("seeded default community boards");
        }
        Ok(())
    }

    pub async fn list_boards(&self, include_hidden: bool) -> Result<Vec<Board>> {
        self.community.list_boards(include_hidden).await
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<Board>> {
        self.community.find_board_by_key(key).await
    }

    /// Creates a board. The key is derived from the name when omitted;
    /// a colliding key is rejected before any mutation.
    pub async fn create_board(&self, input: BoardInput) -> Result<Board> {
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DomainError::Validation("a board name is required".into()))?
            .to_string();

        let key = normalize_board_key(input.key.as_deref().unwrap_or(""), &name);
        if key.is_empty() {
            return Err(DomainError::Validation("a board key is required".into()));
        }
        if self.community.find_board_by_key(&key).await?.is_some() {
            return Err(DomainError::DuplicateKey(key));
        }

        let order = match input.order {
            Some(order) => order,
            None => self.community.count_boards().await? as i64 + 1,
        };

        self.community
            .create_board(NewBoard {
                key,
                name,
                description: input.description.filter(|d| !d.is_empty()),
                order,
                is_visible: input.is_visible.unwrap_or(true),
            })
            .await
    }

    /// Updates a board. A changed key retags every post carrying the
    /// old key (case-insensitive) in the same transaction as the
    /// rename, so no post is ever left pointing at a dead key.
    pub async fn update_board(&self, id: Uuid, input: BoardInput) -> Result<Board> {
        let existing = self
            .community
            .find_board(id)
            .await?
            .ok_or(DomainError::not_found("board"))?;

        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&existing.name)
            .to_string();
        let next_key = normalize_board_key(
            input.key.as_deref().unwrap_or(&existing.key),
            &name,
        );
        if next_key.is_empty() {
            return Err(DomainError::Validation("a board key is required".into()));
        }
        if next_key != existing.key {
            if let Some(other) = self.community.find_board_by_key(&next_key).await? {
                if other.id != id {
                    return Err(DomainError::DuplicateKey(next_key));
                }
            }
        }

        let (board, retagged) = self
            .community
            .update_board(
                id,
                BoardUpdate {
                    key: next_key,
                    name,
                    description: input.description.or(existing.description),
                    is_visible: input.is_visible.unwrap_or(existing.is_visible),
                },
            )
            .await?;

        if retagged > 0 {
            tracing::info!(board = %board.key, retagged, "retagged posts after board key rename");
        }
        Ok(board)
    }

    /// Deletes a board; blocked while any post still references its
    /// key.
    pub async fn delete_board(&self, id: Uuid) -> Result<()> {
        self.community.delete_board(id).await
    }

    pub async fn reorder(&self, orders: Vec<ItemOrder>) -> Result<()> {
        if orders.is_empty() {
            return Err(DomainError::Validation("ordering data is required".into()));
        }
        self.community.reorder_boards(&orders).await
    }

    pub async fn list_posts(&self, board_key: &str) -> Result<Vec<Post>> {
        self.community.list_posts(board_key).await
    }

    pub async fn create_post(&self, post: NewPost) -> Result<Post> {
        self.community.create_post(post).await
    }
}

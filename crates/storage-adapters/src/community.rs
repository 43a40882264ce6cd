//! # SQLite Community Adapter
//!
//! Boards and the posts tagged with their keys. Key renames retag
//! posts in the same transaction; the delete guard counts posts inside
//! the delete transaction.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::models::{Board, BoardUpdate, ItemOrder, NewBoard, NewPost, Post};
use domains::traits::CommunityRepo;

use crate::{blob_to_uuid, map_sqlx_err, uuid_to_blob};

pub struct SqliteCommunityRepo {
    pool: SqlitePool,
}

impl SqliteCommunityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn board_from_row(row: &SqliteRow) -> Board {
    Board {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        key: row.get("key"),
        name: row.get("name"),
        description: row.get("description"),
        order: row.get("sort_order"),
        is_visible: row.get("is_visible"),
        created_at: row.get("created_at"),
    }
}

fn post_from_row(row: &SqliteRow) -> Post {
    Post {
        id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
        board_key: row.get("board_key"),
        title: row.get("title"),
        body: row.get("body"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl CommunityRepo for SqliteCommunityRepo {
    async fn seed_boards_if_empty(&self, boards: &[NewBoard]) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let existing: i64 = sqlx::query("SELECT COUNT(*) AS n FROM boards")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_err)?
            .get("n");
        if existing > 0 {
            return Ok(false);
        }

        let now = Utc::now();
        for board in boards {
            sqlx::query(
                "INSERT INTO boards (id, key, name, description, sort_order, is_visible, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(uuid_to_blob(Uuid::now_v7()))
            .bind(&board.key)
            .bind(&board.name)
            .bind(&board.description)
            .bind(board.order)
            .bind(board.is_visible)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        }
        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(true)
    }

    async fn list_boards(&self, include_hidden: bool) -> Result<Vec<Board>> {
        let sql = if include_hidden {
            "SELECT * FROM boards ORDER BY sort_order ASC"
        } else {
            "SELECT * FROM boards WHERE is_visible = 1 ORDER BY sort_order ASC"
        };
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(rows.iter().map(board_from_row).collect())
    }

    async fn find_board(&self, id: Uuid) -> Result<Option<Board>> {
        let row = sqlx::query("SELECT * FROM boards WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(row.as_ref().map(board_from_row))
    }

    async fn find_board_by_key(&self, key: &str) -> Result<Option<Board>> {
        let row = sqlx::query("SELECT * FROM boards WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(row.as_ref().map(board_from_row))
    }

    async fn count_boards(&self) -> Result<u64> {
        let n: i64 = sqlx::query("SELECT COUNT(*) AS n FROM boards")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_err)?
            .get("n");
        Ok(n as u64)
    }

    async fn create_board(&self, board: NewBoard) -> Result<Board> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO boards (id, key, name, description, sort_order, is_visible, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(id))
        .bind(&board.key)
        .bind(&board.name)
        .bind(&board.description)
        .bind(board.order)
        .bind(board.is_visible)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(Board {
            id,
            key: board.key,
            name: board.name,
            description: board.description,
            order: board.order,
            is_visible: board.is_visible,
            created_at: now,
        })
    }

    /// Rename + post retag inside one transaction.
    async fn update_board(&self, id: Uuid, update: BoardUpdate) -> Result<(Board, u64)> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let row = sqlx::query("SELECT * FROM boards WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_err)?
            .ok_or(DomainError::not_found("board"))?;
        let existing = board_from_row(&row);

        let mut retagged = 0u64;
        if update.key != existing.key {
            let result =
                sqlx::query("UPDATE posts SET board_key = ? WHERE LOWER(board_key) = LOWER(?)")
                    .bind(&update.key)
                    .bind(&existing.key)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;
            retagged = result.rows_affected();
        }

        sqlx::query(
            "UPDATE boards SET key = ?, name = ?, description = ?, is_visible = ? WHERE id = ?",
        )
        .bind(&update.key)
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.is_visible)
        .bind(uuid_to_blob(id))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        let row = sqlx::query("SELECT * FROM boards WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        tx.commit().await.map_err(map_sqlx_err)?;
        Ok((board_from_row(&row), retagged))
    }

    /// Post-count guard and delete share one transaction.
    async fn delete_board(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let row = sqlx::query("SELECT * FROM boards WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_err)?
            .ok_or(DomainError::not_found("board"))?;
        let board = board_from_row(&row);

        let posts: i64 =
            sqlx::query("SELECT COUNT(*) AS n FROM posts WHERE LOWER(board_key) = LOWER(?)")
                .bind(&board.key)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_sqlx_err)?
                .get("n");
        if posts > 0 {
            return Err(DomainError::BoardHasPosts(posts as u64));
        }

        sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn reorder_boards(&self, orders: &[ItemOrder]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;
        for entry in orders {
            let result = sqlx::query("UPDATE boards SET sort_order = ? WHERE id = ?")
                .bind(entry.order)
                .bind(uuid_to_blob(entry.id))
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
            if result.rows_affected() == 0 {
                // Unknown id aborts the whole reorder.
                return Err(DomainError::not_found("board"));
            }
        }
        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }

    async fn count_posts(&self, board_key: &str) -> Result<u64> {
        let n: i64 =
            sqlx::query("SELECT COUNT(*) AS n FROM posts WHERE LOWER(board_key) = LOWER(?)")
                .bind(board_key)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_err)?
                .get("n");
        Ok(n as u64)
    }

    async fn list_posts(&self, board_key: &str) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT * FROM posts WHERE LOWER(board_key) = LOWER(?) ORDER BY created_at DESC",
        )
        .bind(board_key)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;
        Ok(rows.iter().map(post_from_row).collect())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO posts (id, board_key, title, body, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(id))
        .bind(&post.board_key)
        .bind(&post.title)
        .bind(&post.body)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(Post {
            id,
            board_key: post.board_key,
            title: post.title,
            body: post.body,
            created_at: now,
        })
    }
}

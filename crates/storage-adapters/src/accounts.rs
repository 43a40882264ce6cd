//! SQLite account adapter; just enough for the setup probe and the
//! seed binary.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use uuid::Uuid;

use domains::error::Result;
use domains::models::{Account, NewAccount};
use domains::traits::AccountRepo;

use crate::{map_sqlx_err, uuid_to_blob};

pub struct SqliteAccountRepo {
    pool: SqlitePool,
}

impl SqliteAccountRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepo for SqliteAccountRepo {
    async fn admin_exists(&self) -> Result<bool> {
        let n: i64 = sqlx::query("SELECT COUNT(*) AS n FROM accounts WHERE LOWER(role) = 'admin'")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_err)?
            .get("n");
        Ok(n > 0)
    }

    async fn create_admin(&self, account: NewAccount) -> Result<Account> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query("INSERT INTO accounts (id, email, role, created_at) VALUES (?, ?, ?, ?)")
            .bind(uuid_to_blob(id))
            .bind(&account.email)
            .bind(&account.role)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(Account {
            id,
            email: account.email,
            role: account.role,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_pool;

    #[tokio::test]
    async fn admin_probe_flips_after_first_admin() {
        let repo = SqliteAccountRepo::new(memory_pool().await);
        assert!(!repo.admin_exists().await.unwrap());
        repo.create_admin(NewAccount {
            email: "admin@example.com".into(),
            role: "admin".into(),
        })
        .await
        .unwrap();
        assert!(repo.admin_exists().await.unwrap());
    }
}

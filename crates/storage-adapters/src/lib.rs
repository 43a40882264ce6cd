//! # storage-adapters
//!
//! SQLite implementations of the domain ports, mapping between the
//! relational model and the `domains` entities. Multi-step operations
//! documented as atomic run inside a single sqlx transaction.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use domains::error::{DomainError, Result};

pub mod accounts;
pub mod catalog;
pub mod community;
pub mod menus;

pub use accounts::SqliteAccountRepo;
pub use catalog::SqliteCatalogRepo;
pub use community::SqliteCommunityRepo;
pub use menus::SqliteMenuRepo;

/// The embedded schema, applied idempotently.
pub const SCHEMA: &str = include_str!("schema.sql");

/// Opens a pool against `url` (e.g. `sqlite:driftwood.db`), creating
/// the database file when missing.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(map_sqlx_err)?
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .map_err(map_sqlx_err)
}

/// Applies the embedded schema. Safe to run on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(map_sqlx_err)?;
    tracing::debug!("schema applied");
    Ok(())
}

// Helpers for UUID conversion; ids live in BLOB columns.
pub(crate) fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

/// Maps sqlx failures onto the domain taxonomy. Unique-constraint hits
/// surface as `DuplicateKey` so callers racing past a pre-check still
/// get the documented error.
pub(crate) fn map_sqlx_err(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DomainError::DuplicateKey(db.message().to_string());
        }
    }
    DomainError::Storage(err.to_string())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // A single connection keeps every test statement on the same
    // in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    init_schema(&pool).await.expect("schema");
    pool
}

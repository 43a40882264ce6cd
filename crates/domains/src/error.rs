//! # DomainError
//!
//! Centralized error handling for the driftwood ecosystem.
//! Every store adapter and service speaks this taxonomy; the API layer
//! maps it onto HTTP status classes and never leaks raw internals.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Resource not found (e.g. Category, Board, MenuItem).
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A category-type menu item resolved to an empty slug.
    #[error("a category address is required")]
    MissingSlug,

    /// The resolved board key or category slug collides with an
    /// existing row.
    #[error("key '{0}' is already in use")]
    DuplicateKey(String),

    /// Restore requested for a category that is not hidden.
    #[error("category is already visible")]
    AlreadyVisible,

    /// Permanent delete requested while the category is still visible.
    #[error("category must be hidden before it can be permanently deleted")]
    CategoryVisible,

    /// Permanent delete requested while the category still owns content.
    #[error("category still owns {0} content item(s); move them first")]
    HasContent(u64),

    /// Board delete requested while posts still reference its key.
    #[error("board still has {0} post(s); reassign or remove them first")]
    BoardHasPosts(u64),

    /// Content move with an unusable target (self-move, hidden target).
    #[error("invalid move target: {0}")]
    InvalidTarget(&'static str),

    /// Request rejected before any mutation (missing field, bad payload).
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller lacks the required role.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Infrastructure failure (store unavailable, transaction aborted).
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        DomainError::NotFound { entity }
    }
}

/// A specialized Result type for driftwood logic.
pub type Result<T> = std::result::Result<T, DomainError>;

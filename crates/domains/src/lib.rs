//! # domains
//!
//! The central domain logic and interface definitions for driftwood:
//! entity models, port traits, the error taxonomy, and the pure
//! slug/link helpers every layer shares.

pub mod defaults;
pub mod error;
pub mod links;
pub mod models;
pub mod slug;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::{DomainError, Result};
pub use models::*;
pub use traits::*;

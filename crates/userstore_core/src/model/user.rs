//! User record snapshot.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - Only `email` is mutated after creation.

use serde::{Deserialize, Serialize};

/// Store-assigned, monotonically increasing row id.
pub type UserId = i64;

/// Committed state of one `users` row at the time it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Part of the schema; not written by current operations.
    pub name: Option<String>,
    pub email: String,
}

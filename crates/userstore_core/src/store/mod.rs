//! Store handle and unit-of-work scopes.
//!
//! # Responsibility
//! - `UserStore` owns configuration and hands out sessions.
//! - `Session` wraps one connection for one operation and guarantees release.
//!
//! # Invariants
//! - Every repository call maps to exactly one session and at most one
//!   transaction.
//! - The core holds no in-process locks; conflicting writes are serialized by
//!   SQLite's locking and busy timeout.

mod handle;
mod session;
mod stats;

pub use handle::UserStore;
pub use session::{Session, WriteOutcome};
pub use stats::ScopeStatsSnapshot;

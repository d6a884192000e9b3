//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query and session details from callers.
//!
//! # Invariants
//! - No repository API exposes a session, transaction or connection.
//! - Repository APIs separate "no change occurred" (`false`) from store
//!   faults (`Err`).

pub mod user_repo;

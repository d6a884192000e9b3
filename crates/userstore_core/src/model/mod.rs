//! Domain model for the user store.
//!
//! # Invariants
//! - A user is identified by a store-assigned `UserId` that is never reused.
//! - Model values are detached snapshots; they never hold a live session.

pub mod user;

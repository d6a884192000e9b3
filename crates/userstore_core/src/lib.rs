//! Transactional data access for user records.
//!
//! A [`UserStore`] is an explicitly constructed handle that hands out
//! independent sessions; [`SqliteUserRepository`] runs every operation in its
//! own unit of work on top of it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use config::{JournalMode, StoreConfig, SyncMode};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::user::{User, UserId};
pub use repo::user_repo::{
    RepoError, RepoResult, SqliteUserRepository, UpdateOutcome, UserRepository,
};
pub use store::{ScopeStatsSnapshot, Session, UserStore, WriteOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

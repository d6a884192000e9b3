//! Record store handle.
//!
//! # Responsibility
//! - Hold the long-lived store configuration.
//! - Initialize the schema idempotently.
//! - Manufacture independent sessions on demand.
//!
//! # Invariants
//! - The handle never reads or writes user data itself.
//! - Every session gets its own connection; no transaction state is shared
//!   between sessions.
//! - The handle is `Send + Sync` and meant to be shared by reference (or
//!   `Arc`) across threads.

use super::session::Session;
use super::stats::{ScopeStats, ScopeStatsSnapshot};
use crate::config::StoreConfig;
use crate::db::migrations::{apply_migrations, latest_version};
use crate::db::{open_session_connection, open_store_connection, DbResult};
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;

/// Factory for unit-of-work sessions against one SQLite database file.
#[derive(Debug)]
pub struct UserStore {
    config: StoreConfig,
    stats: Arc<ScopeStats>,
}

impl UserStore {
    /// Builds a store handle from validated configuration.
    ///
    /// Does not open the database; call [`UserStore::init_store`] before the
    /// first session on a new file.
    ///
    /// # Errors
    /// - `DbError::InvalidConfig` when `config.validate()` fails.
    pub fn open(config: StoreConfig) -> DbResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stats: Arc::new(ScopeStats::default()),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Creates the database file and schema if missing.
    ///
    /// # Side effects
    /// - Sets the configured journal mode (persistent for WAL).
    /// - Applies pending migrations in one IMMEDIATE transaction.
    /// - Emits `store_init` logging events with duration and status.
    ///
    /// Safe to call any number of times, including concurrently.
    pub fn init_store(&self) -> DbResult<()> {
        let started_at = Instant::now();
        info!("event=store_init module=store status=start");

        match self.try_init() {
            Ok(applied) => {
                info!(
                    "event=store_init module=store status=ok schema_version={} applied={} duration_ms={}",
                    latest_version(),
                    applied,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_init module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn try_init(&self) -> DbResult<u32> {
        let mut conn = open_store_connection(&self.config)?;
        let mode: String = conn.query_row(
            &format!(
                "PRAGMA journal_mode = {};",
                self.config.journal_mode.pragma_value()
            ),
            [],
            |row| row.get(0),
        )?;
        info!("event=store_journal module=store status=ok journal_mode={mode}");
        apply_migrations(&mut conn)
    }

    /// Opens a fresh session bound to this store.
    ///
    /// # Errors
    /// - Store faults from opening or configuring the connection, e.g. when
    ///   the database file does not exist yet.
    pub fn new_session(&self) -> DbResult<Session> {
        let conn = open_session_connection(&self.config)?;
        Ok(Session::new(conn, Arc::clone(&self.stats)))
    }

    /// Returns session lifecycle counters for this handle.
    pub fn scope_stats(&self) -> ScopeStatsSnapshot {
        self.stats.snapshot()
    }
}

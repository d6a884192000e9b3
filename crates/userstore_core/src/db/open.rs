//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open store connections for initialization and for unit-of-work sessions.
//! - Configure connection pragmas required by core behavior.
//!
//! # Invariants
//! - Returned connections have the configured busy timeout and synchronous
//!   mode.
//! - Session connections never create a database file; only store
//!   initialization does.

use super::DbResult;
use crate::config::StoreConfig;
use log::{debug, error};
use rusqlite::{Connection, OpenFlags};
use std::time::Instant;

/// Opens a connection that may create the database file.
pub(crate) fn open_store_connection(config: &StoreConfig) -> DbResult<Connection> {
    open_with_flags(
        config,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        "init",
    )
}

/// Opens a connection for one session against an existing database file.
pub(crate) fn open_session_connection(config: &StoreConfig) -> DbResult<Connection> {
    open_with_flags(
        config,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        "session",
    )
}

fn open_with_flags(config: &StoreConfig, flags: OpenFlags, mode: &str) -> DbResult<Connection> {
    let started_at = Instant::now();

    let conn = match Connection::open_with_flags(&config.path, flags) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    if let Err(err) = configure_connection(&conn, config) {
        error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code=db_configure_failed error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err);
    }

    debug!(
        "event=db_open module=db status=ok mode={} duration_ms={}",
        mode,
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn configure_connection(conn: &Connection, config: &StoreConfig) -> DbResult<()> {
    conn.busy_timeout(config.busy_timeout())?;
    conn.pragma_update(None, "synchronous", config.sync_mode.pragma_value())?;
    Ok(())
}

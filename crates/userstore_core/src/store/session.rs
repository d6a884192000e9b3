//! Unit-of-work sessions and their scopes.
//!
//! # Responsibility
//! - Own exactly one connection for exactly one logical operation.
//! - Run a write body inside one transaction that either commits or rolls
//!   back, and report integrity failures as a value instead of an error.
//! - Run a read body with no transaction bookkeeping.
//!
//! # Invariants
//! - A session is consumed by the scope that uses it, so it serves at most one
//!   operation.
//! - Release happens in `Drop`, exactly once, on every exit path: normal
//!   return, early `?` return, and unwinding.
//! - Per write scope exactly one of {commit, rollback} happens.
//! - A session is neither `Send` nor `Sync`; it stays on the thread that
//!   opened it.

use super::stats::ScopeStats;
use crate::db::{DbError, DbResult};
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::marker::PhantomData;
use std::sync::Arc;

/// Result of a write scope.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T> {
    /// The body finished and the transaction committed.
    Committed(T),
    /// The store rejected the write on integrity grounds; no work was
    /// performed.
    RolledBack,
}

impl<T> WriteOutcome<T> {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// Returns the body's value when committed.
    pub fn committed(self) -> Option<T> {
        match self {
            Self::Committed(value) => Some(value),
            Self::RolledBack => None,
        }
    }
}

/// One isolated interaction with the store.
#[derive(Debug)]
pub struct Session {
    conn: Connection,
    seq: u64,
    stats: Arc<ScopeStats>,
    _thread_bound: PhantomData<*const ()>,
}

impl Session {
    pub(crate) fn new(conn: Connection, stats: Arc<ScopeStats>) -> Self {
        let seq = stats.record_open();
        debug!("event=session_open module=store status=ok session={seq}");
        Self {
            conn,
            seq,
            stats,
            _thread_bound: PhantomData,
        }
    }

    /// Runs `body` in a write transaction and consumes the session.
    ///
    /// The transaction takes the database write lock up front (IMMEDIATE), so
    /// a look-up followed by a mutation inside `body` sees no interleaved
    /// writer. Waiting for that lock is bounded by the configured busy
    /// timeout.
    ///
    /// # Contract
    /// - `body` returns `Ok` → commit → `WriteOutcome::Committed`.
    /// - `body` or the commit fails with an integrity violation → rollback →
    ///   `WriteOutcome::RolledBack`.
    /// - Any other failure → rollback, release, then the error propagates.
    pub fn write<T, F>(mut self, body: F) -> DbResult<WriteOutcome<T>>
    where
        F: FnOnce(&Transaction<'_>) -> DbResult<T>,
    {
        let seq = self.seq;
        let stats = Arc::clone(&self.stats);
        let tx = match Transaction::new(&mut self.conn, TransactionBehavior::Immediate) {
            Ok(tx) => tx,
            Err(err) => {
                warn!(
                    "event=scope_begin module=store status=error session={} error={}",
                    seq, err
                );
                return Err(err.into());
            }
        };
        let mut finish = ScopeFinish::new(&stats);

        let err = match body(&tx) {
            Ok(value) => match tx.commit() {
                Ok(()) => {
                    finish.committed = true;
                    debug!("event=scope_commit module=store status=ok session={seq}");
                    return Ok(WriteOutcome::Committed(value));
                }
                // A failed COMMIT leaves the transaction open; dropping it
                // rolls back.
                Err(err) => DbError::from(err),
            },
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=scope_rollback module=store status=error session={} error={}",
                        seq, rollback_err
                    );
                }
                err
            }
        };

        if err.is_integrity_violation() {
            warn!(
                "event=scope_rollback module=store status=ok session={} reason=integrity error={}",
                seq, err
            );
            Ok(WriteOutcome::RolledBack)
        } else {
            warn!(
                "event=scope_rollback module=store status=ok session={} reason=fault error={}",
                seq, err
            );
            Err(err)
        }
    }

    /// Runs `body` against the session's connection and consumes the session.
    ///
    /// No commit or rollback is issued; the body must not mutate data.
    pub fn read<T, F>(self, body: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        body(&self.conn)
    }
}

/// Counts the end of one write transaction when dropped.
///
/// Anything short of a successful commit counts as a rollback, including
/// unwinding out of the body, where dropping the transaction rolls back.
struct ScopeFinish<'a> {
    stats: &'a ScopeStats,
    committed: bool,
}

impl<'a> ScopeFinish<'a> {
    fn new(stats: &'a ScopeStats) -> Self {
        Self {
            stats,
            committed: false,
        }
    }
}

impl Drop for ScopeFinish<'_> {
    fn drop(&mut self) {
        if self.committed {
            self.stats.record_commit();
        } else {
            self.stats.record_rollback();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stats.record_release();
        debug!(
            "event=session_release module=store status=ok session={}",
            self.seq
        );
    }
}

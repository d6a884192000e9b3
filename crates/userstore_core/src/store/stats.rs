//! Session lifecycle counters.
//!
//! Counters are shared between a `UserStore` and every session it produced,
//! so they can be read while sessions are still open on other threads.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct ScopeStats {
    opened: AtomicU64,
    released: AtomicU64,
    commits: AtomicU64,
    rollbacks: AtomicU64,
}

impl ScopeStats {
    /// Records an opened session and returns its sequence number.
    pub(crate) fn record_open(&self) -> u64 {
        self.opened.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn record_release(&self) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rollback(&self) {
        self.rollbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ScopeStatsSnapshot {
        ScopeStatsSnapshot {
            sessions_opened: self.opened.load(Ordering::Relaxed),
            sessions_released: self.released.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            rollbacks: self.rollbacks.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of session lifecycle counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeStatsSnapshot {
    pub sessions_opened: u64,
    pub sessions_released: u64,
    /// Write scopes that committed.
    pub commits: u64,
    /// Write scopes that rolled back, for any reason.
    pub rollbacks: u64,
}

impl ScopeStatsSnapshot {
    /// Sessions opened but not yet released.
    pub fn sessions_open(&self) -> u64 {
        self.sessions_opened.saturating_sub(self.sessions_released)
    }
}

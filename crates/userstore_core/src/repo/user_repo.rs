//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update APIs over the `users` table.
//! - Keep SQL and session handling inside the core persistence boundary.
//!
//! # Invariants
//! - Each call opens one session and runs in one scope; nothing spans calls.
//! - Integrity failures come back as `false`, never as `Err`.
//! - Returned users are detached snapshots of committed rows.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::user::{User, UserId};
use crate::store::{UserStore, WriteOutcome};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const USER_SELECT_SQL: &str = "SELECT id, name, email FROM users";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for store faults and unreadable persisted data.
///
/// Integrity failures and missing rows are not errors; see
/// [`UserRepository::update_email`].
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Detailed result of an email update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The row existed and now carries the new email.
    Updated,
    /// No row with the requested id was visible to the transaction.
    NotFound,
    /// The store rejected the write; the transaction rolled back.
    Rejected,
}

impl UpdateOutcome {
    pub fn is_updated(self) -> bool {
        self == Self::Updated
    }
}

/// Repository interface for user operations.
pub trait UserRepository {
    /// Inserts one user with the given email.
    ///
    /// Returns `false` when the store rejects the row.
    fn create_user(&self, email: &str) -> RepoResult<bool>;
    /// Returns a snapshot of every committed user, ordered by id.
    ///
    /// All or nothing: a single row with a NULL email fails the whole call
    /// with `RepoError::InvalidData`; no partial list is returned.
    fn get_all_users(&self) -> RepoResult<Vec<User>>;
    /// Counts committed users.
    fn get_user_count(&self) -> RepoResult<u64>;
    /// Gets one user by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Looks up `id` and replaces its email within one transaction.
    fn update_email_outcome(&self, id: UserId, new_email: &str) -> RepoResult<UpdateOutcome>;

    /// Boolean form of [`UserRepository::update_email_outcome`].
    ///
    /// `false` means no change occurred, whether the id was missing or the
    /// store rejected the write.
    fn update_email(&self, id: UserId, new_email: &str) -> RepoResult<bool> {
        Ok(self.update_email_outcome(id, new_email)?.is_updated())
    }
}

/// SQLite-backed user repository.
///
/// Borrows the store handle and is `Sync`, so one instance can serve many
/// threads at once.
#[derive(Debug, Clone, Copy)]
pub struct SqliteUserRepository<'store> {
    store: &'store UserStore,
}

impl<'store> SqliteUserRepository<'store> {
    pub fn new(store: &'store UserStore) -> Self {
        Self { store }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, email: &str) -> RepoResult<bool> {
        let outcome = self.store.new_session()?.write(|tx| {
            tx.execute(
                "INSERT INTO users (name, email) VALUES (NULL, ?1);",
                [email],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        match outcome {
            WriteOutcome::Committed(id) => {
                debug!("event=user_create module=repo status=ok user_id={id}");
                Ok(true)
            }
            WriteOutcome::RolledBack => {
                debug!("event=user_create module=repo status=rejected");
                Ok(false)
            }
        }
    }

    fn get_all_users(&self) -> RepoResult<Vec<User>> {
        let rows = self
            .store
            .new_session()?
            .read(|conn| load_users(conn).map_err(DbError::from))?;

        rows.into_iter().map(parse_user_row).collect()
    }

    fn get_user_count(&self) -> RepoResult<u64> {
        let count = self.store.new_session()?.read(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM users;", [], |row| {
                row.get::<_, i64>(0)
            })?;
            Ok(count)
        })?;

        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative user count `{count}`")))
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let row = self.store.new_session()?.read(|conn| {
            let row = conn
                .query_row(
                    &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                    [id],
                    read_raw_row,
                )
                .optional()?;
            Ok(row)
        })?;

        row.map(parse_user_row).transpose()
    }

    fn update_email_outcome(&self, id: UserId, new_email: &str) -> RepoResult<UpdateOutcome> {
        let outcome = self.store.new_session()?.write(|tx| {
            let existing = tx
                .query_row("SELECT id FROM users WHERE id = ?1;", [id], |row| {
                    row.get::<_, UserId>(0)
                })
                .optional()?;
            let Some(row_id) = existing else {
                return Ok(UpdateOutcome::NotFound);
            };

            tx.execute(
                "UPDATE users SET email = ?1 WHERE id = ?2;",
                params![new_email, row_id],
            )?;
            Ok(UpdateOutcome::Updated)
        })?;

        let outcome = outcome.committed().unwrap_or(UpdateOutcome::Rejected);
        debug!("event=user_update module=repo status={outcome:?} user_id={id}");
        Ok(outcome)
    }
}

/// Raw column values read inside the scope; validated after release.
type RawUserRow = (UserId, Option<String>, Option<String>);

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawUserRow> {
    Ok((row.get("id")?, row.get("name")?, row.get("email")?))
}

fn load_users(conn: &Connection) -> rusqlite::Result<Vec<RawUserRow>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
    let rows = stmt
        .query_map([], read_raw_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn parse_user_row((id, name, email): RawUserRow) -> RepoResult<User> {
    let email = email
        .ok_or_else(|| RepoError::InvalidData(format!("NULL email in users.email for id {id}")))?;
    Ok(User { id, name, email })
}

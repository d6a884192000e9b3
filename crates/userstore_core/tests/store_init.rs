mod common;

use common::{test_config, test_store};
use rusqlite::Connection;
use std::thread;
use userstore_core::db::migrations::{latest_version, schema_version};
use userstore_core::{DbError, SqliteUserRepository, UserRepository, UserStore};

#[test]
fn init_store_creates_users_table() {
    let store = test_store();
    let conn = Connection::open(&store.path).unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(
        table_columns(&conn, "users"),
        vec!["id".to_string(), "name".to_string(), "email".to_string()]
    );
}

#[test]
fn init_store_twice_is_idempotent() {
    let store = test_store();
    let repo = SqliteUserRepository::new(&store);
    assert!(repo.create_user("keep@example.com").unwrap());

    store.init_store().unwrap();
    store.init_store().unwrap();

    let conn = Connection::open(&store.path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(
        table_columns(&conn, "users"),
        vec!["id".to_string(), "name".to_string(), "email".to_string()]
    );
    assert_eq!(repo.get_user_count().unwrap(), 1);
}

#[test]
fn init_store_repeats_concurrently_without_error() {
    let store = test_store();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| store.init_store().unwrap());
        }
    });

    let conn = Connection::open(&store.path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

#[test]
fn init_store_switches_to_wal() {
    let store = test_store();
    let conn = Connection::open(&store.path).unwrap();
    let mode: String = conn
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode, "wal");
}

#[test]
fn init_store_rejects_newer_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let conn = Connection::open(&config.path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let store = UserStore::open(config).unwrap();
    match store.init_store().unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.busy_timeout_ms = 0;

    assert!(matches!(
        UserStore::open(config),
        Err(DbError::InvalidConfig(_))
    ));
}

#[test]
fn sessions_do_not_share_transaction_state() {
    let store = test_store();

    let seen_from_other_session = store
        .new_session()
        .unwrap()
        .write(|tx| {
            tx.execute("INSERT INTO users (email) VALUES ('pending@example.com');", [])?;
            let other = store.new_session()?;
            other.read(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?;
                Ok(count)
            })
        })
        .unwrap()
        .committed()
        .unwrap();

    assert_eq!(seen_from_other_session, 0);
    let repo = SqliteUserRepository::new(&store);
    assert_eq!(repo.get_user_count().unwrap(), 1);
}

fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}

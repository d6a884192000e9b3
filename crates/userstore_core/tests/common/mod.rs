#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use tempfile::TempDir;
use userstore_core::{StoreConfig, SyncMode, UserStore};
use uuid::Uuid;

/// Initialized store in its own temporary directory.
pub struct TestStore {
    pub store: UserStore,
    pub path: PathBuf,
    _dir: TempDir,
}

impl std::ops::Deref for TestStore {
    type Target = UserStore;

    fn deref(&self) -> &UserStore {
        &self.store
    }
}

pub fn test_config(dir: &TempDir) -> StoreConfig {
    let mut config = StoreConfig::new(dir.path().join("users.db"));
    config.sync_mode = SyncMode::Normal;
    config
}

pub fn test_store() -> TestStore {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let path = config.path.clone();
    let store = UserStore::open(config).unwrap();
    store.init_store().unwrap();
    TestStore {
        store,
        path,
        _dir: dir,
    }
}

pub fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4().simple())
}

/// Installs triggers that make the store reject any email on `blocked.test`.
pub fn install_blocked_domain_triggers(store: &UserStore) {
    store
        .new_session()
        .unwrap()
        .write(|tx| {
            tx.execute_batch(
                "CREATE TRIGGER reject_blocked_insert BEFORE INSERT ON users
                 WHEN NEW.email LIKE '%@blocked.test'
                 BEGIN SELECT RAISE(ABORT, 'blocked domain'); END;
                 CREATE TRIGGER reject_blocked_update BEFORE UPDATE OF email ON users
                 WHEN NEW.email LIKE '%@blocked.test'
                 BEGIN SELECT RAISE(ABORT, 'blocked domain'); END;",
            )?;
            Ok(())
        })
        .unwrap()
        .committed()
        .unwrap();
}

/// Runs `task(0..items)` on `workers` threads pulling from a shared index.
///
/// Results are returned in item order.
pub fn run_pool<T, F>(workers: usize, items: usize, task: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let next = AtomicUsize::new(0);
    let results = Mutex::new(Vec::with_capacity(items));

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                if index >= items {
                    break;
                }
                let value = task(index);
                results.lock().unwrap().push((index, value));
            });
        }
    });

    let mut results = results.into_inner().unwrap();
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, value)| value).collect()
}

/// Runs each task on its own thread, all released at the same moment.
pub fn run_simultaneously<T, F>(tasks: Vec<F>) -> Vec<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    let barrier = std::sync::Barrier::new(tasks.len());

    thread::scope(|scope| {
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    task()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    })
}

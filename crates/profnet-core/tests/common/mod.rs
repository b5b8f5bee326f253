#![allow(dead_code)]

use anyhow::{Result, bail};
use std::cell::Cell;

use profnet_core::{RecordStore, Snapshot};
use profnet_db::Database;
use profnet_types::{Connection, Profile};

pub fn db_with(users: &[&str]) -> Database {
    let db = Database::open_in_memory().unwrap();
    for u in users {
        assert!(db.create_user(u, "hash", &format!("{u}@example.com")).unwrap());
    }
    db
}

pub fn befriend(db: &Database, a: &str, b: &str) {
    assert!(db.insert_pending(a, b).unwrap());
    assert!(db.accept_request(a, b).unwrap());
}

pub fn snapshot(db: &Database, handle: &str) -> Snapshot {
    Snapshot::load(db, handle).unwrap()
}

/// Delegates to a real database but can be told to fail friend-edge reads
/// or connection writes.
pub struct FlakyStore {
    pub inner: Database,
    pub fail_friend_edges: Cell<bool>,
    pub fail_writes: Cell<bool>,
}

impl FlakyStore {
    pub fn new(inner: Database) -> Self {
        Self {
            inner,
            fail_friend_edges: Cell::new(false),
            fail_writes: Cell::new(false),
        }
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.get() {
            bail!("database is locked");
        }
        Ok(())
    }
}

impl RecordStore for FlakyStore {
    fn user_exists(&self, handle: &str) -> Result<bool> {
        RecordStore::user_exists(&self.inner, handle)
    }

    fn profile(&self, handle: &str) -> Result<Option<Profile>> {
        self.inner.profile(handle)
    }

    fn password_hash(&self, handle: &str) -> Result<Option<String>> {
        self.inner.password_hash(handle)
    }

    fn create_user(&self, handle: &str, password_hash: &str, email: &str) -> Result<bool> {
        RecordStore::create_user(&self.inner, handle, password_hash, email)
    }

    fn update_password(&self, handle: &str, password_hash: &str) -> Result<bool> {
        RecordStore::update_password(&self.inner, handle, password_hash)
    }

    fn count_connections(&self, handle: &str) -> Result<i64> {
        RecordStore::count_connections(&self.inner, handle)
    }

    fn friend_edges(&self, handle: &str) -> Result<Vec<Connection>> {
        if self.fail_friend_edges.get() {
            bail!("connection reset while reading friends of {handle}");
        }
        self.inner.friend_edges(handle)
    }

    fn pending_for(&self, handle: &str) -> Result<Vec<Connection>> {
        self.inner.pending_for(handle)
    }

    fn pending_between(&self, a: &str, b: &str) -> Result<bool> {
        RecordStore::pending_between(&self.inner, a, b)
    }

    fn insert_pending(&self, requester: &str, target: &str) -> Result<bool> {
        self.check_writes()?;
        RecordStore::insert_pending(&self.inner, requester, target)
    }

    fn accept_request(&self, requester: &str, target: &str) -> Result<bool> {
        self.check_writes()?;
        RecordStore::accept_request(&self.inner, requester, target)
    }

    fn reject_request(&self, requester: &str, target: &str) -> Result<bool> {
        self.check_writes()?;
        RecordStore::reject_request(&self.inner, requester, target)
    }
}

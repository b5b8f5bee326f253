use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use profnet_db::Database;
use profnet_db::models::{ConnectionRow, UserRow};
use profnet_types::{Connection, ConnectionStatus, Handle, Profile};

/// Everything the session logic needs from persistent storage. Every call
/// is a single statement and may fail with a backend error.
pub trait RecordStore {
    // -- Users --

    fn user_exists(&self, handle: &str) -> Result<bool>;
    fn profile(&self, handle: &str) -> Result<Option<Profile>>;
    /// Stored password hash, `None` for an unknown handle.
    fn password_hash(&self, handle: &str) -> Result<Option<String>>;
    /// Returns false when the handle is taken.
    fn create_user(&self, handle: &str, password_hash: &str, email: &str) -> Result<bool>;
    fn update_password(&self, handle: &str, password_hash: &str) -> Result<bool>;

    // -- Connections --

    fn count_connections(&self, handle: &str) -> Result<i64>;
    fn friend_edges(&self, handle: &str) -> Result<Vec<Connection>>;
    fn pending_for(&self, handle: &str) -> Result<Vec<Connection>>;
    fn pending_between(&self, a: &str, b: &str) -> Result<bool>;
    /// Returns false when the pair already has an edge.
    fn insert_pending(&self, requester: &str, target: &str) -> Result<bool>;
    fn accept_request(&self, requester: &str, target: &str) -> Result<bool>;
    fn reject_request(&self, requester: &str, target: &str) -> Result<bool>;
}

impl RecordStore for Database {
    fn user_exists(&self, handle: &str) -> Result<bool> {
        Database::user_exists(self, handle)
    }

    fn profile(&self, handle: &str) -> Result<Option<Profile>> {
        Ok(self.get_user(handle)?.map(profile_from_row))
    }

    fn password_hash(&self, handle: &str) -> Result<Option<String>> {
        Ok(self.get_user(handle)?.map(|u| u.password))
    }

    fn create_user(&self, handle: &str, password_hash: &str, email: &str) -> Result<bool> {
        Database::create_user(self, handle, password_hash, email)
    }

    fn update_password(&self, handle: &str, password_hash: &str) -> Result<bool> {
        Database::update_password(self, handle, password_hash)
    }

    fn count_connections(&self, handle: &str) -> Result<i64> {
        Database::count_connections(self, handle)
    }

    fn friend_edges(&self, handle: &str) -> Result<Vec<Connection>> {
        self.get_friend_edges(handle)?
            .into_iter()
            .map(connection_from_row)
            .collect()
    }

    fn pending_for(&self, handle: &str) -> Result<Vec<Connection>> {
        self.get_pending_requests(handle)?
            .into_iter()
            .map(connection_from_row)
            .collect()
    }

    fn pending_between(&self, a: &str, b: &str) -> Result<bool> {
        Database::pending_between(self, a, b)
    }

    fn insert_pending(&self, requester: &str, target: &str) -> Result<bool> {
        Database::insert_pending(self, requester, target)
    }

    fn accept_request(&self, requester: &str, target: &str) -> Result<bool> {
        Database::accept_request(self, requester, target)
    }

    fn reject_request(&self, requester: &str, target: &str) -> Result<bool> {
        Database::reject_request(self, requester, target)
    }
}

fn profile_from_row(row: UserRow) -> Profile {
    let created_at = parse_timestamp(&row.created_at, &row.handle);
    Profile {
        handle: Handle::from_stored(row.handle),
        email: row.email,
        created_at,
    }
}

fn connection_from_row(row: ConnectionRow) -> Result<Connection> {
    let status = row
        .status
        .parse::<ConnectionStatus>()
        .map_err(|e: String| anyhow!("{} -> {}: {}", row.requester, row.target, e))?;
    let created_at = parse_timestamp(&row.created_at, &row.requester);
    Ok(Connection {
        requester: Handle::from_stored(row.requester),
        target: Handle::from_stored(row.target),
        status,
        created_at,
    })
}

fn parse_timestamp(raw: &str, owner: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite's datetime('now') has no timezone; it is UTC.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on row for '{}': {}", raw, owner, e);
            DateTime::default()
        })
}

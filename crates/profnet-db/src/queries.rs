use crate::models::{ConnectionRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, ffi};

impl Database {
    // -- Users --

    /// Insert a user. Returns false when the handle is already taken.
    pub fn create_user(&self, handle: &str, password_hash: &str, email: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let res = conn.execute(
                "INSERT INTO users (handle, password, email) VALUES (?1, ?2, ?3)",
                (handle, password_hash, email),
            );
            absorb_duplicate(res)
        })
    }

    pub fn get_user(&self, handle: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, handle))
    }

    pub fn user_exists(&self, handle: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found = conn
                .query_row("SELECT 1 FROM users WHERE handle = ?1", [handle], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn update_password(&self, handle: &str, password_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE users SET password = ?1 WHERE handle = ?2",
                (password_hash, handle),
            )?;
            Ok(n > 0)
        })
    }

    // -- Connections --

    /// Every connection row, whatever its status, with `handle` on either side.
    pub fn count_connections(&self, handle: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM connections WHERE requester = ?1 OR target = ?1",
                [handle],
                |row| row.get(0),
            )?;
            Ok(n)
        })
    }

    /// Accepted edges touching `handle`, in either direction.
    pub fn get_friend_edges(&self, handle: &str) -> Result<Vec<ConnectionRow>> {
        self.with_conn(|conn| {
            query_connections(
                conn,
                "SELECT requester, target, status, created_at FROM connections
                 WHERE (requester = ?1 OR target = ?1) AND status = 'friend'
                 ORDER BY created_at, rowid",
                handle,
            )
        })
    }

    /// Requests waiting on `handle` to accept or reject them.
    pub fn get_pending_requests(&self, handle: &str) -> Result<Vec<ConnectionRow>> {
        self.with_conn(|conn| {
            query_connections(
                conn,
                "SELECT requester, target, status, created_at FROM connections
                 WHERE target = ?1 AND status = 'pending'
                 ORDER BY created_at, rowid",
                handle,
            )
        })
    }

    pub fn pending_between(&self, a: &str, b: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM connections
                     WHERE status = 'pending'
                       AND ((requester = ?1 AND target = ?2) OR (requester = ?2 AND target = ?1))",
                    (a, b),
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Insert a `pending` edge. Returns false when the pair already has an
    /// edge in either direction.
    pub fn insert_pending(&self, requester: &str, target: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let res = conn.execute(
                "INSERT INTO connections (requester, target, status) VALUES (?1, ?2, 'pending')",
                (requester, target),
            );
            absorb_duplicate(res)
        })
    }

    /// Flip `requester -> target` from pending to friend. Direction is kept.
    pub fn accept_request(&self, requester: &str, target: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE connections SET status = 'friend'
                 WHERE requester = ?1 AND target = ?2 AND status = 'pending'",
                (requester, target),
            )?;
            Ok(n > 0)
        })
    }

    pub fn reject_request(&self, requester: &str, target: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM connections
                 WHERE requester = ?1 AND target = ?2 AND status = 'pending'",
                (requester, target),
            )?;
            Ok(n > 0)
        })
    }
}

fn query_user(conn: &Connection, handle: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT handle, password, email, created_at FROM users WHERE handle = ?1")?;

    let row = stmt
        .query_row([handle], |row| {
            Ok(UserRow {
                handle: row.get(0)?,
                password: row.get(1)?,
                email: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_connections(conn: &Connection, sql: &str, handle: &str) -> Result<Vec<ConnectionRow>> {
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt
        .query_map([handle], |row| {
            Ok(ConnectionRow {
                requester: row.get(0)?,
                target: row.get(1)?,
                status: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Map a uniqueness violation on insert to `Ok(false)`.
fn absorb_duplicate(res: rusqlite::Result<usize>) -> Result<bool> {
    match res {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub const SCHEMA_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, connections)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                handle      TEXT PRIMARY KEY CHECK (
                                length(handle) BETWEEN 1 AND 30
                                AND handle NOT GLOB ('*[' || char(32, 9, 10, 11, 12, 13) || ']*')
                            ),
                password    TEXT NOT NULL,
                email       TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE connections (
                requester   TEXT NOT NULL REFERENCES users(handle),
                target      TEXT NOT NULL REFERENCES users(handle),
                status      TEXT NOT NULL CHECK (status IN ('pending', 'friend')),
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                CHECK (requester <> target)
            );

            -- One edge per unordered pair, whichever side sent the request
            CREATE UNIQUE INDEX idx_connections_pair
                ON connections(min(requester, target), max(requester, target));

            CREATE INDEX idx_connections_requester ON connections(requester, status);
            CREATE INDEX idx_connections_target ON connections(target, status);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL
//! string that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Chain snapshot: one row per block, idx is the chain position
        CREATE TABLE blocks (
            idx INTEGER PRIMARY KEY,          -- block index, 0 = genesis sentinel
            version INTEGER NOT NULL,         -- header schema version
            previous TEXT NOT NULL,           -- hex digest of predecessor, '' for genesis
            merkle_root TEXT NOT NULL,        -- hex digest over transaction leaves
            timestamp TEXT NOT NULL,          -- opaque mining-time string
            dataset_id TEXT NOT NULL,         -- content address of the dataset
            algorithm_id TEXT NOT NULL,       -- content address of the algorithm
            output_digest TEXT NOT NULL,      -- hex digest of the oracle output
            nonce INTEGER NOT NULL,           -- proof-of-work nonce
            digest TEXT NOT NULL              -- stored self-digest, '' for genesis
        );

        -- Local content blobs, addressable by id
        CREATE TABLE content (
            content_id TEXT PRIMARY KEY,
            bytes BLOB NOT NULL
        );

        CREATE INDEX idx_blocks_digest ON blocks(digest);
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during snapshot and content persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization/deserialization error.
    #[error("snapshot parse error: {0}")]
    Parse(String),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Snapshot or content entry not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored data fails a structural check.
    #[error("corrupt store: {0}")]
    Corrupt(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Backend error that fits no other variant.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

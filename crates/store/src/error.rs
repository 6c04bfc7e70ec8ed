//! Error types for the SQLite key-value store

use relaychat_core::StorageError;
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the SQLite store
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database corruption or schema mismatch
    #[error("Database error: {0}")]
    Database(String),
}

impl Error {
    /// Create a database error with a message
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Attach the slot name and convert into the store-agnostic error.
    pub fn into_read(self, key: &str) -> StorageError {
        StorageError::read(key, self)
    }

    pub fn into_write(self, key: &str) -> StorageError {
        StorageError::write(key, self)
    }
}

//! Storage traits and error types
//!
//! This module defines the trait interface for record stores and
//! associated error types.

use crate::record::BookRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Malformed record on line {line}: {source}")]
    MalformedLine {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Record collection not found: {0}")]
    NotFound(String),
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistent collection of book records
///
/// A store holds exactly one collection: saving replaces whatever the
/// previous crawl left behind.
pub trait RecordStore {
    /// Replaces the stored collection with `records`
    fn save(&mut self, records: &[BookRecord]) -> StorageResult<()>;

    /// Reads the whole stored collection
    ///
    /// Returns [`StorageError::NotFound`] when nothing was ever saved.
    fn load(&self) -> StorageResult<Vec<BookRecord>>;
}

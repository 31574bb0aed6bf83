//! Viewer module for browsing a persisted record collection
//!
//! # Components
//!
//! - `table`: The loaded collection, its price bounds and filter choices
//! - `filter`: The pure filter predicate over a table
//! - `render`: Terminal rendering of the filtered rows
//! - `session`: Explicit filter events driving re-filtering and re-rendering

pub mod filter;
pub mod render;
pub mod session;
pub mod table;

pub use filter::{filter, BookFilter, Choice};
pub use render::{render, render_results, render_stats, truncate, BookCard};
pub use session::{parse_command, Command, FilterEvent, ViewUpdate, ViewerSession};
pub use table::{BookTable, PriceBounds, TableStats};

use crate::storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or browsing a collection
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Nothing to show: the file is absent or holds no records
    #[error("No records found at {path}; run the crawler first")]
    SourceMissing { path: PathBuf },

    #[error("Could not read records: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Result type alias for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

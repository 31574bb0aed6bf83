//! Storage module for persisting the record collection
//!
//! This module handles:
//! - JSON feeds (a single array or one object per line)
//! - SQLite persistence with run tracking
//! - Picking the backend named by the output configuration

mod json;
mod schema;
mod sqlite;
mod traits;

pub use json::{JsonLayout, JsonStore};
pub use sqlite::SqliteStore;
pub use traits::{RecordStore, StorageError, StorageResult};

use crate::config::{OutputConfig, RecordFormat};

/// Opens the record store configured in `[output]`
///
/// The returned store is not tagged with a configuration hash; use
/// [`SqliteStore::with_config_hash`] directly when runs should carry one.
pub fn open_store(output: &OutputConfig) -> StorageResult<Box<dyn RecordStore>> {
    let store: Box<dyn RecordStore> = match output.format {
        RecordFormat::Json => Box::new(JsonStore::new(&output.records_path, JsonLayout::Array)),
        RecordFormat::Jsonl => Box::new(JsonStore::new(&output.records_path, JsonLayout::Lines)),
        RecordFormat::Sqlite => Box::new(SqliteStore::open(&output.records_path)?),
    };
    Ok(store)
}

/// Represents a run that saved a collection
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub record_count: i64,
}

/// Status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

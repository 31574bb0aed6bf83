//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecordStore trait.
//! Every save is recorded as a run; the `books` table always holds the
//! collection of the latest run only.

use crate::record::BookRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
    config_hash: String,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            config_hash: String::new(),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            config_hash: String::new(),
        })
    }

    /// Tags the runs recorded by later saves with a configuration hash
    pub fn with_config_hash(mut self, config_hash: impl Into<String>) -> Self {
        self.config_hash = config_hash.into();
        self
    }

    /// Returns the most recent run, if any save ever happened
    pub fn latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status, record_count
             FROM runs ORDER BY id DESC LIMIT 1",
        )?;

        let run = stmt
            .query_row([], |row| {
                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                        .unwrap_or(RunStatus::Running),
                    record_count: row.get(5)?,
                })
            })
            .optional()?;

        Ok(run)
    }
}

impl RecordStore for SqliteStore {
    fn save(&mut self, records: &[BookRecord]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        let started_at = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![
                started_at,
                self.config_hash,
                RunStatus::Running.to_db_string()
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        tx.execute("DELETE FROM books", [])?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO books
                 (url, title, price, availability, rating, description, category, image_url, saved_run)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for record in records {
                insert.execute(params![
                    record.url,
                    record.title,
                    record.price,
                    record.availability,
                    record.rating,
                    record.description,
                    record.category,
                    record.image_url,
                    run_id
                ])?;
            }
        }

        let finished_at = Utc::now().to_rfc3339();
        tx.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, record_count = ?3 WHERE id = ?4",
            params![
                RunStatus::Completed.to_db_string(),
                finished_at,
                records.len() as i64,
                run_id
            ],
        )?;

        tx.commit()?;
        tracing::debug!("Saved {} records as run {}", records.len(), run_id);
        Ok(())
    }

    fn load(&self) -> StorageResult<Vec<BookRecord>> {
        if self.latest_run()?.is_none() {
            return Err(StorageError::NotFound("no saved run".to_string()));
        }

        let mut stmt = self.conn.prepare(
            "SELECT title, price, availability, rating, description, category, image_url, url
             FROM books ORDER BY id",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(BookRecord {
                    title: row.get(0)?,
                    price: row.get(1)?,
                    availability: row.get(2)?,
                    rating: row.get(3)?,
                    description: row.get(4)?,
                    category: row.get(5)?,
                    image_url: row.get(6)?,
                    url: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

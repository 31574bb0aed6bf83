//! JSON record feeds
//!
//! Two layouts are supported: a single pretty-printed array, and JSON Lines
//! with one object per line.

use crate::record::BookRecord;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Layout of a JSON feed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    /// `[ {...}, {...} ]`
    Array,
    /// One object per line
    Lines,
}

/// Record store backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    layout: JsonLayout,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>, layout: JsonLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }
}

impl RecordStore for JsonStore {
    fn save(&mut self, records: &[BookRecord]) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(fs::File::create(&self.path)?);

        match self.layout {
            JsonLayout::Array => {
                serde_json::to_writer_pretty(&mut writer, records)?;
                writeln!(writer)?;
            }
            JsonLayout::Lines => {
                for record in records {
                    serde_json::to_writer(&mut writer, record)?;
                    writeln!(writer)?;
                }
            }
        }

        writer.flush()?;
        tracing::debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn load(&self) -> StorageResult<Vec<BookRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        match self.layout {
            JsonLayout::Array => {
                if content.trim().is_empty() {
                    return Ok(Vec::new());
                }
                Ok(serde_json::from_str(&content)?)
            }
            JsonLayout::Lines => content
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(index, line)| {
                    serde_json::from_str(line).map_err(|source| StorageError::MalformedLine {
                        line: index + 1,
                        source,
                    })
                })
                .collect(),
        }
    }
}

//! The record collection as the viewer sees it

use crate::config::OutputConfig;
use crate::record::BookRecord;
use crate::storage::{open_store, StorageError};
use crate::viewer::{ViewerError, ViewerResult};
use std::collections::BTreeSet;

/// Label of the choice that disables a category or rating filter
pub const ALL: &str = "All";

/// Lowest and highest parseable price of a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    /// Pulls `value` inside the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Summary figures shown beside the results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableStats {
    /// Number of rows
    pub total: usize,
    /// Distinct non-empty categories
    pub categories: usize,
    /// Distinct non-empty ratings
    pub ratings: usize,
}

/// A loaded record collection
#[derive(Debug, Clone)]
pub struct BookTable {
    rows: Vec<BookRecord>,
    currency_symbol: String,
}

impl BookTable {
    pub fn new(rows: Vec<BookRecord>, currency_symbol: impl Into<String>) -> Self {
        Self {
            rows,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Reads the whole collection from the configured store
    ///
    /// # Returns
    ///
    /// * `Ok(BookTable)` - At least one record was read
    /// * `Err(ViewerError::SourceMissing)` - The file does not exist or is empty
    /// * `Err(ViewerError::Storage)` - The file exists but cannot be decoded
    pub fn load(output: &OutputConfig, currency_symbol: &str) -> ViewerResult<Self> {
        let missing = || ViewerError::SourceMissing {
            path: output.records_path.clone(),
        };

        if !output.records_path.exists() {
            return Err(missing());
        }

        let store = open_store(output)?;
        let rows = match store.load() {
            Ok(rows) => rows,
            Err(StorageError::NotFound(_)) => return Err(missing()),
            Err(e) => return Err(e.into()),
        };

        if rows.is_empty() {
            return Err(missing());
        }

        tracing::debug!(
            "Loaded {} records from {}",
            rows.len(),
            output.records_path.display()
        );
        Ok(Self::new(rows, currency_symbol))
    }

    pub fn rows(&self) -> &[BookRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Numeric price of a row, None when its text does not parse
    pub fn price_of(&self, record: &BookRecord) -> Option<f64> {
        record.price_value(&self.currency_symbol)
    }

    /// Min and max over the rows whose price parses
    pub fn price_bounds(&self) -> Option<PriceBounds> {
        self.rows
            .iter()
            .filter_map(|record| self.price_of(record))
            .fold(None, |bounds, price| match bounds {
                None => Some(PriceBounds {
                    min: price,
                    max: price,
                }),
                Some(PriceBounds { min, max }) => Some(PriceBounds {
                    min: min.min(price),
                    max: max.max(price),
                }),
            })
    }

    /// `"All"` followed by the sorted distinct categories
    pub fn category_options(&self) -> Vec<String> {
        options(self.rows.iter().map(|record| record.category.as_str()))
    }

    /// `"All"` followed by the sorted distinct ratings
    pub fn rating_options(&self) -> Vec<String> {
        options(self.rows.iter().map(|record| record.rating.as_str()))
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            total: self.rows.len(),
            categories: distinct(self.rows.iter().map(|record| record.category.as_str())).len(),
            ratings: distinct(self.rows.iter().map(|record| record.rating.as_str())).len(),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> BTreeSet<&'a str> {
    values.filter(|value| !value.is_empty()).collect()
}

fn options<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    std::iter::once(ALL)
        .chain(distinct(values))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecordFormat;
    use std::fs;
    use tempfile::TempDir;

    fn book(title: &str, price: &str, category: &str, rating: &str) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            price: price.to_string(),
            availability: "In stock".to_string(),
            rating: rating.to_string(),
            description: String::new(),
            category: category.to_string(),
            image_url: None,
            url: format!("https://example.com/{}", title),
        }
    }

    fn table() -> BookTable {
        BookTable::new(
            vec![
                book("A", "£10.00", "Poetry", "Three"),
                book("B", "£20.00", "Fiction", "One"),
                book("C", "£5.50", "Poetry", "Three"),
                book("D", "unpriced", "", "Five"),
            ],
            "£",
        )
    }

    #[test]
    fn test_price_bounds_skip_unparseable() {
        assert_eq!(
            table().price_bounds(),
            Some(PriceBounds {
                min: 5.5,
                max: 20.0
            })
        );
    }

    #[test]
    fn test_price_bounds_none_when_nothing_parses() {
        let table = BookTable::new(vec![book("X", "?", "Poetry", "One")], "£");
        assert_eq!(table.price_bounds(), None);
    }

    #[test]
    fn test_options_start_with_all_and_are_sorted() {
        let table = table();
        assert_eq!(table.category_options(), ["All", "Fiction", "Poetry"]);
        assert_eq!(table.rating_options(), ["All", "Five", "One", "Three"]);
    }

    #[test]
    fn test_stats_count_distinct_non_empty() {
        assert_eq!(
            table().stats(),
            TableStats {
                total: 4,
                categories: 2,
                ratings: 3
            }
        );
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = PriceBounds {
            min: 5.0,
            max: 10.0,
        };
        assert_eq!(bounds.clamp(1.0), 5.0);
        assert_eq!(bounds.clamp(7.5), 7.5);
        assert_eq!(bounds.clamp(99.0), 10.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let output = OutputConfig {
            records_path: dir.path().join("books.json"),
            format: RecordFormat::Json,
        };

        assert!(matches!(
            BookTable::load(&output, "£"),
            Err(ViewerError::SourceMissing { .. })
        ));
    }

    #[test]
    fn test_load_empty_collection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");
        fs::write(&path, "[]").unwrap();
        let output = OutputConfig {
            records_path: path,
            format: RecordFormat::Json,
        };

        assert!(matches!(
            BookTable::load(&output, "£"),
            Err(ViewerError::SourceMissing { .. })
        ));
    }

    #[test]
    fn test_load_corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");
        fs::write(&path, "{ not json").unwrap();
        let output = OutputConfig {
            records_path: path,
            format: RecordFormat::Json,
        };

        assert!(matches!(
            BookTable::load(&output, "£"),
            Err(ViewerError::Storage(_))
        ));
    }
}

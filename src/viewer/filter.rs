//! Filtering a table down to the rows the user asked for
//!
//! All criteria are combined with AND. A filter with every criterion at its
//! default keeps every row.

use crate::record::BookRecord;
use crate::viewer::table::{BookTable, ALL};

/// Selection of one value out of a list, or none at all
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Maps a selection label; `"All"` disables the criterion
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case(ALL) {
            Self::All
        } else {
            Self::Only(label.to_string())
        }
    }

    /// Exact match against a field value
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(value) => value,
        }
    }
}

/// Active filter criteria
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookFilter {
    pub category: Choice,
    pub rating: Choice,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
    /// Inclusive upper price bound
    pub max_price: Option<f64>,
    /// Case-insensitive text searched in title and description
    pub query: String,
}

impl BookFilter {
    /// Checks one row; `price` is the row's parsed price
    ///
    /// A row whose price does not parse is never excluded by the price bounds.
    pub fn matches(&self, record: &BookRecord, price: Option<f64>) -> bool {
        self.category.accepts(&record.category)
            && self.rating.accepts(&record.rating)
            && self.price_matches(price)
            && self.query_matches(record)
    }

    fn price_matches(&self, price: Option<f64>) -> bool {
        let Some(price) = price else {
            return true;
        };
        self.min_price.map_or(true, |min| price >= min)
            && self.max_price.map_or(true, |max| price <= max)
    }

    fn query_matches(&self, record: &BookRecord) -> bool {
        if self.query.is_empty() {
            return true;
        }

        let needle = self.query.to_lowercase();
        record.title.to_lowercase().contains(&needle)
            || record.description.to_lowercase().contains(&needle)
    }
}

/// Returns the rows of `table` matching `filters`, in table order
///
/// # Example
///
/// ```
/// use book_scout::{filter, BookFilter, BookRecord, BookTable, Choice};
///
/// let book = |title: &str, category: &str| BookRecord {
///     title: title.to_string(),
///     price: "£10.00".to_string(),
///     availability: "In stock".to_string(),
///     rating: "Three".to_string(),
///     description: String::new(),
///     category: category.to_string(),
///     image_url: None,
///     url: format!("https://example.com/{}", title),
/// };
/// let table = BookTable::new(vec![book("Dune", "Fiction"), book("Odes", "Poetry")], "£");
///
/// let filters = BookFilter {
///     category: Choice::Only("Poetry".to_string()),
///     ..BookFilter::default()
/// };
/// let rows = filter(&table, &filters);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].title, "Odes");
/// ```
pub fn filter<'a>(table: &'a BookTable, filters: &BookFilter) -> Vec<&'a BookRecord> {
    table
        .rows()
        .iter()
        .filter(|record| filters.matches(record, table.price_of(record)))
        .collect()
}

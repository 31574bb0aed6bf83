//! Terminal rendering of filtered rows

use crate::record::BookRecord;
use crate::viewer::table::TableStats;
use std::fmt;

/// Longest title shown before truncation
pub const TITLE_LIMIT: usize = 50;

/// Longest description shown before truncation
pub const DESCRIPTION_LIMIT: usize = 100;

const ELLIPSIS: &str = "...";

/// Shown instead of cards when no row matched
pub const NO_RESULTS: &str = "No books found matching your criteria.";

/// Cuts `text` to `limit` characters, appending `...` when something was cut
///
/// ```
/// use book_scout::viewer::truncate;
///
/// assert_eq!(truncate("short", 10), "short");
/// assert_eq!(truncate("exactly ten", 11), "exactly ten");
/// assert_eq!(truncate("déjà vu again", 7), "déjà vu...");
/// ```
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Display form of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCard {
    pub title: String,
    pub price: String,
    pub rating: String,
    pub category: String,
    pub availability: String,
    /// Absent when the row has no description text
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub url: String,
}

impl From<&BookRecord> for BookCard {
    fn from(record: &BookRecord) -> Self {
        Self {
            title: truncate(&record.title, TITLE_LIMIT),
            price: record.price.clone(),
            rating: record.rating.clone(),
            category: record.category.clone(),
            availability: record.availability.clone(),
            description: (!record.description.is_empty())
                .then(|| truncate(&record.description, DESCRIPTION_LIMIT)),
            image_url: record.image_url.clone(),
            url: record.url.clone(),
        }
    }
}

impl fmt::Display for BookCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(image_url) = &self.image_url {
            writeln!(f, "  Cover: {}", image_url)?;
        }
        writeln!(f, "  Price: {}", self.price)?;
        writeln!(f, "  Rating: {}", self.rating)?;
        writeln!(f, "  Category: {}", self.category)?;
        writeln!(f, "  Availability: {}", self.availability)?;
        if let Some(description) = &self.description {
            writeln!(f, "  Description: {}", description)?;
        }
        if !self.url.is_empty() {
            writeln!(f, "  Details: {}", self.url)?;
        }
        Ok(())
    }
}

/// Builds one card per row, keeping the row order
pub fn render<'a>(rows: impl IntoIterator<Item = &'a BookRecord>) -> Vec<BookCard> {
    rows.into_iter().map(BookCard::from).collect()
}

/// Result header followed by the cards, or the no-results notice
pub fn render_results(cards: &[BookCard]) -> String {
    let mut out = format!("Found {} books\n\n", cards.len());

    if cards.is_empty() {
        out.push_str(NO_RESULTS);
        out.push('\n');
        return out;
    }

    for card in cards {
        out.push_str(&card.to_string());
        out.push('\n');
    }
    out
}

pub fn render_stats(stats: &TableStats) -> String {
    format!(
        "Total Books: {}\nCategories: {}\nUnique Ratings: {}\n",
        stats.total, stats.categories, stats.ratings
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, description: &str) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            price: "£51.77".to_string(),
            availability: "In stock (22 available)".to_string(),
            rating: "Three".to_string(),
            description: description.to_string(),
            category: "Poetry".to_string(),
            image_url: Some("https://books.toscrape.com/media/cover.jpg".to_string()),
            url: "https://books.toscrape.com/catalogue/a_1/index.html".to_string(),
        }
    }

    #[test]
    fn test_truncate_boundaries() {
        let fifty = "x".repeat(50);
        let fifty_one = "x".repeat(51);

        assert_eq!(truncate(&fifty, TITLE_LIMIT), fifty);
        assert_eq!(truncate(&fifty_one, TITLE_LIMIT), format!("{}...", fifty));
        assert_eq!(truncate("", TITLE_LIMIT), "");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let title = "é".repeat(60);
        let cut = truncate(&title, TITLE_LIMIT);

        assert_eq!(cut.chars().count(), TITLE_LIMIT + ELLIPSIS.len());
        assert!(cut.starts_with(&"é".repeat(50)));
    }

    #[test]
    fn test_card_truncates_title_and_description() {
        let card = BookCard::from(&record(&"T".repeat(80), &"d".repeat(150)));

        assert_eq!(card.title, format!("{}...", "T".repeat(50)));
        assert_eq!(card.description, Some(format!("{}...", "d".repeat(100))));
    }

    #[test]
    fn test_empty_description_is_omitted() {
        let card = BookCard::from(&record("Short", ""));
        assert_eq!(card.description, None);
        assert!(!card.to_string().contains("Description"));
    }

    #[test]
    fn test_render_keeps_order() {
        let rows = [record("First", "a"), record("Second", "b")];
        let cards = render(rows.iter());
        assert_eq!(cards[0].title, "First");
        assert_eq!(cards[1].title, "Second");
    }

    #[test]
    fn test_render_results() {
        let cards = render([record("Only", "Text")].iter());
        let text = render_results(&cards);
        assert!(text.starts_with("Found 1 books\n"));
        assert!(text.contains("Only"));
        assert!(text.contains("Price: £51.77"));
        assert!(text.contains("Details: https://books.toscrape.com/catalogue/a_1/index.html"));

        let empty = render_results(&[]);
        assert!(empty.starts_with("Found 0 books"));
        assert!(empty.contains(NO_RESULTS));
    }

    #[test]
    fn test_render_stats() {
        let stats = TableStats {
            total: 3,
            categories: 2,
            ratings: 1,
        };
        assert_eq!(
            render_stats(&stats),
            "Total Books: 3\nCategories: 2\nUnique Ratings: 1\n"
        );
    }
}

//! Book record produced by the crawler and consumed by the viewer

use serde::{Deserialize, Deserializer, Serialize};

/// Availability used when a detail page carries no stock text
pub const NO_AVAILABILITY: &str = "Not available";

/// Rating used when a detail page carries no star-rating element
pub const NO_RATING: &str = "No rating";

/// Description used when a detail page carries no product description
pub const NO_DESCRIPTION: &str = "No description available";

/// One book, as extracted from its detail page
///
/// Records are never mutated after extraction. `url` is the identity key;
/// uniqueness is a property of the crawl, not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Currency-prefixed numeral, e.g. "£51.77"
    #[serde(default, deserialize_with = "null_as_empty")]
    pub price: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub availability: String,

    /// Star-rating word such as "Three"
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rating: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    /// Breadcrumb category; empty when the page had none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,

    /// Absolute cover image URL
    #[serde(default)]
    pub image_url: Option<String>,

    /// Canonical detail-page URL
    pub url: String,
}

impl BookRecord {
    /// Numeric price with `currency_symbol` stripped
    pub fn price_value(&self, currency_symbol: &str) -> Option<f64> {
        parse_price(&self.price, currency_symbol)
    }
}

/// Parses price text such as "£51.77" into a number
///
/// The currency symbol and surrounding whitespace are removed; anything left
/// that is not a finite decimal number yields `None`.
///
/// ```
/// use book_scout::parse_price;
///
/// assert_eq!(parse_price("£51.77", "£"), Some(51.77));
/// assert_eq!(parse_price(" 12 ", "£"), Some(12.0));
/// assert_eq!(parse_price("free", "£"), None);
/// ```
pub fn parse_price(text: &str, currency_symbol: &str) -> Option<f64> {
    let numeral = if currency_symbol.is_empty() {
        text.to_string()
    } else {
        text.replace(currency_symbol, "")
    };

    numeral
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

//! URL handling module for Book-Scout
//!
//! This module provides URL normalization (the crawl's deduplication key),
//! host extraction, and host-pattern matching for the off-site filter.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, origin_key, robots_url};
pub use matcher::{matches_wildcard, HostFilter};
pub use normalize::normalize_url;

//! Crawler module for catalogue fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Listing page link discovery and detail page extraction
//! - Request scheduling and politeness delays
//! - Overall crawl coordination

mod coordinator;
mod extract;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use extract::extract_book;
pub use fetcher::{build_http_client, fetch_page, FetchResult, RetryPolicy};
pub use parser::{discover, ListingPage};
pub use scheduler::{Dispatch, Enqueued, PageKind, QueuedUrl, Scheduler};

use crate::config::Config;
use crate::ScoutError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Seed the frontier with the configured seed URL
/// 3. Walk the listing pages and fetch every detail page they link to
/// 4. Return the extracted records with the crawl statistics
///
/// Persisting the records is left to the caller.
pub async fn crawl(config: Config) -> Result<CrawlOutcome, ScoutError> {
    run_crawl(config).await
}

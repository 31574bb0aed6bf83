//! Statistics gathered while crawling
//!
//! The coordinator records every settled page here; the binary prints the
//! result once the run is over.

use crate::crawler::PageKind;
use crate::state::PageState;
use std::collections::BTreeMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Listing pages dispatched
    pub listing_pages: u64,

    /// Detail pages dispatched
    pub detail_pages: u64,

    /// Records extracted
    pub records: u64,

    /// Count of pages by state
    pub pages_by_state: BTreeMap<PageState, u64>,

    /// Links dropped because an equivalent URL was already queued
    pub duplicates_skipped: u64,

    /// Links dropped because their host is not allowed
    pub offsite_skipped: u64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a page of `kind` settled in `state`
    pub fn record_page(&mut self, kind: PageKind, state: PageState) {
        match kind {
            PageKind::Listing => self.listing_pages += 1,
            PageKind::Detail => self.detail_pages += 1,
        }
        *self.pages_by_state.entry(state).or_insert(0) += 1;
    }

    /// Total pages that settled
    pub fn total_pages(&self) -> u64 {
        self.listing_pages + self.detail_pages
    }

    /// Pages in an error state
    pub fn error_count(&self) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| state.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Number of pages in `state`
    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Share of settled pages that were processed, as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_pages();
        if total == 0 {
            return 0.0;
        }
        self.count(PageState::Processed) as f64 / total as f64 * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Listing pages: {}", stats.listing_pages);
    println!("  Detail pages: {}", stats.detail_pages);
    println!("  Records extracted: {}", stats.records);
    println!("  Duplicate links skipped: {}", stats.duplicates_skipped);
    println!("  Off-site links skipped: {}", stats.offsite_skipped);
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    println!("Pages by State:");
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1));

    let total = stats.total_pages();
    for (state, count) in state_counts {
        let percentage = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    let errors = stats.error_count();
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Success rate: {:.1}%", stats.success_rate());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_page_counts_kind_and_state() {
        let mut stats = CrawlStatistics::new();
        stats.record_page(PageKind::Listing, PageState::Processed);
        stats.record_page(PageKind::Detail, PageState::Processed);
        stats.record_page(PageKind::Detail, PageState::DeadLink);

        assert_eq!(stats.listing_pages, 1);
        assert_eq!(stats.detail_pages, 2);
        assert_eq!(stats.total_pages(), 3);
        assert_eq!(stats.count(PageState::Processed), 2);
        assert_eq!(stats.count(PageState::DeadLink), 1);
        assert_eq!(stats.count(PageState::Failed), 0);
    }

    #[test]
    fn test_error_count_excludes_skips() {
        let mut stats = CrawlStatistics::new();
        stats.record_page(PageKind::Detail, PageState::Failed);
        stats.record_page(PageKind::Detail, PageState::Unreachable);
        stats.record_page(PageKind::Detail, PageState::Disallowed);
        stats.record_page(PageKind::Detail, PageState::Processed);

        assert_eq!(stats.error_count(), 2);
    }

    #[test]
    fn test_success_rate() {
        let mut stats = CrawlStatistics::new();
        assert_eq!(stats.success_rate(), 0.0);

        stats.record_page(PageKind::Listing, PageState::Processed);
        stats.record_page(PageKind::Detail, PageState::Failed);
        assert!((stats.success_rate() - 50.0).abs() < f64::EPSILON);
    }
}

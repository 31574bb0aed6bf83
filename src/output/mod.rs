//! Output module for reporting crawl results
//!
//! This module handles:
//! - Recording crawl statistics while pages settle
//! - Printing the statistics once a run is over

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};

//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier with the catalogue's first listing page
//! - Keeping a bounded number of fetches in flight
//! - Following pagination and detail links found on listing pages
//! - Extracting one record per detail page
//! - Gathering crawl statistics

use crate::config::Config;
use crate::crawler::extract::extract_book;
use crate::crawler::parser::discover;
use crate::crawler::scheduler::{Dispatch, Enqueued, PageKind, QueuedUrl, Scheduler};
use crate::crawler::{build_http_client, fetch_page, FetchResult, RetryPolicy};
use crate::output::CrawlStatistics;
use crate::record::BookRecord;
use crate::robots::{fetch_robots, is_allowed, RobotsCache};
use crate::state::PageState;
use crate::url::HostFilter;
use crate::ScoutError;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use url::Url;

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Extracted records, in the order their pages completed
    pub records: Vec<BookRecord>,

    pub statistics: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    scheduler: Scheduler,
    robots: RobotsCache,
    host_filter: HostFilter,
    retry: RetryPolicy,
    records: Vec<BookRecord>,
    stats: CrawlStatistics,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Frontier seeded with the seed URL
    /// * `Err(ScoutError)` - The HTTP client or the seed URL is unusable
    pub fn new(config: Config) -> Result<Self, ScoutError> {
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        let seed = Url::parse(&config.crawler.seed_url)?;

        let host_filter = HostFilter::new(&config.crawler.allowed_domains, &seed);
        let mut scheduler = Scheduler::new(
            Duration::from_millis(config.crawler.request_delay_ms),
            config.crawler.deduplicate,
        );
        scheduler.enqueue(&seed, PageKind::Listing)?;

        tracing::info!(
            "Seeded frontier with {} (allowed hosts: {})",
            seed,
            host_filter.patterns().join(", ")
        );

        Ok(Self {
            retry: RetryPolicy::from_config(&config.crawler),
            config: Arc::new(config),
            client,
            scheduler,
            robots: RobotsCache::new(),
            host_filter,
            records: Vec::new(),
            stats: CrawlStatistics::new(),
        })
    }

    /// Runs the main crawl loop until the frontier is drained
    ///
    /// Up to `max-concurrent-requests` fetches run as tokio tasks. Their
    /// results are handled one at a time on this task, so the frontier,
    /// the record list and the statistics need no locking.
    pub async fn run(mut self) -> Result<CrawlOutcome, ScoutError> {
        let start_time = Instant::now();
        let max_in_flight = self.config.crawler.max_concurrent_requests.max(1) as usize;
        let mut in_flight: JoinSet<(QueuedUrl, FetchResult)> = JoinSet::new();
        let mut settled: u64 = 0;

        loop {
            let mut wait = None;

            while in_flight.len() < max_in_flight {
                match self.scheduler.next_ready(Instant::now()) {
                    Dispatch::Ready(queued) => {
                        if !self.permitted(&queued).await {
                            tracing::info!("URL {} disallowed by robots.txt", queued.url);
                            self.stats.record_page(queued.kind, PageState::Disallowed);
                            continue;
                        }

                        let client = self.client.clone();
                        let retry = self.retry;
                        in_flight.spawn(async move {
                            let result = fetch_page(&client, &queued.url, &retry).await;
                            (queued, result)
                        });
                    }
                    Dispatch::Wait(duration) => {
                        wait = Some(duration);
                        break;
                    }
                    Dispatch::Empty => break,
                }
            }

            if in_flight.is_empty() {
                match wait {
                    Some(duration) => {
                        tokio::time::sleep(duration).await;
                        continue;
                    }
                    None => {
                        tracing::info!("Frontier is empty, crawl complete");
                        break;
                    }
                }
            }

            let joined = match wait {
                Some(duration) => tokio::select! {
                    joined = in_flight.join_next() => joined,
                    _ = tokio::time::sleep(duration) => continue,
                },
                None => in_flight.join_next().await,
            };

            let Some(joined) = joined else {
                continue;
            };
            let (queued, result) = joined?;
            self.handle_result(&queued, result);

            settled += 1;
            if settled % 50 == 0 {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {} pages settled, {} records, {} in frontier, {:.2} pages/sec",
                    settled,
                    self.records.len(),
                    self.scheduler.frontier_size(),
                    settled as f64 / elapsed.as_secs_f64()
                );
            }
        }

        self.stats.records = self.records.len() as u64;
        self.stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl completed: {} records from {} pages in {:?}",
            self.stats.records,
            self.stats.total_pages(),
            self.stats.elapsed
        );

        Ok(CrawlOutcome {
            records: self.records,
            statistics: self.stats,
        })
    }

    /// Settles one fetched page
    ///
    /// Failures are logged and counted; they never abort the crawl.
    fn handle_result(&mut self, queued: &QueuedUrl, result: FetchResult) {
        let state = result.page_state();

        match result {
            FetchResult::Success {
                final_url, body, ..
            } => match queued.kind {
                PageKind::Listing => {
                    let listing = discover(&body, &final_url);
                    tracing::debug!(
                        "Listing {} links to {} books (next page: {})",
                        final_url,
                        listing.detail_links.len(),
                        listing.next_page.is_some()
                    );

                    for link in &listing.detail_links {
                        self.offer(link, PageKind::Detail);
                    }
                    if let Some(next) = &listing.next_page {
                        self.offer(next, PageKind::Listing);
                    }
                }
                PageKind::Detail => {
                    let record = extract_book(&body, &final_url);
                    tracing::debug!("Extracted \"{}\" from {}", record.title, final_url);
                    self.records.push(record);
                }
            },

            FetchResult::ContentMismatch { content_type } => {
                tracing::warn!(
                    "Skipping {}: expected HTML, got {}",
                    queued.url,
                    content_type
                );
            }

            FetchResult::HttpError { status_code, .. } => {
                tracing::warn!("Skipping {}: HTTP {}", queued.url, status_code);
            }

            FetchResult::NetworkError { error, .. } => {
                tracing::warn!("Skipping {}: {}", queued.url, error);
            }
        }

        self.stats.record_page(queued.kind, state);
    }

    /// Offers a discovered link to the frontier
    fn offer(&mut self, link: &Url, kind: PageKind) {
        if !self.host_filter.allows(link) {
            tracing::debug!("Skipping off-site link {}", link);
            self.stats.offsite_skipped += 1;
            return;
        }

        match self.scheduler.enqueue(link, kind) {
            Ok(Enqueued::Queued) => {}
            Ok(Enqueued::Duplicate) => {
                tracing::trace!("Already queued: {}", link);
                self.stats.duplicates_skipped += 1;
            }
            Err(e) => tracing::debug!("Failed to queue {}: {}", link, e),
        }
    }

    /// Checks robots.txt for a URL, fetching it once per origin
    async fn permitted(&mut self, queued: &QueuedUrl) -> bool {
        if !self.config.crawler.obey_robots {
            return true;
        }

        let agent = self.config.user_agent.crawler_name.as_str();

        if self.robots.get(&queued.origin).is_none() {
            let robots = fetch_robots(&self.client, &queued.url).await;

            if let Some(delay) = robots
                .crawl_delay(agent)
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            {
                tracing::info!("Honouring Crawl-delay of {:?} for {}", delay, queued.origin);
                self.scheduler.set_crawl_delay(&queued.origin, delay);
            }

            self.robots.insert(&queued.origin, robots);
        }

        self.robots
            .get(&queued.origin)
            .map_or(true, |robots| is_allowed(robots, &queued.url, agent))
    }
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The records and statistics of the finished crawl
/// * `Err(ScoutError)` - Crawl could not start or a fetch task panicked
///
/// # Example
///
/// ```no_run
/// use book_scout::config::load_config;
/// use book_scout::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let outcome = run_crawl(config).await?;
/// println!("{} books", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, ScoutError> {
    Coordinator::new(config)?.run().await
}

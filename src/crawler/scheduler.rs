//! Scheduler for managing the crawl frontier and politeness delays
//!
//! This module handles:
//! - Priority queue management for URLs to crawl
//! - Request deduplication by normalized URL
//! - Per-origin minimum delays between requests
//! - Integrating robots.txt crawl delays

use crate::state::HostState;
use crate::url::{normalize_url, origin_key};
use crate::UrlError;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::{Duration, Instant};
use url::Url;

/// Role of a page in the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Paginated page of book summaries
    Listing,
    /// Page describing a single book
    Detail,
}

impl PageKind {
    /// Listing pages go first so pagination is never starved by detail pages
    fn priority(self) -> u32 {
        match self {
            Self::Listing => 0,
            Self::Detail => 10,
        }
    }
}

/// A URL queued for fetching with priority information
#[derive(Debug, Clone)]
pub struct QueuedUrl {
    /// The URL to fetch (normalized)
    pub url: Url,

    /// The `host:port` of this URL
    pub origin: String,

    /// What the page is expected to contain
    pub kind: PageKind,

    /// Priority value (lower is higher priority)
    pub priority: u32,

    /// Enqueue order, breaks priority ties first-in first-out
    sequence: u64,
}

// Lower priority values, then earlier sequence numbers, pop first from the BinaryHeap
impl Ord for QueuedUrl {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueuedUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedUrl {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for QueuedUrl {}

#[cfg(test)]
impl QueuedUrl {
    pub(crate) fn for_test(url: Url, kind: PageKind) -> Self {
        Self {
            origin: origin_key(&url).unwrap_or_default(),
            url,
            kind,
            priority: kind.priority(),
            sequence: 0,
        }
    }
}

/// What the frontier can offer right now
#[derive(Debug)]
pub enum Dispatch {
    /// A URL whose origin may be requested now; the request is already recorded
    Ready(QueuedUrl),
    /// URLs are queued but every origin is still cooling down
    Wait(Duration),
    /// Nothing left to fetch
    Empty,
}

/// Result of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    Queued,
    Duplicate,
}

/// Scheduler manages the frontier queue and per-origin pacing
///
/// Listing pages are always deduplicated so a pagination cycle cannot keep the
/// crawl alive forever. Detail pages are deduplicated only when configured to be.
pub struct Scheduler {
    /// Frontier priority queue of URLs to fetch
    frontier: BinaryHeap<QueuedUrl>,

    /// Per-origin request timing
    hosts: HashMap<String, HostState>,

    /// Normalized URLs already accepted, per page kind
    seen: HashSet<(PageKind, String)>,

    /// Whether detail pages are deduplicated
    deduplicate_details: bool,

    /// Configured minimum delay between requests to one origin
    request_delay: Duration,

    next_sequence: u64,
}

impl Scheduler {
    /// Creates a new scheduler with an empty frontier
    pub fn new(request_delay: Duration, deduplicate_details: bool) -> Self {
        Self {
            frontier: BinaryHeap::new(),
            hosts: HashMap::new(),
            seen: HashSet::new(),
            deduplicate_details,
            request_delay,
            next_sequence: 0,
        }
    }

    /// Adds a URL to the frontier unless it is a duplicate
    ///
    /// # Returns
    ///
    /// * `Ok(Enqueued::Queued)` - The URL will be fetched
    /// * `Ok(Enqueued::Duplicate)` - An equivalent URL was queued before
    /// * `Err(UrlError)` - The URL cannot be crawled
    pub fn enqueue(&mut self, url: &Url, kind: PageKind) -> Result<Enqueued, UrlError> {
        let url = normalize_url(url.as_str())?;
        let origin = origin_key(&url).ok_or(UrlError::MissingHost)?;

        let dedup = kind == PageKind::Listing || self.deduplicate_details;
        if dedup && !self.seen.insert((kind, url.to_string())) {
            return Ok(Enqueued::Duplicate);
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.frontier.push(QueuedUrl {
            url,
            origin,
            kind,
            priority: kind.priority(),
            sequence,
        });

        Ok(Enqueued::Queued)
    }

    /// Takes the highest-priority URL whose origin may be requested at `now`
    ///
    /// URLs of origins that are still cooling down keep their place in the
    /// frontier. When none is ready, the shortest remaining cool-down is returned.
    pub fn next_ready(&mut self, now: Instant) -> Dispatch {
        if self.frontier.is_empty() {
            return Dispatch::Empty;
        }

        let mut not_ready = Vec::new();
        let mut found = None;
        let mut min_wait: Option<Duration> = None;

        while let Some(queued) = self.frontier.pop() {
            let wait = self
                .hosts
                .get(&queued.origin)
                .and_then(|state| state.time_until_next_request(self.request_delay, now));

            match wait {
                None => {
                    found = Some(queued);
                    break;
                }
                Some(wait) => {
                    min_wait = Some(min_wait.map_or(wait, |current| current.min(wait)));
                    not_ready.push(queued);
                }
            }
        }

        self.frontier.extend(not_ready);

        match found {
            Some(queued) => {
                self.hosts
                    .entry(queued.origin.clone())
                    .or_default()
                    .record_request(now);
                tracing::trace!("Dispatching {:?} page {}", queued.kind, queued.url);
                Dispatch::Ready(queued)
            }
            None => Dispatch::Wait(min_wait.unwrap_or(Duration::from_millis(10))),
        }
    }

    /// Applies a robots.txt Crawl-delay to an origin
    pub fn set_crawl_delay(&mut self, origin: &str, delay: Duration) {
        self.hosts.entry(origin.to_string()).or_default().crawl_delay = Some(delay);
    }

    /// Returns the number of URLs in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Gets the state of an origin
    pub fn host_state(&self, origin: &str) -> Option<&HostState> {
        self.hosts.get(origin)
    }
}

use std::time::{Duration, Instant};

/// Tracks the request timing of one origin during crawling
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of requests dispatched to this origin
    pub request_count: u32,

    /// When the last request to this origin was dispatched
    pub last_request_time: Option<Instant>,

    /// Crawl-delay announced by the origin's robots.txt
    pub crawl_delay: Option<Duration>,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay to honour between requests: the larger of the configured
    /// delay and the robots.txt crawl-delay
    pub fn effective_delay(&self, configured: Duration) -> Duration {
        match self.crawl_delay {
            Some(robots) => configured.max(robots),
            None => configured,
        }
    }

    /// Checks if a request can be dispatched to this origin at `now`
    pub fn can_request(&self, configured: Duration, now: Instant) -> bool {
        self.time_until_next_request(configured, now).is_none()
    }

    /// Returns None if a request can be made now, or the duration to wait otherwise
    pub fn time_until_next_request(&self, configured: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let delay = self.effective_delay(configured);
        let elapsed = now.saturating_duration_since(last);
        (elapsed < delay).then(|| delay - elapsed)
    }

    /// Records that a request was dispatched at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }
}

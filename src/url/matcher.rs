use url::Url;

use crate::url::extract_host;

/// Checks if a host matches a wildcard pattern
///
/// This function supports two types of patterns:
/// 1. Exact match: "example.com" matches only "example.com"
/// 2. Wildcard match: "*.example.com" matches the bare domain and any
///    subdomain ("blog.example.com", "api.v2.example.com")
///
/// # Examples
///
/// ```
/// use book_scout::url::matches_wildcard;
///
/// assert!(matches_wildcard("example.com", "example.com"));
/// assert!(!matches_wildcard("example.com", "other.com"));
/// assert!(matches_wildcard("*.example.com", "example.com"));
/// assert!(matches_wildcard("*.example.com", "api.v2.example.com"));
/// assert!(!matches_wildcard("*.example.com", "example.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base || candidate.ends_with(&format!(".{}", base))
    } else {
        candidate == pattern
    }
}

/// Decides which discovered links stay on-site
#[derive(Debug, Clone)]
pub struct HostFilter {
    patterns: Vec<String>,
}

impl HostFilter {
    /// Builds a filter from configured patterns, falling back to the seed's
    /// own host when none are configured
    pub fn new(patterns: &[String], seed: &Url) -> Self {
        let patterns = if patterns.is_empty() {
            extract_host(seed).into_iter().collect()
        } else {
            patterns.iter().map(|p| p.to_lowercase()).collect()
        };

        Self { patterns }
    }

    /// Returns true if `url` points at an allowed host
    pub fn allows(&self, url: &Url) -> bool {
        match extract_host(url) {
            Some(host) => self.patterns.iter().any(|p| matches_wildcard(p, &host)),
            None => false,
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Retry logic for transient failures
//! - Error classification

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::state::PageState;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Page is not a text document (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// HTTP error that maps to a specific page state
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// The page state this error maps to
        state: PageState,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// The page state this error maps to
        state: PageState,
    },
}

impl FetchResult {
    /// The page state this result settles the page in
    pub fn page_state(&self) -> PageState {
        match self {
            Self::Success { .. } => PageState::Processed,
            Self::ContentMismatch { .. } => PageState::ContentMismatch,
            Self::HttpError { state, .. } | Self::NetworkError { state, .. } => *state,
        }
    }
}

/// How transient failures are retried
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Pause before each retry
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use book_scout::config::{CrawlerConfig, UserAgentConfig};
/// use book_scout::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "BookScout".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&CrawlerConfig::default(), &user_agent).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, retrying transient failures
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 404 / 410 | Immediate → DeadLink |
/// | HTTP 408 / 429 / 5xx | Retry, then → Failed |
/// | Timeout / connection error | Retry, then → Unreachable |
/// | Other HTTP errors | Immediate → Failed |
/// | Non-text Content-Type | Immediate → ContentMismatch |
pub async fn fetch_page(client: &Client, url: &Url, policy: &RetryPolicy) -> FetchResult {
    let mut attempt = 0;

    loop {
        let (result, transient) = fetch_once(client, url).await;

        if !transient || attempt >= policy.max_retries {
            if transient && attempt > 0 {
                tracing::warn!("Giving up on {} after {} retries", url, attempt);
            }
            return result;
        }

        attempt += 1;
        tracing::debug!(
            "Retrying {} (attempt {}/{}): {:?}",
            url,
            attempt,
            policy.max_retries,
            result
        );
        tokio::time::sleep(policy.delay).await;
    }
}

/// One request; the flag tells whether the failure is worth retrying
async fn fetch_once(client: &Client, url: &Url) -> (FetchResult, bool) {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return classify_network_error(&e),
    };

    let status = response.status();
    let final_url = response.url().clone();

    if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        return (
            FetchResult::HttpError {
                status_code: status.as_u16(),
                state: PageState::DeadLink,
            },
            false,
        );
    }

    if !status.is_success() {
        let transient = status.is_server_error()
            || status == StatusCode::TOO_MANY_REQUESTS
            || status == StatusCode::REQUEST_TIMEOUT;
        return (
            FetchResult::HttpError {
                status_code: status.as_u16(),
                state: PageState::Failed,
            },
            transient,
        );
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_text_document(&content_type) {
        return (FetchResult::ContentMismatch { content_type }, false);
    }

    match response.text().await {
        Ok(body) => (
            FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                body,
            },
            false,
        ),
        Err(e) => {
            let transient = e.is_timeout();
            (
                FetchResult::NetworkError {
                    error: e.to_string(),
                    state: PageState::Failed,
                },
                transient,
            )
        }
    }
}

fn classify_network_error(e: &reqwest::Error) -> (FetchResult, bool) {
    if e.is_timeout() {
        (
            FetchResult::NetworkError {
                error: "Request timeout".to_string(),
                state: PageState::Unreachable,
            },
            true,
        )
    } else if e.is_connect() {
        (
            FetchResult::NetworkError {
                error: format!("Connection failed: {}", e),
                state: PageState::Unreachable,
            },
            true,
        )
    } else {
        (
            FetchResult::NetworkError {
                error: e.to_string(),
                state: PageState::Failed,
            },
            false,
        )
    }
}

/// Catalogue pages are HTML; a missing header is given the benefit of the doubt
fn is_text_document(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty() || content_type.starts_with("text/") || content_type.contains("html")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&CrawlerConfig::default(), &create_test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            create_test_config().header_value(),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_is_text_document() {
        assert!(is_text_document("text/html; charset=utf-8"));
        assert!(is_text_document("application/xhtml+xml"));
        assert!(is_text_document("text/plain"));
        assert!(is_text_document(""));
        assert!(!is_text_document("image/jpeg"));
        assert!(!is_text_document("application/pdf"));
    }

    #[test]
    fn test_page_state_mapping() {
        let dead = FetchResult::HttpError {
            status_code: 404,
            state: PageState::DeadLink,
        };
        assert_eq!(dead.page_state(), PageState::DeadLink);

        let mismatch = FetchResult::ContentMismatch {
            content_type: "image/png".to_string(),
        };
        assert_eq!(mismatch.page_state(), PageState::ContentMismatch);
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = CrawlerConfig {
            max_retries: 3,
            retry_delay_ms: 250,
            ..CrawlerConfig::default()
        };
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.delay, Duration::from_millis(250));
    }

    // Retry and status handling against a live server is covered by the
    // wiremock tests in tests/crawl_tests.rs
}

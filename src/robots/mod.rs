//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! It respects robots.txt directives when crawling websites.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::ParsedRobots;

use crate::url::robots_url;
use reqwest::Client;
use url::Url;

/// Fetches the robots.txt governing `page_url`
///
/// A missing file (4xx) or an unreachable server means everything is
/// allowed; robots.txt problems never stop a crawl.
pub async fn fetch_robots(client: &Client, page_url: &Url) -> ParsedRobots {
    let Some(location) = robots_url(page_url) else {
        return ParsedRobots::allow_all();
    };

    tracing::debug!("Fetching robots.txt: {}", location);

    let response = match client.get(location.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Could not fetch {}: {}; allowing all", location, e);
            return ParsedRobots::allow_all();
        }
    };

    if !response.status().is_success() {
        tracing::debug!(
            "robots.txt at {} returned HTTP {}; allowing all",
            location,
            response.status().as_u16()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::warn!("Could not read {}: {}; allowing all", location, e);
            ParsedRobots::allow_all()
        }
    }
}

/// Checks if a URL is allowed by robots.txt
///
/// # Arguments
///
/// * `robots` - The parsed robots.txt data
/// * `url` - The absolute URL to check
/// * `user_agent` - The crawler's product token (e.g. "BookScout")
pub fn is_allowed(robots: &ParsedRobots, url: &Url, user_agent: &str) -> bool {
    robots.is_allowed(url.as_str(), user_agent)
}

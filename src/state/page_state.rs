//! Page outcome definitions for crawl bookkeeping
//!
//! Every fetched (or deliberately skipped) page ends in exactly one of these.
use std::fmt;

/// Represents how the visit of a single page ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    /// Page was fetched and its content used
    Processed,

    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page could not be reached (connection refused, DNS failure, timeout)
    Unreachable,

    /// Page fetch failed for other reasons (other HTTP errors, unreadable body)
    Failed,

    /// Page Content-Type is not a text document
    ContentMismatch,

    /// robots.txt forbids fetching the page
    Disallowed,
}

impl PageState {
    /// Returns true if the page content was used
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns true if the page was deliberately not fetched
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Disallowed)
    }

    /// Returns true if this represents an error
    pub fn is_error(&self) -> bool {
        !self.is_success() && !self.is_skipped()
    }

    /// Stable snake_case name, used in logs and the crawl statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::DeadLink => "dead_link",
            Self::Unreachable => "unreachable",
            Self::Failed => "failed",
            Self::ContentMismatch => "content_mismatch",
            Self::Disallowed => "disallowed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> [Self; 6] {
        [
            Self::Processed,
            Self::DeadLink,
            Self::Unreachable,
            Self::Failed,
            Self::ContentMismatch,
            Self::Disallowed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

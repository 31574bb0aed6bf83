//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: The outcome of visiting one page
//! - `HostState`: Per-origin request timing used for politeness delays

mod host_state;
mod page_state;

pub use host_state::HostState;
pub use page_state::PageState;

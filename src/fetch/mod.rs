//! Page fetching: turns a URL into the visible text of the page.

pub mod html;
pub mod http;

pub use html::visible_text;
pub use http::HttpPageFetcher;

use async_trait::async_trait;

use crate::error::FetchError;

/// Fetches a page and returns its human-readable text.
///
/// A single attempt per call; callers decide what a failure means.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_visible_text(&self, url: &str) -> Result<String, FetchError>;
}

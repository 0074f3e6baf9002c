//! Provider trait decoupling the search session from the HTTP transport

use async_trait::async_trait;

use crate::error::GiphyResult;
use crate::models::{GifPage, PageRequest};

/// Read-only access to a remote GIF catalog.
///
/// Both operations are a single round trip: no retries, no caching.
/// Retry and backoff policy belongs to the caller.
#[async_trait]
pub trait GifProvider: Send + Sync {
    /// Fetch the current trending listing
    async fn trending(&self, page: &PageRequest) -> GiphyResult<GifPage>;

    /// Fetch gifs matching a free-text query
    async fn search(&self, query: &str, page: &PageRequest) -> GiphyResult<GifPage>;
}

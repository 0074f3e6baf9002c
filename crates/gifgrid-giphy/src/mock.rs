//! Mock implementation of [`GifProvider`] for testing
//!
//! Responses are scripted in FIFO order; every call is recorded so tests
//! can assert exactly which requests were issued (and how many).

// Allow test-specific patterns in mock implementation
#![allow(clippy::unwrap_used)] // Mocks can panic on lock poisoning
#![allow(clippy::expect_used)] // Test code can use expect
#![allow(clippy::arithmetic_side_effects)] // Test counters can overflow

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{GiphyError, GiphyResult};
use crate::models::{Gif, GifPage, PageRequest, Pagination, Rendition, Renditions};
use crate::traits::GifProvider;

/// One request observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// A trending listing request
    Trending { limit: usize, offset: usize },
    /// A query listing request
    Search {
        query: String,
        limit: usize,
        offset: usize,
    },
}

type ScriptedResponse = (Option<Duration>, GiphyResult<GifPage>);

/// Scripted [`GifProvider`] for orchestrator tests
#[derive(Clone, Default)]
pub struct MockGifProvider {
    responses: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockGifProvider {
    /// Create a mock with no scripted responses (calls return empty pages)
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next response as a successful page
    pub fn push_page(&self, page: GifPage) {
        self.responses.lock().unwrap().push_back((None, Ok(page)));
    }

    /// Script a successful page that resolves only after `delay`.
    ///
    /// Used to hold a fetch in flight while a newer one supersedes it.
    pub fn push_page_delayed(&self, page: GifPage, delay: Duration) {
        self.responses
            .lock()
            .unwrap()
            .push_back((Some(delay), Ok(page)));
    }

    /// Script the next response as a transport failure
    pub fn push_error(&self, error: GiphyError) {
        self.responses.lock().unwrap().push_back((None, Err(error)));
    }

    /// Script a transport failure that resolves only after `delay`
    pub fn push_error_delayed(&self, error: GiphyError, delay: Duration) {
        self.responses
            .lock()
            .unwrap()
            .push_back((Some(delay), Err(error)));
    }

    /// Every request the mock has served, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests served
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn next_response(&self) -> GiphyResult<GifPage> {
        let scripted = self.responses.lock().unwrap().pop_front();
        match scripted {
            Some((Some(delay), result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            Some((None, result)) => result,
            // Unscripted calls return an exhausted empty page
            None => Ok(GifPage::default()),
        }
    }
}

#[async_trait]
impl GifProvider for MockGifProvider {
    async fn trending(&self, page: &PageRequest) -> GiphyResult<GifPage> {
        self.calls.lock().unwrap().push(RecordedCall::Trending {
            limit: page.limit,
            offset: page.offset,
        });
        self.next_response().await
    }

    async fn search(&self, query: &str, page: &PageRequest) -> GiphyResult<GifPage> {
        self.calls.lock().unwrap().push(RecordedCall::Search {
            query: query.to_string(),
            limit: page.limit,
            offset: page.offset,
        });
        self.next_response().await
    }
}

/// Build a gif with a single downsized rendition, for tests
pub fn sample_gif(id: &str) -> Gif {
    Gif {
        id: id.to_string(),
        title: Some(format!("gif {id}")),
        url: Some(format!("https://giphy.com/gifs/{id}")),
        embed_url: None,
        images: Some(Renditions {
            downsized: Some(Rendition {
                url: format!("https://media.giphy.com/{id}.gif"),
                width: Some("200".to_string()),
                height: Some("200".to_string()),
            }),
            ..Renditions::default()
        }),
    }
}

/// Build a page of sequentially-numbered gifs with pagination metadata
pub fn sample_page(
    prefix: &str,
    offset: usize,
    count: usize,
    total_count: Option<usize>,
) -> GifPage {
    let data = (0..count)
        .map(|i| sample_gif(&format!("{prefix}-{}", offset + i)))
        .collect();
    GifPage {
        data,
        pagination: Some(Pagination {
            offset,
            count,
            total_count,
        }),
    }
}

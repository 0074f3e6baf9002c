//! Reqwest-backed Giphy REST client

use async_trait::async_trait;
use std::time::Duration;

use gifgrid_config::GiphyConfig;

use crate::error::{GiphyError, GiphyResult};
use crate::models::{GifPage, PageRequest};
use crate::traits::GifProvider;

/// Stateless transport to the Giphy REST surface.
///
/// Holds the API key and a pooled `reqwest` client; every call is one
/// GET round trip returning a [`GifPage`].
pub struct GiphyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GiphyClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Returns [`GiphyError::InvalidBaseUrl`] for an unusable base URL and
    /// [`GiphyError::Network`] if the underlying HTTP client cannot be built.
    pub fn new(config: &GiphyConfig) -> GiphyResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(GiphyError::InvalidBaseUrl {
                url: config.base_url.clone(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    async fn get_page(
        &self,
        path: &str,
        query: Option<&str>,
        page: &PageRequest,
    ) -> GiphyResult<GifPage> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.get(&url).query(&[
            ("api_key", self.api_key.as_str()),
            ("limit", &page.limit.to_string()),
            ("offset", &page.offset.to_string()),
            ("rating", &page.rating),
        ]);
        if let Some(q) = query {
            request = request.query(&[("q", q)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Giphy request rejected");
            return Err(GiphyError::Status {
                status: status.as_u16(),
            });
        }

        // Decode from the raw body so payload errors surface as Decode,
        // not as a generic reqwest error
        let body = response.text().await?;
        let listing = serde_json::from_str::<GifPage>(&body)?;
        tracing::debug!(
            %url,
            returned = listing.data.len(),
            total = ?listing.pagination.and_then(|p| p.total_count),
            "Giphy page fetched"
        );
        Ok(listing)
    }
}

#[async_trait]
impl GifProvider for GiphyClient {
    #[tracing::instrument(skip(self), fields(offset = page.offset, limit = page.limit))]
    async fn trending(&self, page: &PageRequest) -> GiphyResult<GifPage> {
        self.get_page("/v1/gifs/trending", None, page).await
    }

    #[tracing::instrument(skip(self), fields(offset = page.offset, limit = page.limit))]
    async fn search(&self, query: &str, page: &PageRequest) -> GiphyResult<GifPage> {
        self.get_page("/v1/gifs/search", Some(query), page).await
    }
}

//! Transport error types for the Giphy client

use thiserror::Error;

/// Errors produced by one round trip against the Giphy API,
/// plus the caller error of selecting a rendition that does not exist.
#[derive(Error, Debug)]
pub enum GiphyError {
    /// Network-level failure (connect, TLS, timeout, body read)
    #[error("Giphy request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status from the API
    #[error("Giphy returned HTTP {status}")]
    Status { status: u16 },

    /// Response body did not match the expected payload shape
    #[error("Failed to decode Giphy response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The base URL in configuration could not be parsed
    #[error("Invalid Giphy base URL: {url}")]
    InvalidBaseUrl { url: String },

    /// A rendition was requested for a gif that carries none
    #[error("Gif '{id}' has no image renditions")]
    NoRendition { id: String },
}

/// Result type for Giphy operations
pub type GiphyResult<T> = Result<T, GiphyError>;

//! Giphy transport crate for gifgrid
//!
//! Provides the wire data model for Giphy listings, a `reqwest`-backed
//! client for the two read operations (trending and search), and a
//! scripted mock for orchestrator tests.

pub mod client;
pub mod error;
pub mod models;
pub mod traits;

pub mod mock;
pub use mock::MockGifProvider;

// Public exports
pub use client::GiphyClient;
pub use error::{GiphyError, GiphyResult};
pub use models::{Gif, GifAttachment, GifPage, PageRequest, Pagination, Rendition, Renditions};
pub use traits::GifProvider;

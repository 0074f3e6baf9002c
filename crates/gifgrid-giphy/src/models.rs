//! Wire data model for the Giphy API
//!
//! Mirrors the JSON shape of `/v1/gifs/trending` and `/v1/gifs/search`
//! responses. Insertion order of `data` is relevance order and is preserved
//! everywhere downstream.

use serde::{Deserialize, Serialize};

use crate::error::{GiphyError, GiphyResult};

/// One page of results from the Giphy API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GifPage {
    /// Results in relevance order
    #[serde(default)]
    pub data: Vec<Gif>,

    /// Pagination metadata; absent pagination means the listing is exhausted
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Pagination metadata from a Giphy response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Position of this page in the result set
    #[serde(default)]
    pub offset: usize,

    /// Number of items actually returned in this page
    #[serde(default)]
    pub count: usize,

    /// Total results available; Giphy omits this for trending listings
    #[serde(default)]
    pub total_count: Option<usize>,
}

/// A single GIF result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gif {
    /// Stable unique key, suitable for list diffing
    pub id: String,

    /// Human-readable title
    #[serde(default)]
    pub title: Option<String>,

    /// URL of the gif's page on giphy.com
    #[serde(default)]
    pub url: Option<String>,

    /// Embeddable page URL
    #[serde(default)]
    pub embed_url: Option<String>,

    /// Named image renditions
    #[serde(default)]
    pub images: Option<Renditions>,
}

/// The rendition variants Giphy serves for every gif
///
/// Only the renditions the picker actually uses are modeled; unknown keys
/// in the `images` object are ignored on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renditions {
    /// Small thumbnail with fixed 100px height
    #[serde(default)]
    pub fixed_height_small: Option<Rendition>,

    /// Small thumbnail with fixed 100px width
    #[serde(default)]
    pub fixed_width_small: Option<Rendition>,

    /// Standard rendition with fixed 200px height
    #[serde(default)]
    pub fixed_height: Option<Rendition>,

    /// Reduced-frame-rate variant of `fixed_height`
    #[serde(default)]
    pub fixed_height_downsampled: Option<Rendition>,

    /// Original full-size gif
    #[serde(default)]
    pub original: Option<Rendition>,

    /// Downsized variant kept under 2MB
    #[serde(default)]
    pub downsized: Option<Rendition>,
}

/// One sized variant of a gif
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendition {
    /// Direct URL to the image file
    pub url: String,

    /// Width in pixels; Giphy serves dimensions as strings
    #[serde(default)]
    pub width: Option<String>,

    /// Height in pixels; Giphy serves dimensions as strings
    #[serde(default)]
    pub height: Option<String>,
}

impl Rendition {
    /// Width in pixels, when present and numeric
    pub fn width_px(&self) -> Option<u32> {
        self.width.as_deref().and_then(|w| w.parse().ok())
    }

    /// Height in pixels, when present and numeric
    pub fn height_px(&self) -> Option<u32> {
        self.height.as_deref().and_then(|h| h.parse().ok())
    }
}

/// Fallback dimensions for renditions with no parseable size
const DEFAULT_DIMENSION_PX: u32 = 200;

/// Selection payload handed to the message composer when a gif is picked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GifAttachment {
    /// Direct URL of the chosen rendition
    pub gif_url: String,

    /// The gif's page on giphy.com
    pub page_url: String,

    /// Display title (empty string when the gif has none)
    pub title: String,

    /// Rendition width in pixels
    pub width: u32,

    /// Rendition height in pixels
    pub height: u32,
}

impl Gif {
    /// Best rendition for grid/carousel display.
    ///
    /// Prefers `fixed_height_small` (100px), then `fixed_width_small`,
    /// then `downsized`.
    pub fn thumbnail(&self) -> Option<&Rendition> {
        let images = self.images.as_ref()?;
        images
            .fixed_height_small
            .as_ref()
            .or(images.fixed_width_small.as_ref())
            .or(images.downsized.as_ref())
    }

    /// Best rendition for full-size display.
    ///
    /// Prefers `original`, then `fixed_height`, then `downsized`.
    pub fn original(&self) -> Option<&Rendition> {
        let images = self.images.as_ref()?;
        images
            .original
            .as_ref()
            .or(images.fixed_height.as_ref())
            .or(images.downsized.as_ref())
    }

    /// The gif's page URL, synthesized from the id when Giphy sent none
    pub fn page_url(&self) -> String {
        self.url
            .clone()
            .or_else(|| self.embed_url.clone())
            .unwrap_or_else(|| format!("https://giphy.com/gifs/{}", self.id))
    }

    /// Build the composer attachment payload for this gif.
    ///
    /// The rendition preference balances quality against message size:
    /// `downsized`, then `fixed_height_downsampled`, then `fixed_height`,
    /// then the small thumbnails.
    ///
    /// # Errors
    /// Returns [`GiphyError::NoRendition`] when the gif carries no usable
    /// rendition - attaching such a gif is a caller error, not a panic.
    pub fn attachment(&self) -> GiphyResult<GifAttachment> {
        let rendition = self
            .images
            .as_ref()
            .and_then(|images| {
                images
                    .downsized
                    .as_ref()
                    .or(images.fixed_height_downsampled.as_ref())
                    .or(images.fixed_height.as_ref())
                    .or(images.fixed_height_small.as_ref())
                    .or(images.fixed_width_small.as_ref())
            })
            .ok_or_else(|| GiphyError::NoRendition {
                id: self.id.clone(),
            })?;

        Ok(GifAttachment {
            gif_url: rendition.url.clone(),
            page_url: self.page_url(),
            title: self.title.clone().unwrap_or_default(),
            width: rendition.width_px().unwrap_or(DEFAULT_DIMENSION_PX),
            height: rendition.height_px().unwrap_or(DEFAULT_DIMENSION_PX),
        })
    }
}

/// Pagination and rating parameters shared by both listing operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum items to return
    pub limit: usize,

    /// Starting position in the result set
    pub offset: usize,

    /// Content rating filter
    pub rating: String,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            rating: "g".to_string(),
        }
    }
}

impl PageRequest {
    /// A page request at the given offset, keeping the default limit and rating
    pub fn at_offset(offset: usize) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendition(url: &str, width: Option<&str>, height: Option<&str>) -> Rendition {
        Rendition {
            url: url.to_string(),
            width: width.map(String::from),
            height: height.map(String::from),
        }
    }

    #[test]
    fn thumbnail_prefers_fixed_height_small() {
        let gif = Gif {
            id: "a".to_string(),
            title: None,
            url: None,
            embed_url: None,
            images: Some(Renditions {
                fixed_height_small: Some(rendition("https://gif/small", None, None)),
                downsized: Some(rendition("https://gif/down", None, None)),
                ..Renditions::default()
            }),
        };
        assert_eq!(gif.thumbnail().map(|r| r.url.as_str()), Some("https://gif/small"));
    }

    #[test]
    fn thumbnail_falls_back_through_preferences() {
        let gif = Gif {
            id: "a".to_string(),
            title: None,
            url: None,
            embed_url: None,
            images: Some(Renditions {
                downsized: Some(rendition("https://gif/down", None, None)),
                ..Renditions::default()
            }),
        };
        assert_eq!(gif.thumbnail().map(|r| r.url.as_str()), Some("https://gif/down"));

        let bare = Gif {
            id: "b".to_string(),
            title: None,
            url: None,
            embed_url: None,
            images: None,
        };
        assert!(bare.thumbnail().is_none());
    }

    #[test]
    fn original_prefers_full_size() {
        let gif = Gif {
            id: "a".to_string(),
            title: None,
            url: None,
            embed_url: None,
            images: Some(Renditions {
                original: Some(rendition("https://gif/orig", None, None)),
                fixed_height: Some(rendition("https://gif/fh", None, None)),
                ..Renditions::default()
            }),
        };
        assert_eq!(gif.original().map(|r| r.url.as_str()), Some("https://gif/orig"));
    }

    #[test]
    fn attachment_picks_downsized_and_parses_dimensions() {
        let gif = Gif {
            id: "abc".to_string(),
            title: Some("Dancing cat".to_string()),
            url: Some("https://giphy.com/gifs/abc".to_string()),
            embed_url: None,
            images: Some(Renditions {
                downsized: Some(rendition("https://gif/down", Some("320"), Some("240"))),
                fixed_height: Some(rendition("https://gif/fh", Some("356"), Some("200"))),
                ..Renditions::default()
            }),
        };

        let attachment = gif.attachment().expect("attachment");
        assert_eq!(attachment.gif_url, "https://gif/down");
        assert_eq!(attachment.page_url, "https://giphy.com/gifs/abc");
        assert_eq!(attachment.title, "Dancing cat");
        assert_eq!(attachment.width, 320);
        assert_eq!(attachment.height, 240);
    }

    #[test]
    fn attachment_defaults_unparseable_dimensions() {
        let gif = Gif {
            id: "abc".to_string(),
            title: None,
            url: None,
            embed_url: Some("https://giphy.com/embed/abc".to_string()),
            images: Some(Renditions {
                fixed_height: Some(rendition("https://gif/fh", Some("wide"), None)),
                ..Renditions::default()
            }),
        };

        let attachment = gif.attachment().expect("attachment");
        assert_eq!(attachment.page_url, "https://giphy.com/embed/abc");
        assert_eq!(attachment.title, "");
        assert_eq!(attachment.width, 200);
        assert_eq!(attachment.height, 200);
    }

    #[test]
    fn attachment_without_renditions_is_an_error() {
        let gif = Gif {
            id: "bare".to_string(),
            title: None,
            url: None,
            embed_url: None,
            images: None,
        };
        assert!(matches!(
            gif.attachment(),
            Err(GiphyError::NoRendition { ref id }) if id == "bare"
        ));
    }

    #[test]
    fn page_url_synthesized_from_id() {
        let gif = Gif {
            id: "xyz".to_string(),
            title: None,
            url: None,
            embed_url: None,
            images: None,
        };
        assert_eq!(gif.page_url(), "https://giphy.com/gifs/xyz");
    }

    #[test]
    fn page_decodes_giphy_wire_format() {
        let payload = r#"{
            "data": [
                {
                    "id": "g1",
                    "title": "Hello",
                    "url": "https://giphy.com/gifs/g1",
                    "embed_url": "https://giphy.com/embed/g1",
                    "images": {
                        "fixed_height_small": {"url": "https://gif/g1-small", "width": "178", "height": "100"},
                        "original": {"url": "https://gif/g1", "width": "480", "height": "270"},
                        "preview_webp": {"url": "https://gif/g1.webp"}
                    }
                }
            ],
            "pagination": {"offset": 0, "count": 1, "total_count": 5321}
        }"#;

        let page: GifPage = serde_json::from_str(payload).expect("decode");
        assert_eq!(page.data.len(), 1);
        let gif = page.data.first().expect("one gif");
        assert_eq!(gif.id, "g1");
        assert_eq!(gif.thumbnail().map(|r| r.url.as_str()), Some("https://gif/g1-small"));
        let pagination = page.pagination.expect("pagination");
        assert_eq!(pagination.count, 1);
        assert_eq!(pagination.total_count, Some(5321));
    }

    #[test]
    fn page_tolerates_missing_pagination() {
        let page: GifPage = serde_json::from_str(r#"{"data": []}"#).expect("decode");
        assert!(page.data.is_empty());
        assert!(page.pagination.is_none());
    }
}

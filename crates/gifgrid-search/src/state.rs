//! Session state snapshot published to the UI

use gifgrid_giphy::{Gif, Pagination};

/// What the session is currently listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// No active query; the trending feed is shown
    Trending,
    /// An active free-text query (already trimmed)
    Query(String),
}

impl SearchMode {
    /// Normalize raw composer input into a mode.
    ///
    /// Whitespace-only input means trending; anything else is a query with
    /// the exact trimmed text.
    pub fn normalize(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Self::Trending
        } else {
            Self::Query(trimmed.to_string())
        }
    }

    /// Whether this mode is the trending feed
    pub const fn is_trending(&self) -> bool {
        matches!(self, Self::Trending)
    }

    /// Whether this mode is an active query
    pub const fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

/// Immutable snapshot of the search session, published on every mutation.
///
/// `cursor` always equals the number of gifs held for the active mode; it
/// is the next offset to request, not a provider-issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Results in relevance order, unique by id
    pub gifs: Vec<Gif>,

    /// The listing currently shown (trending or an active query)
    pub mode: SearchMode,

    /// Next pagination offset for the active mode
    pub cursor: usize,

    /// Whether another page can be requested
    pub has_more: bool,

    /// A replacing fetch (new query or trending reset) is in flight
    pub is_loading: bool,

    /// An append fetch (load-more) is in flight
    pub is_loading_more: bool,

    /// Message from the last failed attempt, cleared when a new one starts
    pub error: Option<String>,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            gifs: Vec::new(),
            mode: SearchMode::Trending,
            cursor: 0,
            has_more: true,
            is_loading: false,
            is_loading_more: false,
            error: None,
        }
    }

    /// Reset for a replacing fetch of `mode`.
    ///
    /// Also drops the loading-more flag: any append still in flight belongs
    /// to the listing being discarded and its completion will be ignored.
    pub(crate) fn begin_replace(&mut self, mode: SearchMode) {
        self.mode = mode;
        self.gifs.clear();
        self.cursor = 0;
        self.has_more = true;
        self.is_loading = true;
        self.is_loading_more = false;
        self.error = None;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Pagination-continuation rule applied after every successful fetch.
///
/// More data is assumed only when the provider sent pagination metadata and
/// all three hold: the cursor is under the configured offset ceiling, under
/// `total_count` when the provider reports one, and the page was full (a
/// short page means exhaustion even when `total_count` disagrees).
pub(crate) fn has_more_after(
    pagination: Option<&Pagination>,
    cursor: usize,
    ceiling: usize,
    page_size: usize,
) -> bool {
    let Some(pagination) = pagination else {
        return false;
    };
    let under_total = pagination.total_count.is_none_or(|total| cursor < total);
    cursor < ceiling && under_total && pagination.count >= page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_detects_trending() {
        assert_eq!(SearchMode::normalize(""), SearchMode::Trending);
        assert_eq!(SearchMode::normalize("   "), SearchMode::Trending);
        assert_eq!(
            SearchMode::normalize(" cats "),
            SearchMode::Query("cats".to_string())
        );
        assert_eq!(
            SearchMode::normalize("space cats"),
            SearchMode::Query("space cats".to_string())
        );
    }

    #[test]
    fn missing_pagination_means_exhausted() {
        assert!(!has_more_after(None, 10, 50, 10));
    }

    #[test]
    fn full_page_under_limits_continues() {
        let pagination = Pagination {
            offset: 0,
            count: 10,
            total_count: None,
        };
        assert!(has_more_after(Some(&pagination), 10, 50, 10));
    }

    #[test]
    fn ceiling_caps_pagination() {
        let pagination = Pagination {
            offset: 40,
            count: 10,
            total_count: Some(10_000),
        };
        assert!(!has_more_after(Some(&pagination), 50, 50, 10));
        assert!(has_more_after(Some(&pagination), 49, 50, 10));
    }

    #[test]
    fn total_count_caps_pagination() {
        let pagination = Pagination {
            offset: 10,
            count: 10,
            total_count: Some(15),
        };
        assert!(!has_more_after(Some(&pagination), 20, 50, 10));
    }

    #[test]
    fn short_page_means_exhausted_even_with_total_remaining() {
        let pagination = Pagination {
            offset: 20,
            count: 4,
            total_count: Some(10_000),
        };
        assert!(!has_more_after(Some(&pagination), 24, 50, 10));
    }

    #[test]
    fn begin_replace_resets_everything_but_keeps_mode() {
        let mut state = SessionState::new();
        state.gifs.push(gifgrid_giphy::Gif {
            id: "a".to_string(),
            title: None,
            url: None,
            embed_url: None,
            images: None,
        });
        state.cursor = 1;
        state.has_more = false;
        state.error = Some("boom".to_string());
        state.is_loading_more = true;

        state.begin_replace(SearchMode::Query("cats".to_string()));

        assert!(state.gifs.is_empty());
        assert_eq!(state.mode, SearchMode::Query("cats".to_string()));
        assert_eq!(state.cursor, 0);
        assert!(state.has_more);
        assert!(state.is_loading);
        assert!(!state.is_loading_more);
        assert!(state.error.is_none());
    }
}

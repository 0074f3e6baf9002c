//! Centralized configuration management for gifgrid
//!
//! This crate provides a unified configuration system with type-safe,
//! validated settings for the Giphy transport and the search session.
//!
//! Configuration follows a simple hierarchy:
//! 1. Safe defaults (defined as constants)
//! 2. Optional TOML file overrides
//! 3. Environment variable overrides
//! 4. Runtime validation
//!
//! Each layer overrides only the fields it actually carries.

pub mod error;
pub mod source;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use source::{ConfigurationLoader, ConfigurationSource, EnvironmentSource, TomlFileSource};
pub use validation::Validate;

// =============================================================================
// SAFE DEFAULTS - Work for any environment (dev, staging, prod, test)
// =============================================================================

// Giphy transport configuration
const DEFAULT_GIPHY_BASE_URL: &str = "https://api.giphy.com";
const DEFAULT_GIPHY_RATING: &str = "g"; // General audiences
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

// Search session configuration
const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
const DEFAULT_MAX_TRENDING_OFFSET: usize = 50; // Giphy trending degrades past this
const DEFAULT_MAX_SEARCH_OFFSET: usize = 50;

/// Ratings Giphy accepts for content filtering
const ALLOWED_RATINGS: [&str; 4] = ["g", "pg", "pg-13", "r"];

/// Core configuration for the entire gifgrid application
///
/// All settings have safe defaults and can be overridden via environment
/// variables. The API key is the one value with no usable default; its
/// absence is surfaced as a session error rather than a startup failure.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Giphy transport configuration
    pub giphy: GiphyConfig,

    /// Search session configuration
    pub search: SearchConfig,
}

/// Giphy REST transport configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GiphyConfig {
    /// Giphy API key. Empty means "not configured" - a first-class state
    /// the search session reports instead of attempting network calls.
    pub api_key: String,

    /// Base URL of the Giphy REST surface (overridable for tests)
    pub base_url: String,

    /// Content rating filter applied to every listing
    pub rating: String,

    /// Transport-level request timeout in seconds
    pub timeout_seconds: u64,
}

/// Search session configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results requested per page
    pub page_size: usize,

    /// Debounce interval for composer input, in milliseconds
    pub debounce_ms: u64,

    /// Pagination offset ceiling for trending listings
    pub max_trending_offset: usize,

    /// Pagination offset ceiling for query listings
    pub max_search_offset: usize,
}

impl Default for GiphyConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_GIPHY_BASE_URL.to_string(),
            rating: DEFAULT_GIPHY_RATING.to_string(),
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            max_trending_offset: DEFAULT_MAX_TRENDING_OFFSET,
            max_search_offset: DEFAULT_MAX_SEARCH_OFFSET,
        }
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            giphy: GiphyConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl GiphyConfig {
    /// Whether an API key is present (non-blank)
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Validate for ApplicationConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_url(&self.giphy.base_url, "giphy.base_url")?;
        validation::validate_one_of(&self.giphy.rating, &ALLOWED_RATINGS, "giphy.rating")?;
        validation::validate_range(
            self.giphy.timeout_seconds,
            1,
            600,
            "giphy.timeout_seconds",
        )?;
        validation::validate_range(self.search.page_size as u64, 1, 50, "search.page_size")?;
        validation::validate_range(self.search.debounce_ms, 0, 10_000, "search.debounce_ms")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.page_size, 10);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.max_trending_offset, 50);
        assert_eq!(config.search.max_search_offset, 50);
        assert_eq!(config.giphy.base_url, "https://api.giphy.com");
        assert_eq!(config.giphy.rating, "g");
        assert!(!config.giphy.has_api_key());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = GiphyConfig {
            api_key: "   ".to_string(),
            ..GiphyConfig::default()
        };
        assert!(!config.has_api_key());

        let config = GiphyConfig {
            api_key: "abc123".to_string(),
            ..GiphyConfig::default()
        };
        assert!(config.has_api_key());
    }

    #[test]
    fn rejects_unknown_rating() {
        let config = ApplicationConfig {
            giphy: GiphyConfig {
                rating: "nc-17".to_string(),
                ..GiphyConfig::default()
            },
            ..ApplicationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_oversized_page() {
        let config = ApplicationConfig {
            search: SearchConfig {
                page_size: 100,
                ..SearchConfig::default()
            },
            ..ApplicationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = ApplicationConfig {
            giphy: GiphyConfig {
                base_url: "ftp://api.giphy.com".to_string(),
                ..GiphyConfig::default()
            },
            ..ApplicationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}

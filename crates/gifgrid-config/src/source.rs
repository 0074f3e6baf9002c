//! Configuration source loading and composition

use crate::validation::Validate;
use crate::{ApplicationConfig, ConfigResult};
use std::path::Path;

/// Trait for layering configuration from different sources
///
/// A source overrides only the fields it actually carries; everything else
/// keeps the value from lower-priority sources or the defaults.
pub trait ConfigurationSource {
    /// Apply this source's overrides on top of `config`
    ///
    /// # Errors
    /// Returns configuration loading errors
    fn apply(&self, config: &mut ApplicationConfig) -> ConfigResult<()>;

    /// Get the name of this configuration source
    fn name(&self) -> &str;

    /// Get the priority of this source (higher number = higher priority)
    fn priority(&self) -> u8;
}

/// Partial configuration: every field optional, absent means "no override"
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigOverlay {
    giphy: GiphyOverlay,
    search: SearchOverlay,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct GiphyOverlay {
    api_key: Option<String>,
    base_url: Option<String>,
    rating: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SearchOverlay {
    page_size: Option<usize>,
    debounce_ms: Option<u64>,
    max_trending_offset: Option<usize>,
    max_search_offset: Option<usize>,
}

impl ConfigOverlay {
    fn apply_to(self, config: &mut ApplicationConfig) {
        let Self { giphy, search } = self;
        if let Some(api_key) = giphy.api_key {
            config.giphy.api_key = api_key;
        }
        if let Some(base_url) = giphy.base_url {
            config.giphy.base_url = base_url;
        }
        if let Some(rating) = giphy.rating {
            config.giphy.rating = rating;
        }
        if let Some(timeout_seconds) = giphy.timeout_seconds {
            config.giphy.timeout_seconds = timeout_seconds;
        }
        if let Some(page_size) = search.page_size {
            config.search.page_size = page_size;
        }
        if let Some(debounce_ms) = search.debounce_ms {
            config.search.debounce_ms = debounce_ms;
        }
        if let Some(max_trending_offset) = search.max_trending_offset {
            config.search.max_trending_offset = max_trending_offset;
        }
        if let Some(max_search_offset) = search.max_search_offset {
            config.search.max_search_offset = max_search_offset;
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Override configuration from environment variables
///
/// Only variables that are actually set override anything; an unset
/// variable never clobbers a value a lower-priority source provided.
pub struct EnvironmentSource;

impl ConfigurationSource for EnvironmentSource {
    fn apply(&self, config: &mut ApplicationConfig) -> ConfigResult<()> {
        let overlay = ConfigOverlay {
            giphy: GiphyOverlay {
                // GIPHY_API_KEY is the conventional name; the prefixed variant wins
                api_key: env_var("GIFGRID_GIPHY_API_KEY").or_else(|| env_var("GIPHY_API_KEY")),
                base_url: env_var("GIFGRID_GIPHY_BASE_URL"),
                rating: env_var("GIFGRID_GIPHY_RATING"),
                timeout_seconds: env_parsed("GIFGRID_HTTP_TIMEOUT_SECONDS"),
            },
            search: SearchOverlay {
                page_size: env_parsed("GIFGRID_PAGE_SIZE"),
                debounce_ms: env_parsed("GIFGRID_SEARCH_DEBOUNCE_MS"),
                max_trending_offset: env_parsed("GIFGRID_MAX_TRENDING_OFFSET"),
                max_search_offset: env_parsed("GIFGRID_MAX_SEARCH_OFFSET"),
            },
        };
        overlay.apply_to(config);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "environment"
    }

    fn priority(&self) -> u8 {
        100 // Environment variables override everything
    }
}

/// Override configuration from a TOML file
pub struct TomlFileSource {
    path: std::path::PathBuf,
}

impl TomlFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigurationSource for TomlFileSource {
    fn apply(&self, config: &mut ApplicationConfig) -> ConfigResult<()> {
        let content = std::fs::read_to_string(&self.path)?;
        let overlay: ConfigOverlay = toml::from_str(&content)?;
        overlay.apply_to(config);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "toml_file"
    }

    fn priority(&self) -> u8 {
        50 // Below env vars, above defaults
    }
}

/// Type alias for configuration sources
type ConfigSources = Vec<Box<dyn ConfigurationSource>>;

/// Configuration loader that layers multiple sources over the defaults
pub struct ConfigurationLoader {
    sources: ConfigSources,
}

impl ConfigurationLoader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn add_source(mut self, source: Box<dyn ConfigurationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Load configuration by applying all sources in priority order
    ///
    /// Sources that fail to load are skipped with a warning; the result is
    /// always validated before being returned.
    ///
    /// # Errors
    /// Returns validation errors for the composed configuration
    pub fn load(&self) -> ConfigResult<ApplicationConfig> {
        let mut config = ApplicationConfig::default();

        // Lowest priority first, so higher-priority sources win per field
        let mut sorted_sources = self.sources.iter().collect::<Vec<_>>();
        sorted_sources.sort_by_key(|source| source.priority());

        for source in sorted_sources {
            match source.apply(&mut config) {
                Ok(()) => {
                    tracing::debug!("Applied configuration source: {}", source.name());
                }
                Err(e) => {
                    tracing::warn!("Failed to load from source {}: {}", source.name(), e);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigurationLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{content}").expect("write config");
        file
    }

    #[test]
    fn toml_source_overrides_only_present_fields() {
        let file = toml_file(
            r#"
[giphy]
api_key = "test-key"
rating = "pg"

[search]
page_size = 25
"#,
        );

        let mut config = ApplicationConfig::default();
        TomlFileSource::new(file.path())
            .apply(&mut config)
            .expect("apply toml config");
        assert_eq!(config.giphy.api_key, "test-key");
        assert_eq!(config.giphy.rating, "pg");
        assert_eq!(config.search.page_size, 25);
        // Unspecified fields keep their defaults
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.giphy.base_url, "https://api.giphy.com");
    }

    #[test]
    fn toml_source_reports_missing_file() {
        let mut config = ApplicationConfig::default();
        let result = TomlFileSource::new("/nonexistent/gifgrid.toml").apply(&mut config);
        assert!(result.is_err());
    }

    #[test]
    fn loader_falls_back_to_defaults() {
        let config = ConfigurationLoader::new()
            .add_source(Box::new(TomlFileSource::new("/nonexistent/gifgrid.toml")))
            .load()
            .expect("defaults should validate");
        assert_eq!(config.search.page_size, 10);
    }

    #[test]
    fn file_values_survive_higher_priority_env_source() {
        // SAFETY: tests in this module are the only readers of these keys
        unsafe {
            std::env::remove_var("GIFGRID_GIPHY_API_KEY");
            std::env::remove_var("GIPHY_API_KEY");
            std::env::remove_var("GIFGRID_GIPHY_RATING");
        }
        let file = toml_file(
            r#"
[giphy]
api_key = "file-key"
rating = "pg"
"#,
        );

        // Same stacking as the binary: env over file
        let loader = ConfigurationLoader::new()
            .add_source(Box::new(EnvironmentSource))
            .add_source(Box::new(TomlFileSource::new(file.path())));

        let config = loader.load().expect("load layered config");
        assert_eq!(config.giphy.api_key, "file-key");
        assert_eq!(config.giphy.rating, "pg");
        assert_eq!(config.search.page_size, 10);

        // A variable that is actually set still wins over the file
        // SAFETY: as above
        unsafe {
            std::env::set_var("GIFGRID_GIPHY_RATING", "r");
        }
        let config = loader.load().expect("load layered config");
        assert_eq!(config.giphy.rating, "r");
        assert_eq!(config.giphy.api_key, "file-key");
        // SAFETY: as above
        unsafe {
            std::env::remove_var("GIFGRID_GIPHY_RATING");
        }
    }
}

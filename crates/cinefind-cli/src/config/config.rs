//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cinefind_api::tmdb::{DEFAULT_DISCOVER_SORT, TimeWindow};
use cinefind_tui::{BrowserSettings, FetchSettings, ImageSettings, TrendingSettings};
use cinefind_tui::trending::{
    DEFAULT_PLACEHOLDER_POSTER, DEFAULT_POSTER_BASE_URL, DEFAULT_TRENDING_LIMIT,
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default TMDB API v3 base URL.
const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default search term settle window in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 750;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB request settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Poster image settings.
    #[serde(default)]
    pub images: ImagesConfig,
    /// Search behavior settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// TMDB request configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Response language (e.g. "en-US"); omitted from requests when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// `sort_by` of the popular-movies listing; empty omits the parameter.
    #[serde(default = "default_discover_sort_by")]
    pub discover_sort_by: String,
    /// Trending time window.
    #[serde(default)]
    pub trending_window: TimeWindow,
}

/// Poster image configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImagesConfig {
    /// Prefix joined with a movie's poster path.
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,
    /// Poster used when a movie has none.
    #[serde(default = "default_placeholder_poster")]
    pub placeholder_poster: String,
}

/// Search behavior configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Search term settle window in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Number of trending movies shown.
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
}

fn default_base_url() -> String {
    String::from(DEFAULT_TMDB_BASE_URL)
}

fn default_discover_sort_by() -> String {
    String::from(DEFAULT_DISCOVER_SORT)
}

fn default_poster_base_url() -> String {
    String::from(DEFAULT_POSTER_BASE_URL)
}

fn default_placeholder_poster() -> String {
    String::from(DEFAULT_PLACEHOLDER_POSTER)
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

const fn default_trending_limit() -> usize {
    DEFAULT_TRENDING_LIMIT
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: None,
            discover_sort_by: default_discover_sort_by(),
            trending_window: TimeWindow::default(),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            poster_base_url: default_poster_base_url(),
            placeholder_poster: default_placeholder_poster(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            trending_limit: default_trending_limit(),
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    #[cfg(test)]
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Parses the configured TMDB base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `tmdb.base_url` is not a valid URL.
    pub fn tmdb_base_url(&self) -> Result<Url> {
        Url::parse(&self.tmdb.base_url)
            .with_context(|| format!("invalid tmdb.base_url: {}", self.tmdb.base_url))
    }

    /// Converts the config into the settings injected into a browser session.
    #[must_use]
    pub fn browser_settings(&self) -> BrowserSettings {
        let language = self.tmdb.language.clone().filter(|l| !l.is_empty());
        let discover_sort_by =
            Some(self.tmdb.discover_sort_by.clone()).filter(|s| !s.is_empty());

        BrowserSettings {
            fetch: FetchSettings {
                language: language.clone(),
                discover_sort_by,
            },
            trending: TrendingSettings {
                window: self.tmdb.trending_window,
                limit: self.search.trending_limit,
                language,
                images: ImageSettings {
                    poster_base_url: self.images.poster_base_url.clone(),
                    placeholder_poster: self.images.placeholder_poster.clone(),
                },
            },
            debounce: Duration::from_millis(self.search.debounce_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3/");
        assert_eq!(config.tmdb.discover_sort_by, "popularity.desc");
        assert_eq!(config.tmdb.trending_window, TimeWindow::Week);
        assert_eq!(config.search.debounce_ms, 750);
        assert_eq!(config.search.trending_limit, 5);
    }

    #[test]
    fn test_default_config_matches_default_settings() {
        // Arrange & Act
        let settings = AppConfig::default().browser_settings();

        // Assert
        assert_eq!(settings, BrowserSettings::default());
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        // Arrange
        let mut config = AppConfig::default();
        config.tmdb.language = Some(String::from("ja-JP"));
        config.tmdb.trending_window = TimeWindow::Day;
        config.search.debounce_ms = 300;

        // Act
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        // Assert
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.images.placeholder_poster = String::from("/placeholder.png");

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ndebounce_ms = 200\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.search.debounce_ms, 200);
        assert_eq!(config.search.trending_limit, 5);
        assert_eq!(config.tmdb, TmdbConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_browser_settings_from_config() {
        // Arrange
        let toml_str = r#"
[tmdb]
language = "en-US"
discover_sort_by = ""
trending_window = "day"

[images]
poster_base_url = "https://image.tmdb.org/t/p/w500"

[search]
debounce_ms = 100
trending_limit = 3
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        // Act
        let settings = config.browser_settings();

        // Assert
        assert_eq!(settings.fetch.discover_sort_by, None);
        assert_eq!(settings.fetch.language.as_deref(), Some("en-US"));
        assert_eq!(settings.trending.window, TimeWindow::Day);
        assert_eq!(settings.trending.limit, 3);
        assert_eq!(
            settings.trending.images.poster_base_url,
            "https://image.tmdb.org/t/p/w500"
        );
        assert_eq!(settings.trending.images.placeholder_poster, "/no-movie.png");
        assert_eq!(settings.debounce, Duration::from_millis(100));
    }

    #[test]
    fn test_tmdb_base_url_invalid() {
        // Arrange
        let mut config = AppConfig::default();
        config.tmdb.base_url = String::from("not a url");

        // Act
        let result = config.tmdb_base_url();

        // Assert
        assert!(result.is_err());
    }
}

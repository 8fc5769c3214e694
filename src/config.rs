//! Configuration management for MovieMind
//!
//! Config is stored at ~/.config/moviemind/config.toml. Every field is
//! optional; accessors fall back to built-in defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{FetchError, MovieApiClient};
use crate::models::TimeWindow;

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:5002/api";

/// Environment variable overriding the configured base URL
pub const API_BASE_ENV: &str = "MOVIEMIND_API_BASE";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_RECOMMENDATION_LIMIT: u32 = 10;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL, including the `/api` prefix
    pub api_base: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Quiet period before an autocomplete request is issued
    pub debounce_ms: Option<u64>,
    /// Number of recommendations requested on the detail view
    pub recommendation_limit: Option<u32>,
    /// Trending window used by the home and trending views
    pub trending_window: Option<TimeWindow>,
}

impl Config {
    /// Get config file path (~/.config/moviemind/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("moviemind").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from a specific file, or return default if unreadable
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Resolve the API base URL with fallback chain:
    /// 1. Environment variable MOVIEMIND_API_BASE
    /// 2. `api_base` from the config file
    /// 3. DEFAULT_API_BASE
    pub fn api_base(&self) -> String {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                return base;
            }
        }
        self.api_base_without_env()
    }

    fn api_base_without_env(&self) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    pub fn recommendation_limit(&self) -> u32 {
        self.recommendation_limit
            .unwrap_or(DEFAULT_RECOMMENDATION_LIMIT)
    }

    pub fn trending_window(&self) -> TimeWindow {
        self.trending_window.unwrap_or_default()
    }

    /// Build an API client from the resolved settings. An explicit
    /// `api_base_override` (the `--api-base` flag) wins over everything.
    pub fn client(&self, api_base_override: Option<&str>) -> Result<MovieApiClient, FetchError> {
        let base = api_base_override
            .map(str::to_string)
            .unwrap_or_else(|| self.api_base());
        MovieApiClient::new(base, self.request_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_base.is_none());
        assert_eq!(config.api_base_without_env(), DEFAULT_API_BASE);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.recommendation_limit(), 10);
        assert_eq!(config.trending_window(), TimeWindow::Week);
    }

    #[test]
    fn test_config_file_overrides() {
        let config: Config = toml::from_str(
            r#"
            api_base = "http://movies.internal:8080/api"
            request_timeout_secs = 5
            trending_window = "day"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_without_env(), "http://movies.internal:8080/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.trending_window(), TimeWindow::Day);
        assert_eq!(config.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            api_base: Some("http://example.test/api".into()),
            recommendation_limit: Some(20),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_client_override_wins() {
        let config = Config {
            api_base: Some("http://from-file.test/api".into()),
            ..Config::default()
        };
        let client = config.client(Some("http://from-flag.test/api")).unwrap();
        assert_eq!(client.base_url(), "http://from-flag.test/api");
    }

    #[test]
    fn test_load_missing_or_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("absent.toml")), Config::default());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "api_base = [not toml").unwrap();
        assert_eq!(Config::load_from(&bad), Config::default());
    }
}

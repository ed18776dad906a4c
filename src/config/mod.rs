#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_origin, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const BASE_URL_ENV: &str = "CONTENT_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:1337";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_rotation_interval_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin of the content backend, also used to absolutize media paths.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_rotation_interval_ms")]
    pub rotation_interval_ms: u64,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            timeout_seconds: default_timeout_seconds(),
            search_debounce_ms: default_search_debounce_ms(),
            rotation_interval_ms: default_rotation_interval_ms(),
            verbose: false,
        }
    }
}

impl SiteConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults with the backend origin taken from `CONTENT_BASE_URL` when set.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    /// Loads settings from a TOML file; absent keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SiteConfig = toml::from_str(&content)?;
        tracing::debug!("Loaded site config for backend {}", config.base_url);
        Ok(config)
    }
}

impl ConfigProvider for SiteConfig {
    fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    fn rotation_interval(&self) -> Duration {
        Duration::from_millis(self.rotation_interval_ms)
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validate_origin("base_url", &self.base_url)?;
        validate_non_empty_string("api_prefix", &self.api_prefix)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validate_positive_number("search_debounce_ms", self.search_debounce_ms, 1)?;
        validate_positive_number("rotation_interval_ms", self.rotation_interval_ms, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_site_timings() {
        let config = SiteConfig::default();
        assert_eq!(config.base_url(), "http://localhost:1337");
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.rotation_interval(), Duration::from_millis(5000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_fills_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"https://cms.example.com/\"").unwrap();
        writeln!(file, "timeout_seconds = 3").unwrap();

        let config = SiteConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url(), "https://cms.example.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.api_prefix(), "/api");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SiteConfig::with_base_url("ftp://cms.example.com");
        assert!(config.validate().is_err());

        config.base_url = "https://cms.example.com".to_string();
        config.search_debounce_ms = 0;
        assert!(config.validate().is_err());
    }
}

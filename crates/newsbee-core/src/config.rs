//! Configuration management for NewsBee.
//!
//! Loads configuration from ${NEWSBEE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default NewsAPI base URL.
pub const DEFAULT_NEWS_BASE_URL: &str = "https://newsapi.org/v2";

/// News API section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSection {
    /// NewsAPI key. Falls back to the `NEWSAPI_KEY` environment variable.
    pub api_key: Option<String>,
    /// Override for the API base URL (proxies, testing).
    pub base_url: Option<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Country code for top headlines (ISO 3166-1 alpha-2).
    pub country: String,

    /// Number of articles per fetch (optional, API default applies).
    pub page_size: Option<u32>,

    /// News API configuration.
    #[serde(default)]
    pub news: NewsSection,
}

impl Config {
    const DEFAULT_COUNTRY: &str = "us";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the NewsAPI key with precedence: config > `NEWSAPI_KEY` env var.
    ///
    /// # Errors
    /// Returns an error if no key is available from either source.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.news.api_key {
            let trimmed = key.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }

        std::env::var("NEWSAPI_KEY")
            .context("No API key available. Set NEWSAPI_KEY or api_key in [news].")
    }

    /// Resolves the API base URL with precedence: env > config > default.
    ///
    /// # Errors
    /// Returns an error if a configured URL is malformed.
    pub fn resolve_base_url(&self) -> Result<String> {
        if let Ok(env_url) = std::env::var("NEWSBEE_NEWS_BASE_URL") {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.to_string());
            }
        }

        if let Some(config_url) = &self.news.base_url {
            let trimmed = config_url.trim();
            if !trimmed.is_empty() {
                validate_url(trimmed)?;
                return Ok(trimmed.to_string());
            }
        }

        Ok(DEFAULT_NEWS_BASE_URL.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: Self::DEFAULT_COUNTRY.to_string(),
            page_size: None,
            news: NewsSection::default(),
        }
    }
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid news base URL: {url}"))?;
    Ok(())
}

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
pub fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for NewsBee configuration and data files.
    //!
    //! NEWSBEE_HOME resolution order:
    //! 1. NEWSBEE_HOME environment variable (if set)
    //! 2. ~/.config/newsbee (default)

    use std::path::PathBuf;

    /// Returns the NewsBee home directory.
    ///
    /// Checks NEWSBEE_HOME env var first, falls back to ~/.config/newsbee
    pub fn newsbee_home() -> PathBuf {
        if let Ok(home) = std::env::var("NEWSBEE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("newsbee"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        newsbee_home().join("config.toml")
    }

    /// Returns the path to the users.json credential file.
    pub fn users_path() -> PathBuf {
        newsbee_home().join("users.json")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        newsbee_home().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    /// Config loading: missing file returns defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.country, "us");
        assert_eq!(config.page_size, None);
        assert!(config.news.api_key.is_none());
    }

    /// Config loading: partial config merges with defaults.
    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "country = \"gb\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.country, "gb");
        assert_eq!(config.page_size, None);
    }

    /// Config loading: invalid TOML is an error, not silently defaulted.
    #[test]
    fn test_load_invalid_toml_is_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "country = [not toml").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    /// Config init: creates file with defaults, creates parent dirs.
    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("country = \"us\""));
        assert!(contents.contains("# api_key ="));
    }

    /// Config init: fails if file exists (no silent overwrite).
    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let result = Config::init(&config_path);
        assert!(result.is_err());
    }

    /// API key resolution: config value wins over whitespace.
    #[test]
    fn test_api_key_from_config() {
        let config = Config {
            news: NewsSection {
                api_key: Some("  abc123  ".to_string()),
                base_url: None,
            },
            ..Default::default()
        };

        assert_eq!(config.resolve_api_key().unwrap(), "abc123");
    }

    /// Base URL resolution: config override is validated.
    #[test]
    fn test_base_url_from_config() {
        let config = Config {
            news: NewsSection {
                api_key: None,
                base_url: Some("https://proxy.example.com/v2".to_string()),
            },
            ..Default::default()
        };

        assert_eq!(
            config.resolve_base_url().unwrap(),
            "https://proxy.example.com/v2"
        );
    }

    /// Base URL resolution: malformed config URL is rejected.
    #[test]
    fn test_base_url_invalid_is_error() {
        let config = Config {
            news: NewsSection {
                api_key: None,
                base_url: Some("not a url".to_string()),
            },
            ..Default::default()
        };

        assert!(config.resolve_base_url().is_err());
    }
}

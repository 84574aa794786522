//! Configuration management for TrueNeed.
//!
//! Loads configuration from ${TRUENEED_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `api_base_url`.
pub const API_BASE_URL_ENV: &str = "TRUENEED_API_BASE_URL";

pub mod paths {
    //! Path resolution for TrueNeed configuration and state.
    //!
    //! TRUENEED_HOME resolution order:
    //! 1. TRUENEED_HOME environment variable (if set)
    //! 2. ~/.config/trueneed (default)

    use std::path::PathBuf;

    /// Returns the TrueNeed home directory.
    pub fn trueneed_home() -> PathBuf {
        if let Ok(home) = std::env::var("TRUENEED_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".trueneed"),
            |h| h.join(".config").join("trueneed"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        trueneed_home().join("config.toml")
    }

    /// Returns the path to the persisted session/preferences file.
    pub fn state_path() -> PathBuf {
        trueneed_home().join("state.json")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        trueneed_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend API, without trailing slash
    pub api_base_url: String,

    /// Per-request timeout in seconds (0 keeps the transport default)
    pub request_timeout_secs: u32,

    /// Mocked advisor typing delay in milliseconds
    pub typing_delay_ms: u64,

    /// Frontend path the backend redirects to after OAuth sign-in
    pub oauth_callback_path: String,
}

impl Config {
    const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
    const DEFAULT_TYPING_DELAY_MS: u64 = 1500;
    const DEFAULT_OAUTH_CALLBACK_PATH: &str = "/oauth/callback";

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

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Saves only the `api_base_url` field, keeping comments and other values.
    ///
    /// Creates the file from the default template if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or written.
    pub fn save_api_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        doc["api_base_url"] = value(url.trim_end_matches('/'));

        Self::write_config(path, &doc.to_string())
    }

    /// Returns the base URL to use, honoring the environment override.
    pub fn effective_api_base_url(&self) -> String {
        let base = std::env::var(API_BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.api_base_url.clone());
        base.trim().trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

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
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 0,
            typing_delay_ms: Self::DEFAULT_TYPING_DELAY_MS,
            oauth_callback_path: Self::DEFAULT_OAUTH_CALLBACK_PATH.to_string(),
        }
    }
}

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.typing_delay_ms, 1500);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "request_timeout_secs = 30\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.oauth_callback_path, "/oauth/callback");
    }

    /// The shipped template must parse back into the defaults.
    #[test]
    fn test_template_matches_defaults() {
        let parsed: Config = toml::from_str(default_config_template()).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.api_base_url, defaults.api_base_url);
        assert_eq!(parsed.typing_delay_ms, defaults.typing_delay_ms);
        assert_eq!(parsed.oauth_callback_path, defaults.oauth_callback_path);
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_save_api_base_url_preserves_comments() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        Config::save_api_base_url_to(&config_path, "https://api.trueneed.in/api/").unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# TrueNeed configuration"));
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_base_url, "https://api.trueneed.in/api");
    }
}

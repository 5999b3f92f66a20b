//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the webhook base URL, the signed-in user's email, and the
//! HTTP request timeout.
//!
//! Configuration is stored at `~/.config/crm-archive/config.json`. The
//! `CRM_ARCHIVE_BASE_URL` and `CRM_ARCHIVE_USER_EMAIL` environment variables
//! override the file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config directory paths
const APP_NAME: &str = "crm-archive";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Webhook base URL used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "https://workflows.prostarpics.com/webhook-test";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const BASE_URL_ENV: &str = "CRM_ARCHIVE_BASE_URL";
pub const USER_EMAIL_ENV: &str = "CRM_ARCHIVE_USER_EMAIL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub base_url: Option<String>,
    pub user_email: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = Some(url);
        }
        if let Some(email) = lookup(USER_EMAIL_ENV).filter(|v| !v.trim().is_empty()) {
            self.user_email = Some(email);
        }
    }

    /// Base URL without a trailing slash, so endpoint paths can be appended.
    pub fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout().as_secs(), DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = Config {
            base_url: Some("http://localhost:5678/webhook/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://localhost:5678/webhook");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            base_url: Some("http://file".to_string()),
            user_email: Some("file@example.com".to_string()),
            request_timeout_secs: Some(5),
        };
        config.apply_overrides(|key| match key {
            BASE_URL_ENV => Some("http://env".to_string()),
            USER_EMAIL_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url.as_deref(), Some("http://env"));
        // Blank values don't override
        assert_eq!(config.user_email.as_deref(), Some("file@example.com"));
        assert_eq!(config.request_timeout_secs, Some(5));
    }

    #[test]
    fn test_round_trips_through_json() {
        let json = r#"{"base_url":"http://x","user_email":null,"request_timeout_secs":10}"#;
        let config: Config = serde_json::from_str(json).expect("parse config");
        assert_eq!(config.base_url.as_deref(), Some("http://x"));
        assert_eq!(config.request_timeout().as_secs(), 10);
    }
}

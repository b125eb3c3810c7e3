//! Transport configuration.
//!
//! Loaded from disk at startup and saved when changed. A missing or
//! unreadable file falls back to defaults so a fresh install works without
//! any setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.apotheca.app/v1";

/// User agent sent with every request.
const DEFAULT_USER_AGENT: &str = concat!("apotheca-mobile/", env!("CARGO_PKG_VERSION"));

/// Transport configuration.
///
/// Serialized to TOML and stored in the user's config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are resolved against.
    pub base_url: String,

    /// Request timeout in milliseconds. Applied by the HTTP client; the
    /// call wrappers define no timeouts of their own.
    pub timeout_ms: u64,

    /// User agent header value.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ApiConfig {
    /// Load the configuration from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load the configuration from a specific path, falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load_from(path: &PathBuf) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save the configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "Apotheca", "Apotheca")
            .map(|dirs| dirs.config_dir().join("api.toml"))
            .unwrap_or_else(|| PathBuf::from("api.toml"))
    }
}

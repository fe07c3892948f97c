use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::{JsonFileStore, Locale, Theme};
use crate::error::{FormstateError, Result};
use crate::notification::DEFAULT_DURATION;

/// Notification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Auto-expiry for notifications that do not set their own
    pub default_duration_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_DURATION.as_millis() as u64,
        }
    }
}

impl NotificationConfig {
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }
}

/// Settings read from `formstate.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub locale: Locale,
    pub theme: Theme,
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    pub preferences_path: Option<PathBuf>,
    pub notifications: NotificationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            theme: Theme::default(),
            log_level: "info".to_string(),
            preferences_path: None,
            notifications: NotificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/formstate/formstate.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("formstate").join("formstate.toml"))
    }

    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| FormstateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| FormstateError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Where preferences live: the configured path or the platform default
    pub fn preferences_path(&self) -> Option<PathBuf> {
        self.preferences_path.clone().or_else(JsonFileStore::default_path)
    }
}

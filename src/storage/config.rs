//! Application configuration.
//!
//! Stored as TOML in the platform config directory. A missing file yields the
//! defaults; `ROUTESHARE_API_URL` overrides the site address at load time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ui::theme::Theme;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "ROUTESHARE_API_URL";

/// Default site address.
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version that wrote the file
    pub version: String,
    /// Config file location
    #[serde(skip)]
    pub config_dir: PathBuf,
    /// Site API settings
    pub api: ApiSettings,
    /// Job polling settings
    pub polling: PollingSettings,
    /// Map settings
    pub map: MapSettings,
    /// UI settings
    pub ui: UiSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config_dir: PathBuf::new(),
            api: ApiSettings::default(),
            polling: PollingSettings::default(),
            map: MapSettings::default(),
            ui: UiSettings::default(),
        }
    }
}

/// Site API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Site root URL
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Session cookie copied from a logged-in browser (needed for voting)
    pub session_cookie: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            session_cookie: None,
        }
    }
}

/// Job polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    /// Seconds between status requests
    pub interval_secs: u64,
    /// Status requests before giving up
    pub max_attempts: u32,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            max_attempts: 200,
        }
    }
}

impl PollingSettings {
    /// Interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// Map settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Quiet period after the last pan/zoom before re-filtering
    pub debounce_ms: u64,
    /// Minimum zoom level at which a clicked route's track is drawn
    pub trace_zoom_threshold: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 250,
            trace_zoom_threshold: 8.0,
        }
    }
}

impl MapSettings {
    /// Debounce quiet period as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// UI-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Colour theme
    pub theme: Theme,
    /// Font scale multiplier
    pub font_scale: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            font_scale: 1.0,
        }
    }
}

/// Get the application config directory.
pub fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "routeshare", "RouteShare")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Load configuration from the default location, applying env overrides.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.config_dir = get_config_dir();

    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            tracing::info!("Using API URL from {}", API_URL_ENV);
            config.api.base_url = url.trim().to_string();
        }
    }

    Ok(config)
}

/// Load configuration from a specific file. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save configuration to a specific file.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

//! Storage module for configuration.

pub mod config;

pub use config::{
    AppConfig, ApiSettings, ConfigError, MapSettings, PollingSettings, UiSettings,
};

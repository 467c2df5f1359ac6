//! Unit tests for configuration persistence.

use routeshare::storage::config::{load_config_from, save_config_to};
use routeshare::ui::Theme;
use routeshare::AppConfig;
use tempfile::TempDir;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.polling.interval_secs, 3);
    assert_eq!(config.map.debounce_ms, 250);
}

#[test]
fn test_saved_config_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = AppConfig::default();
    config.api.base_url = "https://routes.example.org".to_string();
    config.api.session_cookie = Some("session=abc".to_string());
    config.ui.theme = Theme::Light;
    config.polling.max_attempts = 20;

    save_config_to(&config, &path).unwrap();
    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nbase_url = \"http://10.0.0.5:8000\"\n").unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.api.base_url, "http://10.0.0.5:8000");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.ui.theme, Theme::Dark);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api\nbase_url = ").unwrap();

    assert!(load_config_from(&path).is_err());
}

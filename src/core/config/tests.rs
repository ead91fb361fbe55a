use super::data::{Config, CONFIG_KEYS};
use crate::core::policy::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.model_or_default(), DEFAULT_MODEL);
    assert_eq!(config.base_url_or_default(), DEFAULT_BASE_URL);
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    assert!(config.set_value("model", "gemini-2.5-flash".to_string()));
    assert!(config.set_value("theme", "light".to_string()));
    config.save_to_path(&config_path).expect("save failed");

    let loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded.model.as_deref(), Some("gemini-2.5-flash"));
    assert_eq!(loaded.theme.as_deref(), Some("light"));
    assert_eq!(loaded.base_url, None);

    let mut loaded = loaded;
    assert!(loaded.unset_value("model"));
    loaded.save_to_path(&config_path).expect("second save failed");

    let reloaded = Config::load_from_path(&config_path).expect("reload failed");
    assert_eq!(reloaded.model, None);
    assert_eq!(reloaded.model_or_default(), DEFAULT_MODEL);
}

#[test]
fn unknown_keys_are_rejected() {
    let mut config = Config::default();
    assert!(!config.set_value("temperature", "0.9".to_string()));
    assert!(!config.unset_value("temperature"));
    for key in CONFIG_KEYS {
        assert!(config.set_value(key, "x".to_string()));
    }
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "model = [unterminated").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("parse error");
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn save_into_a_file_path_reports_write_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "").expect("write");

    let err = Config::default()
        .save_to_path(&blocker.join("config.toml"))
        .expect_err("write error");
    assert!(err.to_string().starts_with("Failed to save config to"));
}

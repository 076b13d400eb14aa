//! Integration-level unit tests for the SettingsEngine public API.
//!
//! Exercises default loading, dot-path edits that persist immediately,
//! reset, and environment overrides.

use serde_json::json;
use stampbook::services::settings_engine::{
    SettingsEngine, SettingsEngineTrait, ENV_API_BASE_URL, ENV_DEV_MODE, ENV_MAP_KEY,
};
use stampbook::types::errors::SettingsError;
use stampbook::types::settings::ClientSettings;
use tempfile::TempDir;

/// Engine backed by a temp directory that lives as long as the caller's `TempDir`.
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.api.base_url, "http://localhost:8080/api");
    assert!(!settings.development_mode);
    assert_eq!(settings.map.zoom_level, 3);
}

#[test]
fn test_set_value_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    engine
        .set_value("api.base_url", json!("https://stampbook.example/api"))
        .unwrap();
    engine.set_value("development_mode", json!(true)).unwrap();

    let mut reloaded = engine_in_temp(&dir);
    let settings = reloaded.load().unwrap();
    assert_eq!(settings.api.base_url, "https://stampbook.example/api");
    assert!(settings.development_mode);
}

#[test]
fn test_set_value_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let err = engine.set_value("api.nope", json!(1)).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidKey(_)));

    let err = engine.set_value("", json!(1)).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidKey(_)));
}

#[test]
fn test_set_value_rejects_wrong_type_and_keeps_old_value() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let err = engine
        .set_value("map.zoom_level", json!("very close"))
        .unwrap_err();
    assert!(matches!(err, SettingsError::InvalidValue(_)));
    assert_eq!(engine.get_settings().map.zoom_level, 3);
}

#[test]
fn test_set_value_through_non_object_is_invalid_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    let err = engine
        .set_value("development_mode.flag", json!(true))
        .unwrap_err();
    assert!(matches!(err, SettingsError::InvalidKey(_)));
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.set_value("fake_latency_ms", json!(250)).unwrap();

    engine.reset().unwrap();

    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap(), ClientSettings::default());
}

#[test]
fn test_malformed_file_is_serialization_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ nope").unwrap();
    let mut engine = engine_in_temp(&dir);
    assert!(matches!(
        engine.load(),
        Err(SettingsError::SerializationError(_))
    ));
}

/// All environment cases live in one test so parallel tests never race on the variables.
#[test]
fn test_env_overrides_apply_in_memory_only() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    std::env::set_var(ENV_API_BASE_URL, " http://10.0.0.2:8080/api ");
    std::env::set_var(ENV_DEV_MODE, "yes");
    std::env::set_var(ENV_MAP_KEY, "kakao-key");
    engine.apply_env_overrides();
    std::env::remove_var(ENV_API_BASE_URL);
    std::env::remove_var(ENV_MAP_KEY);

    let settings = engine.get_settings();
    assert_eq!(settings.api.base_url, "http://10.0.0.2:8080/api");
    assert!(settings.development_mode);
    assert_eq!(settings.map.sdk_key, "kakao-key");

    std::env::set_var(ENV_DEV_MODE, "sometimes");
    engine.apply_env_overrides();
    std::env::remove_var(ENV_DEV_MODE);
    assert!(
        engine.get_settings().development_mode,
        "an unrecognized flag leaves the current value"
    );

    let mut reloaded = engine_in_temp(&dir);
    assert!(!reloaded.load().unwrap().development_mode);
}

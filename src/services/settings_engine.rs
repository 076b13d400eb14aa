// Stampbook Settings Engine
// Loads client settings from a JSON file, applies environment overrides,
// and supports dot-path edits that are validated by re-deserializing.

use std::env;
use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::ClientSettings;

pub const ENV_API_BASE_URL: &str = "STAMPBOOK_API_BASE_URL";
pub const ENV_DEV_MODE: &str = "STAMPBOOK_DEV_MODE";
pub const ENV_MAP_KEY: &str = "STAMPBOOK_MAP_KEY";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ClientSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ClientSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: ClientSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// Without an override the file is `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string()
        });

        Self {
            config_path,
            settings: ClientSettings::default(),
        }
    }

    /// Applies `STAMPBOOK_*` environment variables on top of the loaded settings.
    ///
    /// Overrides live in memory only; they are never written back by `save`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(ENV_API_BASE_URL) {
            if !url.trim().is_empty() {
                debug!("api base url overridden from environment");
                self.settings.api.base_url = url.trim().to_string();
            }
        }
        if let Ok(flag) = env::var(ENV_DEV_MODE) {
            match parse_flag(&flag) {
                Some(enabled) => self.settings.development_mode = enabled,
                None => warn!("ignoring unrecognized {} value: {}", ENV_DEV_MODE, flag),
            }
        }
        if let Ok(key) = env::var(ENV_MAP_KEY) {
            self.settings.map.sdk_key = key;
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields defaults; a malformed one is a serialization error.
    fn load(&mut self) -> Result<ClientSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = ClientSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Updates one setting by dot path (`"api.base_url"`, `"development_mode"`)
    /// and saves to disk.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.trim().is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut root = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };

        let mut target = &mut root;
        if let Some(parents) = parents {
            for part in parents.split('.') {
                target = target.get_mut(part).ok_or_else(|| {
                    SettingsError::InvalidKey(format!("Key '{}' not found in settings", key))
                })?;
            }
        }

        match target.as_object_mut() {
            Some(map) if map.contains_key(leaf) => {
                map.insert(leaf.to_string(), value);
            }
            Some(_) => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )))
            }
            None => {
                return Err(SettingsError::InvalidKey(format!(
                    "Cannot navigate to key '{}': intermediate value is not an object",
                    key
                )))
            }
        }

        self.settings = serde_json::from_value(root).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ClientSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}

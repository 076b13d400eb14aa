use serde::{Deserialize, Serialize};

/// Top-level client settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSettings {
    pub api: ApiSettings,
    /// Enables the fake backend fallback when the real backend is unreachable.
    pub development_mode: bool,
    /// Simulated round-trip for the fake backend, in milliseconds.
    pub fake_latency_ms: u64,
    pub map: MapSettings,
    /// Directory holding the local storage database. Empty means the platform default.
    pub data_dir: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            development_mode: false,
            fake_latency_ms: 0,
            map: MapSettings::default(),
            data_dir: String::new(),
        }
    }
}

/// REST backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Map viewport settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapSettings {
    pub sdk_key: String,
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub zoom_level: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            sdk_key: String::new(),
            center_latitude: 37.5665,
            center_longitude: 126.978,
            zoom_level: 3,
        }
    }
}

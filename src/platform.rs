// Platform-specific locations for Stampbook's settings file and local storage.
//
// Linux:   $XDG_CONFIG_HOME/stampbook, $XDG_DATA_HOME/stampbook
// macOS:   ~/Library/Application Support/Stampbook (both)
// Windows: %APPDATA%/Stampbook (both)

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Directory that holds `settings.json`.
pub fn get_config_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("Stampbook")
    } else if cfg!(target_os = "windows") {
        appdata_dir()
    } else if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("stampbook")
    } else {
        home_dir().join(".config").join("stampbook")
    }
}

/// Directory that holds the local storage database.
pub fn get_data_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        get_config_dir()
    } else if cfg!(target_os = "windows") {
        appdata_dir()
    } else if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("stampbook")
    } else {
        home_dir().join(".local").join("share").join("stampbook")
    }
}

fn appdata_dir() -> PathBuf {
    let appdata = env::var("APPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("Stampbook")
}

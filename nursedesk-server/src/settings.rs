//! Server settings persistence.
//!
//! Stores the bind address and database location in a JSON file at an
//! OS-appropriate location. Command-line flags and `NURSEDESK_*` environment
//! variables override the file (see `main.rs`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Persisted server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// `host:port` the API listens on.
    pub bind_address: String,
    /// Path of the SQLite database file.
    pub database_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_path: default_database_path().to_string_lossy().to_string(),
        }
    }
}

impl ServerSettings {
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }

    /// Applies overrides that were given explicitly (flag or environment).
    pub fn with_overrides(mut self, bind_address: Option<String>, database_path: Option<PathBuf>) -> Self {
        if let Some(bind) = bind_address {
            self.bind_address = bind;
        }
        if let Some(path) = database_path {
            self.database_path = path.to_string_lossy().to_string();
        }
        self
    }
}

/// Returns the path to the settings JSON file.
///
/// - macOS / Linux: `~/.config/nursedesk/server.json`
/// - Windows: `%APPDATA%/Nursedesk/server.json`
pub fn settings_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("Nursedesk").join("server.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("nursedesk").join("server.json")
    }
}

/// Returns the default database location: `<data dir>/nursedesk/nurses.db`.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nursedesk")
        .join("nurses.db")
}

/// Loads settings from `path`; returns defaults if the file is missing or corrupt.
pub fn load_settings_from(path: &Path) -> ServerSettings {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable settings file {}: {e}", path.display());
            ServerSettings::default()
        }),
        Err(_) => ServerSettings::default(),
    }
}

pub fn load_settings() -> ServerSettings {
    load_settings_from(&settings_file_path())
}

/// Saves settings to `path`, creating parent directories as needed.
pub fn save_settings_to(path: &Path, settings: &ServerSettings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create settings directory: {e}"))?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, json).map_err(|e| format!("Failed to write settings: {e}"))?;
    Ok(())
}

pub fn save_settings(settings: &ServerSettings) -> Result<(), String> {
    save_settings_to(&settings_file_path(), settings)
}

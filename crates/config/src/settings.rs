// Application settings
// Loaded from <config dir>/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Backend
    #[serde(rename = "hub.apiBase")]
    pub api_base: String,

    #[serde(rename = "hub.timeoutSecs")]
    pub timeout_secs: u64,

    // Download
    #[serde(rename = "download.directory")]
    pub download_dir: Option<PathBuf>,  // None = current directory

    // Editor
    #[serde(rename = "editor.confirmDiscard")]
    pub confirm_discard: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:4000/api".to_string(),
            timeout_secs: 30,
            download_dir: None,
            confirm_discard: true,
        }
    }
}

const DEFAULT_SETTINGS: &str = r#"{
    // Table backend
    "hub.apiBase": "http://localhost:4000/api",
    "hub.timeoutSecs": 30,

    // Where `download` writes exported tables (null = current directory)
    "download.directory": null,

    // Ask before discarding a named or partially hidden table
    "editor.confirmDiscard": true
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        crate::config_dir().join("settings.json")
    }

    /// Load settings from the default path, writing a commented default file
    /// on first run.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            Self::create_default_file(&path);
            return Self::default();
        }

        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned)
    }

    /// Save current settings to the default path
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| SettingsError::Io { path: parent.to_path_buf(), source })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })
    }

    fn create_default_file(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        if let Err(e) = fs::write(path, DEFAULT_SETTINGS) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Directory for downloads, defaulting to the working directory.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

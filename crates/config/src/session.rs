// Persisted editing session
//
// The headless front end keeps one live editing copy between invocations:
// the form state and the last fetched table list.

use gridshare_core::{FormState, UserTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::settings::SettingsError;

pub const SESSION_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub version: u32,
    pub form: FormState,
    pub user_tables: Vec<UserTable>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            form: FormState::default(),
            user_tables: Vec::new(),
        }
    }
}

impl Session {
    pub fn path() -> PathBuf {
        crate::config_dir().join("session.json")
    }

    /// Load the saved session; a missing or unreadable file starts fresh.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&contents) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Discarding unreadable session {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| SettingsError::Io { path: parent.to_path_buf(), source })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })
    }
}

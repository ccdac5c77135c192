// Configuration loading

use std::path::PathBuf;

pub mod session;
pub mod settings;

pub use session::Session;
pub use settings::{Settings, SettingsError};

/// Environment variable that relocates every config file.
pub const HOME_ENV: &str = "GRIDSHARE_HOME";

/// Directory holding settings.json, session.json and auth.json.
///
/// `$GRIDSHARE_HOME` when set, otherwise `<config dir>/gridshare`.
pub fn config_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gridshare")
}

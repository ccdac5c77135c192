//! Token storage.
//!
//! Reads/writes <config dir>/auth.json (0600 on Unix).

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// Authentication credentials stored locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCredentials {
    /// Bearer token for the table backend
    pub token: String,
    /// API base URL (e.g., "https://tables.example.com/api")
    pub api_base: String,
    /// User id (for display)
    #[serde(default)]
    pub user: Option<String>,
}

impl AuthCredentials {
    pub fn new(token: String, api_base: String) -> Self {
        Self { token, api_base, user: None }
    }
}

/// Returns the path to the auth credentials file.
pub fn auth_file_path() -> PathBuf {
    gridshare_config::config_dir().join("auth.json")
}

/// Load saved auth credentials from disk.
/// Returns None if no credentials are saved or if the file is invalid.
pub fn load_auth() -> Option<AuthCredentials> {
    load_auth_from(&auth_file_path())
}

pub fn load_auth_from(path: &Path) -> Option<AuthCredentials> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(creds) => Some(creds),
        Err(e) => {
            log::warn!("Ignoring invalid auth file {}: {}", path.display(), e);
            None
        }
    }
}

/// Save auth credentials to disk.
pub fn save_auth(creds: &AuthCredentials) -> Result<(), String> {
    save_auth_to(creds, &auth_file_path())
}

/// Creates the parent directory if it doesn't exist.
/// Sets 0600 permissions on Unix.
pub fn save_auth_to(creds: &AuthCredentials, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

    std::fs::write(path, &contents)
        .map_err(|e| format!("Failed to write auth file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}

/// Delete saved auth credentials.
pub fn delete_auth() -> Result<(), String> {
    let path = auth_file_path();
    if path.exists() {
        std::fs::remove_file(&path)
            .map_err(|e| format!("Failed to delete auth file: {}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_credentials_missing_optional_fields() {
        let json = r#"{"token":"tok","api_base":"https://tables.example.com/api"}"#;
        let parsed: AuthCredentials = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.token, "tok");
        assert!(parsed.user.is_none());
    }

    #[test]
    fn test_auth_file_path_name() {
        assert!(auth_file_path().ends_with("auth.json"));
    }

    #[test]
    fn test_save_and_load_auth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub/auth.json");

        let creds = AuthCredentials {
            user: Some("alice".into()),
            ..AuthCredentials::new("tok123".into(), "https://api.test".into())
        };
        save_auth_to(&creds, &path).unwrap();

        let loaded = load_auth_from(&path).unwrap();
        assert_eq!(loaded, creds);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_invalid_auth_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_auth_from(&path).is_none());
        assert!(load_auth_from(&dir.path().join("missing.json")).is_none());
    }
}

//! Table backend HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! One method per backend request; the editor drives the lifecycle.

use std::time::Duration;

use gridshare_core::{ShareRequest, Table, TableBackend, UserTable};
use thiserror::Error;

use crate::auth::{load_auth, AuthCredentials};

/// Table backend API client (blocking).
#[derive(Clone)]
pub struct HubClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

/// Error type for backend operations.
#[derive(Debug, Error)]
pub enum HubError {
    /// No auth credentials configured
    #[error("Not authenticated, run `gridshare login` first")]
    NotAuthenticated,
    /// API base URL cannot be used
    #[error("Invalid API base: {0}")]
    InvalidUrl(String),
    /// Network error
    #[error("Network error: {0}")]
    Network(String),
    /// HTTP error with status code. Displays the server's message; the
    /// status is shown only when the server sent none.
    #[error("{}", http_display(*.0, .1))]
    Http(u16, String),
    /// JSON parsing error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Server returned a validation error (4xx with message)
    #[error("{0}")]
    Validation(String),
}

impl HubClient {
    /// Create a new client using saved auth credentials.
    pub fn from_saved_auth(timeout: Duration) -> Result<Self, HubError> {
        let creds = load_auth().ok_or(HubError::NotAuthenticated)?;
        Ok(Self::new(creds, timeout))
    }

    /// Create a new client with explicit credentials.
    pub fn new(creds: AuthCredentials, timeout: Duration) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("gridshare/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: creds.api_base,
            token: creds.token,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// List tables owned by or shared with the current user.
    /// GET /tables
    pub fn list_tables(&self) -> Result<Vec<UserTable>, HubError> {
        let url = self.endpoint(&["tables"])?;
        let resp = self.send(self.http.get(url))?;
        resp.json().map_err(|e| HubError::Parse(e.to_string()))
    }

    /// Fetch a full table by name.
    /// GET /tables/:name
    pub fn get_table(&self, name: &str) -> Result<Table, HubError> {
        let url = self.endpoint(&["tables", name])?;
        let resp = self.send(self.http.get(url))?;
        resp.json().map_err(|e| HubError::Parse(e.to_string()))
    }

    /// Create or update a table. Returns the stored record.
    /// POST /tables
    pub fn put_table(&self, table: &Table) -> Result<Table, HubError> {
        let url = self.endpoint(&["tables"])?;
        let resp = self.send(self.http.post(url).json(table))?;
        resp.json().map_err(|e| HubError::Parse(e.to_string()))
    }

    /// Grant other users access to a table.
    /// POST /tables/share
    pub fn share(&self, request: &ShareRequest) -> Result<(), HubError> {
        let url = self.endpoint(&["tables", "share"])?;
        self.send(self.http.post(url).json(request))?;
        Ok(())
    }

    /// Exported file contents of a table.
    /// GET /tables/:name/download
    pub fn download(&self, name: &str) -> Result<Vec<u8>, HubError> {
        let url = self.endpoint(&["tables", name, "download"])?;
        let resp = self.send(self.http.get(url))?;
        let bytes = resp.bytes().map_err(|e| HubError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    // ── Internal helpers ────────────────────────────────────────────

    /// Join path segments onto the API base, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, HubError> {
        let mut url = reqwest::Url::parse(&self.api_base)
            .map_err(|e| HubError::InvalidUrl(format!("{}: {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| HubError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, req: reqwest::blocking::RequestBuilder) -> Result<reqwest::blocking::Response, HubError> {
        let response = req
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| HubError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        log::debug!("{} {}", status, response.url());

        if !response.status().is_success() {
            let body = error_message(&response.text().unwrap_or_default());
            if status == 422 || status == 400 {
                return Err(HubError::Validation(body));
            }
            return Err(HubError::Http(status, body));
        }

        Ok(response)
    }
}

impl TableBackend for HubClient {
    type Error = HubError;

    fn list_user_tables(&self) -> Result<Vec<UserTable>, HubError> {
        self.list_tables()
    }

    fn fetch_table(&self, name: &str) -> Result<Table, HubError> {
        self.get_table(name)
    }

    fn save_table(&self, table: &Table) -> Result<Table, HubError> {
        self.put_table(table)
    }

    fn share_table(&self, request: &ShareRequest) -> Result<(), HubError> {
        self.share(request)
    }

    fn download_table(&self, name: &str) -> Result<Vec<u8>, HubError> {
        self.download(name)
    }
}

// ── Free functions ──────────────────────────────────────────────────

fn http_display(status: u16, message: &str) -> String {
    if message.is_empty() {
        format!("HTTP {}", status)
    } else {
        message.to_string()
    }
}

/// Pull a human-readable message out of an error body.
/// JSON bodies with a `message` or `error` string yield that string;
/// anything else is returned trimmed.
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = json[key].as_str() {
                return msg.to_string();
            }
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_base: &str) -> HubClient {
        HubClient::new(
            AuthCredentials::new("tok".into(), api_base.into()),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_error_message_json() {
        assert_eq!(error_message(r#"{"message":"Table name taken"}"#), "Table name taken");
        assert_eq!(error_message(r#"{"error":"Forbidden"}"#), "Forbidden");
    }

    #[test]
    fn test_error_message_plain() {
        assert_eq!(error_message("  network error\n"), "network error");
        assert_eq!(error_message(r#"{"code":5}"#), r#"{"code":5}"#);
    }

    #[test]
    fn test_endpoint_encodes_names() {
        let c = client("http://localhost:4000/api/");
        let url = c.endpoint(&["tables", "first table"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/tables/first%20table");
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let c = client("http://localhost:4000/api");
        let url = c.endpoint(&["tables", "share"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/tables/share");
    }

    #[test]
    fn test_endpoint_invalid_base() {
        let c = client("not a url");
        assert!(matches!(c.endpoint(&["tables"]), Err(HubError::InvalidUrl(_))));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(HubError::Http(500, "boom".into()).to_string(), "boom");
        assert_eq!(HubError::Http(502, String::new()).to_string(), "HTTP 502");
        assert_eq!(HubError::Validation("Table name is required".into()).to_string(), "Table name is required");
    }
}

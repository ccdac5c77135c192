// Backend login/logout and the CLI's view of the table backend.

use gridshare_core::{ShareRequest, Table, TableBackend, UserTable};
use gridshare_hub_client::{auth_file_path, delete_auth, save_auth, AuthCredentials, HubClient, HubError};

use crate::exit_codes::{EXIT_ERROR, EXIT_NOT_AUTH, EXIT_REMOTE, EXIT_USAGE, EXIT_VALIDATION};
use crate::CliError;

/// Backend handle that may be missing credentials.
///
/// Local edits never touch the backend, so commands like `set` and `show`
/// work before `gridshare login`; remote calls fail with `NotAuthenticated`.
pub struct Remote {
    client: Option<HubClient>,
}

impl Remote {
    pub fn new(client: Option<HubClient>) -> Self {
        Self { client }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&HubClient, HubError> {
        self.client.as_ref().ok_or(HubError::NotAuthenticated)
    }
}

impl TableBackend for Remote {
    type Error = HubError;

    fn list_user_tables(&self) -> Result<Vec<UserTable>, HubError> {
        self.client()?.list_tables()
    }

    fn fetch_table(&self, name: &str) -> Result<Table, HubError> {
        self.client()?.get_table(name)
    }

    fn save_table(&self, table: &Table) -> Result<Table, HubError> {
        self.client()?.put_table(table)
    }

    fn share_table(&self, request: &ShareRequest) -> Result<(), HubError> {
        self.client()?.share(request)
    }

    fn download_table(&self, name: &str) -> Result<Vec<u8>, HubError> {
        self.client()?.download(name)
    }
}

pub fn cmd_login(token: Option<String>, api_base: String, user: Option<String>) -> Result<(), CliError> {
    let token = token.map(|t| t.trim().to_string()).unwrap_or_default();
    if token.is_empty() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "No token provided".into(),
            hint: Some("pass --token or set GRIDSHARE_TOKEN".into()),
        });
    }

    let creds = AuthCredentials {
        user,
        ..AuthCredentials::new(token, api_base)
    };
    save_auth(&creds).map_err(|e| CliError { code: EXIT_ERROR, message: e, hint: None })?;

    log::info!("credentials written to {}", auth_file_path().display());
    eprintln!("Logged in to {}", creds.api_base);
    Ok(())
}

pub fn cmd_logout() -> Result<(), CliError> {
    delete_auth().map_err(|e| CliError { code: EXIT_ERROR, message: e, hint: None })?;
    eprintln!("Logged out");
    Ok(())
}

pub fn hub_error(e: HubError) -> CliError {
    match e {
        HubError::NotAuthenticated => CliError {
            code: EXIT_NOT_AUTH,
            message: "Not authenticated".into(),
            hint: Some("run `gridshare login` first".into()),
        },
        HubError::InvalidUrl(msg) => CliError {
            code: EXIT_USAGE,
            message: format!("Invalid API base: {}", msg),
            hint: Some("log in again with a full URL, e.g. --api-base http://localhost:4000/api".into()),
        },
        HubError::Network(msg) => CliError {
            code: EXIT_REMOTE,
            message: msg,
            hint: None,
        },
        HubError::Http(code, msg) => CliError {
            code: EXIT_REMOTE,
            message: format!("HTTP {}: {}", code, msg),
            hint: None,
        },
        HubError::Validation(msg) => CliError {
            code: EXIT_VALIDATION,
            message: msg,
            hint: None,
        },
        HubError::Parse(msg) => CliError {
            code: EXIT_REMOTE,
            message: format!("Unexpected response: {}", msg),
            hint: None,
        },
    }
}

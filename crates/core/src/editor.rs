//! Table editor controller.
//!
//! Drives the form state through its transitions around backend calls:
//! validate, mark pending, call, then fulfil or reject. Outcomes meant for
//! the user are queued as [`Notification`]s for the front end to show.

use std::path::{Component, Path, PathBuf};

use crate::backend::TableBackend;
use crate::error::TableError;
use crate::filter::{table_exists, validate};
use crate::form::{reduce, FormAction, FormState};
use crate::guard::{has_hidden_data, has_name, should_block_navigation};
use crate::table::{Dimensions, ShareRequest, UserTable, UserTableField, ViewMode};

pub const MSG_NAME_REQUIRED: &str = "Table name is required";
pub const MSG_TABLE_UPDATED: &str = "Table Updated";
pub const MSG_TABLES_FETCHED: &str = "User Tables Fetched";
pub const MSG_TABLE_SHARED: &str = "Table shared";
pub const MSG_SHARE_FAILED: &str = "Could not share the table. Try again later.";
pub const MSG_SAVE_BEFORE_SHARE: &str = "Save the table before sharing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Valid,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn valid(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Valid, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Error, message: message.into() }
    }
}

pub struct Editor<B> {
    backend: B,
    state: FormState,
    user_tables: Vec<UserTable>,
    share_dialog_open: bool,
    notifications: Vec<Notification>,
}

impl<B: TableBackend> Editor<B> {
    pub fn new(backend: B) -> Self {
        Self::with_state(backend, FormState::new(), Vec::new())
    }

    /// Resume editing from a previously persisted state.
    pub fn with_state(backend: B, state: FormState, user_tables: Vec<UserTable>) -> Self {
        Self {
            backend,
            state,
            user_tables,
            share_dialog_open: false,
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn user_tables(&self) -> &[UserTable] {
        &self.user_tables
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_parts(self) -> (FormState, Vec<UserTable>) {
        (self.state, self.user_tables)
    }

    /// Apply one action. On error the current state is left untouched.
    pub fn dispatch(&mut self, action: FormAction) -> Result<(), TableError> {
        self.state = reduce(self.state.clone(), action)?;
        Ok(())
    }

    // ── Direct edits ────────────────────────────────────────────────

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), TableError> {
        self.dispatch(FormAction::SetName(name.into()))
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> Result<(), TableError> {
        self.dispatch(FormAction::SetCell { row, col, value: value.into() })
    }

    pub fn resize(&mut self, dims: Dimensions) -> Result<(), TableError> {
        self.dispatch(FormAction::SetDimensions(dims))
    }

    pub fn clear(&mut self) -> Result<(), TableError> {
        self.dispatch(FormAction::Clear)
    }

    // ── Remote operations ───────────────────────────────────────────

    /// Save the current table.
    ///
    /// A missing name fails before anything is sent. A rejected save keeps
    /// every edit so the user can retry. A successful save refreshes the
    /// table list and resets the form.
    pub fn submit(&mut self) -> Result<(), TableError> {
        if !validate(&self.state.table) {
            self.notify(Notification::error(MSG_NAME_REQUIRED));
            return Err(TableError::validation(MSG_NAME_REQUIRED));
        }

        self.dispatch(FormAction::SavePending)?;

        let payload = self.state.payload();
        match self.backend.save_table(&payload) {
            Ok(saved) => {
                log::info!("saved table {:?} ({} rows)", saved.name, payload.grid.len());
                self.dispatch(FormAction::SaveFulfilled)?;
                self.notify(Notification::valid(MSG_TABLE_UPDATED));
                if let Err(e) = self.fetch_user_tables() {
                    log::warn!("could not refresh table list after save: {}", e);
                }
                self.clear()
            }
            Err(e) => {
                let message = e.to_string();
                self.dispatch(FormAction::SaveRejected(message.clone()))?;
                self.notify(Notification::error(message.clone()));
                Err(TableError::Remote(message))
            }
        }
    }

    /// Replace the form with a table fetched from the backend.
    pub fn load(&mut self, name: &str) -> Result<(), TableError> {
        self.dispatch(FormAction::LoadPending)?;

        match self.backend.fetch_table(name) {
            Ok(table) => {
                log::info!("loaded table {:?}", table.name);
                self.dispatch(FormAction::LoadFulfilled(table))
            }
            Err(e) => {
                let message = e.to_string();
                self.dispatch(FormAction::LoadRejected(message.clone()))?;
                self.notify(Notification::error(message.clone()));
                Err(TableError::Remote(message))
            }
        }
    }

    /// Fetch the current user's tables.
    pub fn refresh_user_tables(&mut self) -> Result<(), TableError> {
        match self.fetch_user_tables() {
            Ok(()) => {
                self.notify(Notification::valid(MSG_TABLES_FETCHED));
                Ok(())
            }
            Err(e) => {
                self.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    fn fetch_user_tables(&mut self) -> Result<(), TableError> {
        let tables = self
            .backend
            .list_user_tables()
            .map_err(|e| TableError::Remote(e.to_string()))?;
        log::debug!("fetched {} user tables", tables.len());
        self.user_tables = tables;
        Ok(())
    }

    pub fn open_share_dialog(&mut self) {
        self.share_dialog_open = true;
    }

    pub fn close_share_dialog(&mut self) {
        self.share_dialog_open = false;
    }

    pub fn share_dialog_open(&self) -> bool {
        self.share_dialog_open
    }

    /// Share the current (saved) table. The dialog closes only on success.
    pub fn share(&mut self, users: Vec<String>, view_mode: ViewMode) -> Result<(), TableError> {
        let Some(table_id) = self.state.table.id.clone() else {
            self.notify(Notification::error(MSG_SAVE_BEFORE_SHARE));
            return Err(TableError::validation(MSG_SAVE_BEFORE_SHARE));
        };

        let request = ShareRequest { table_id, users, view_mode };
        match self.backend.share_table(&request) {
            Ok(()) => {
                log::info!("shared table {} with {} users ({})", request.table_id, request.users.len(), view_mode);
                self.share_dialog_open = false;
                self.notify(Notification::valid(MSG_TABLE_SHARED));
                Ok(())
            }
            Err(e) => {
                log::debug!("share failed: {}", e);
                self.notify(Notification::error(MSG_SHARE_FAILED));
                Err(TableError::Remote(e.to_string()))
            }
        }
    }

    /// Best-effort export of the current table into `dir`.
    ///
    /// Failures are logged and swallowed; the editor state is never touched.
    pub fn download(&self, dir: &Path) -> Option<PathBuf> {
        let name = self.state.table.name.trim();
        if name.is_empty() {
            log::warn!("download skipped: table has no name");
            return None;
        }
        if !is_plain_file_name(name) {
            log::warn!("download skipped: table name {:?} is not a plain file name", name);
            return None;
        }

        let bytes = match self.backend.download_table(name) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("download of {:?} failed: {}", name, e);
                return None;
            }
        };

        let path = dir.join(format!("{}.csv", name));
        match std::fs::write(&path, bytes) {
            Ok(()) => Some(path),
            Err(e) => {
                log::warn!("could not write {}: {}", path.display(), e);
                None
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn should_block_navigation(&self) -> bool {
        should_block_navigation(has_name(&self.state), has_hidden_data(&self.state))
    }

    /// A table with this name is already in the cached list.
    pub fn name_taken(&self, name: &str) -> bool {
        table_exists(&self.user_tables, UserTableField::Name, name)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/// `name` is a single ordinary path component, so joining it onto a
/// directory cannot leave that directory.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Table, Window};
    use std::cell::RefCell;

    #[derive(Debug)]
    struct FakeError(String);

    impl std::fmt::Display for FakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for FakeError {}

    /// In-memory backend recording what it was sent.
    #[derive(Default)]
    struct FakeBackend {
        tables: Vec<Table>,
        fail_with: Option<String>,
        saved: RefCell<Vec<Table>>,
        shared: RefCell<Vec<ShareRequest>>,
        list_calls: RefCell<usize>,
    }

    impl FakeBackend {
        fn failing(msg: &str) -> Self {
            Self { fail_with: Some(msg.into()), ..Self::default() }
        }

        fn check(&self) -> Result<(), FakeError> {
            match &self.fail_with {
                Some(msg) => Err(FakeError(msg.clone())),
                None => Ok(()),
            }
        }
    }

    impl TableBackend for FakeBackend {
        type Error = FakeError;

        fn list_user_tables(&self) -> Result<Vec<UserTable>, FakeError> {
            self.check()?;
            *self.list_calls.borrow_mut() += 1;
            Ok(self
                .tables
                .iter()
                .map(|t| UserTable {
                    id: t.id.clone(),
                    name: t.name.clone(),
                    owner: "alice".into(),
                    permissions: ViewMode::Edit,
                })
                .collect())
        }

        fn fetch_table(&self, name: &str) -> Result<Table, FakeError> {
            self.check()?;
            self.tables
                .iter()
                .find(|t| t.name == name)
                .cloned()
                .ok_or_else(|| FakeError(format!("Table {} not found", name)))
        }

        fn save_table(&self, table: &Table) -> Result<Table, FakeError> {
            self.check()?;
            self.saved.borrow_mut().push(table.clone());
            Ok(Table { id: Some("new-id".into()), ..table.clone() })
        }

        fn share_table(&self, request: &ShareRequest) -> Result<(), FakeError> {
            self.check()?;
            self.shared.borrow_mut().push(request.clone());
            Ok(())
        }

        fn download_table(&self, name: &str) -> Result<Vec<u8>, FakeError> {
            self.check()?;
            Ok(format!("A,B\n{},x\n", name).into_bytes())
        }
    }

    fn filled(backend: FakeBackend) -> Editor<FakeBackend> {
        let mut editor = Editor::new(backend);
        editor.set_name("budget").unwrap();
        editor.resize(Dimensions::new(2, 2)).unwrap();
        editor.set_cell(0, 0, "a").unwrap();
        editor.set_cell(1, 1, "d").unwrap();
        editor
    }

    #[test]
    fn test_submit_without_name_sends_nothing() {
        let mut editor = Editor::new(FakeBackend::default());
        editor.resize(Dimensions::new(1, 1)).unwrap();

        let err = editor.submit().unwrap_err();
        assert!(matches!(err, TableError::Validation(_)));
        assert!(!editor.state().loading);
        assert!(editor.backend().saved.borrow().is_empty());
        assert_eq!(editor.take_notifications(), vec![Notification::error(MSG_NAME_REQUIRED)]);
    }

    #[test]
    fn test_submit_blank_name_is_rejected() {
        let mut editor = Editor::new(FakeBackend::default());
        editor.set_name("   ").unwrap();
        assert!(matches!(editor.submit(), Err(TableError::Validation(_))));
    }

    #[test]
    fn test_submit_success_saves_filtered_and_clears() {
        let mut editor = filled(FakeBackend::default());
        editor.resize(Dimensions::new(1, 2)).unwrap();

        editor.submit().unwrap();

        let saved = editor.backend().saved.borrow().clone();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "budget");
        assert_eq!(saved[0].grid, vec![vec!["a".to_string(), String::new()]]);

        assert_eq!(*editor.backend().list_calls.borrow(), 1);
        assert_eq!(editor.state(), &FormState::new());
        assert_eq!(editor.take_notifications(), vec![Notification::valid(MSG_TABLE_UPDATED)]);
    }

    #[test]
    fn test_submit_failure_keeps_edits() {
        let mut editor = filled(FakeBackend::failing("network error"));
        let before = editor.state().table.clone();

        let err = editor.submit().unwrap_err();
        assert_eq!(err, TableError::Remote("network error".into()));
        assert!(!editor.state().loading);
        assert_eq!(editor.state().error, "network error");
        assert_eq!(editor.state().table, before);
        assert_eq!(editor.take_notifications(), vec![Notification::error("network error")]);
    }

    #[test]
    fn test_submit_while_pending_is_busy() {
        let mut editor = filled(FakeBackend::default());
        editor.dispatch(FormAction::SavePending).unwrap();
        assert_eq!(editor.submit().unwrap_err(), TableError::Busy);
        assert!(editor.backend().saved.borrow().is_empty());
    }

    #[test]
    fn test_set_cell_error_keeps_state() {
        let mut editor = filled(FakeBackend::default());
        let before = editor.state().clone();
        assert!(editor.set_cell(5, 0, "x").is_err());
        assert_eq!(editor.state(), &before);
    }

    #[test]
    fn test_load_replaces_form() {
        let stored = Table {
            name: "roster".into(),
            dimensions: Dimensions::new(2, 1),
            grid: vec![vec!["x".into()], vec!["y".into()]],
            id: Some("r1".into()),
        };
        let backend = FakeBackend { tables: vec![stored.clone()], ..FakeBackend::default() };
        let mut editor = filled(backend);

        editor.load("roster").unwrap();
        assert_eq!(editor.state().table, stored);
        assert_eq!(editor.state().window, Window::new(2, 1));
        assert!(!editor.state().loading);
    }

    #[test]
    fn test_load_missing_table() {
        let mut editor = Editor::new(FakeBackend::default());
        let err = editor.load("nope").unwrap_err();
        assert_eq!(err, TableError::Remote("Table nope not found".into()));
        assert_eq!(editor.state().error, "Table nope not found");
        assert!(!editor.state().loading);
    }

    #[test]
    fn test_refresh_user_tables() {
        let backend = FakeBackend {
            tables: vec![Table { name: "budget".into(), ..Table::blank() }],
            ..FakeBackend::default()
        };
        let mut editor = Editor::new(backend);
        assert!(!editor.name_taken("budget"));

        editor.refresh_user_tables().unwrap();
        assert_eq!(editor.user_tables().len(), 1);
        assert!(editor.name_taken("budget"));
        assert!(!editor.name_taken("other"));
        assert_eq!(editor.take_notifications(), vec![Notification::valid(MSG_TABLES_FETCHED)]);
    }

    #[test]
    fn test_share_requires_saved_table() {
        let mut editor = filled(FakeBackend::default());
        let err = editor.share(vec!["bob".into()], ViewMode::Edit).unwrap_err();
        assert!(matches!(err, TableError::Validation(_)));
        assert!(editor.backend().shared.borrow().is_empty());
    }

    #[test]
    fn test_share_success_closes_dialog() {
        let mut editor = filled(FakeBackend::default());
        editor.state.table.id = Some("t1".into());
        editor.open_share_dialog();

        editor.share(vec!["bob".into(), "carol".into()], ViewMode::ReadOnly).unwrap();
        assert!(!editor.share_dialog_open());

        let shared = editor.backend().shared.borrow().clone();
        assert_eq!(shared[0].table_id, "t1");
        assert_eq!(shared[0].users, vec!["bob", "carol"]);
        assert_eq!(shared[0].view_mode, ViewMode::ReadOnly);
        assert_eq!(editor.take_notifications(), vec![Notification::valid(MSG_TABLE_SHARED)]);
    }

    #[test]
    fn test_share_failure_keeps_dialog_open() {
        let mut editor = filled(FakeBackend::failing("HTTP 500"));
        editor.state.table.id = Some("t1".into());
        editor.open_share_dialog();

        assert!(editor.share(vec!["bob".into()], ViewMode::Edit).is_err());
        assert!(editor.share_dialog_open());
        assert_eq!(editor.take_notifications(), vec![Notification::error(MSG_SHARE_FAILED)]);
    }

    #[test]
    fn test_download_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let editor = filled(FakeBackend::default());

        let path = editor.download(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("budget.csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "A,B\nbudget,x\n");
    }

    #[test]
    fn test_download_rejects_names_leaving_dir() {
        let root = tempfile::tempdir().unwrap();
        let downloads = root.path().join("downloads");
        std::fs::create_dir(&downloads).unwrap();

        for name in ["../escaped", "a/../../escaped", "sub/escaped", "/tmp/escaped", ".."] {
            let stored = Table {
                name: name.into(),
                dimensions: Dimensions::new(1, 1),
                grid: vec![vec!["x".into()]],
                id: Some("t1".into()),
            };
            let backend = FakeBackend { tables: vec![stored], ..FakeBackend::default() };
            let mut editor = Editor::new(backend);
            editor.load(name).unwrap();

            assert_eq!(editor.download(&downloads), None, "{}", name);
        }
        assert!(!root.path().join("escaped.csv").exists());
        assert_eq!(std::fs::read_dir(&downloads).unwrap().count(), 0);
    }

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("budget"));
        assert!(is_plain_file_name("Q1 report.v2"));
        assert!(!is_plain_file_name("."));
        assert!(!is_plain_file_name("a/b"));
        assert!(!is_plain_file_name("../x"));
    }

    #[test]
    fn test_download_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = filled(FakeBackend::failing("offline"));
        let before = editor.state().clone();

        assert!(editor.download(dir.path()).is_none());
        assert_eq!(editor.state(), &before);
        assert!(editor.take_notifications().is_empty());
    }

    #[test]
    fn test_navigation_guard() {
        let mut editor = Editor::new(FakeBackend::default());
        assert!(!editor.should_block_navigation());
        editor.set_name("draft").unwrap();
        assert!(editor.should_block_navigation());
        editor.clear().unwrap();
        assert!(!editor.should_block_navigation());
    }
}

// Editing commands.
//
// Each invocation restores the draft from session.json, applies one
// command through the editor and writes the draft back.

use std::path::PathBuf;

use gridshare_config::{Session, Settings};
use gridshare_core::{
    column_label, Dimensions, Editor, FormState, NotificationKind, Table, TableError, UserTable,
    ViewMode,
};
use gridshare_hub_client::{HubClient, HubError};

use crate::exit_codes::{EXIT_ERROR, EXIT_REMOTE, EXIT_UNSAVED, EXIT_USAGE, EXIT_VALIDATION};
use crate::hub::{hub_error, Remote};
use crate::CliError;

pub struct Workspace {
    settings: Settings,
    editor: Editor<Remote>,
}

impl Workspace {
    pub fn open() -> Self {
        let settings = Settings::load();
        let session = Session::load();

        let client = match HubClient::from_saved_auth(settings.timeout()) {
            Ok(client) => Some(client),
            Err(e) => {
                log::debug!("backend unavailable: {}", e);
                None
            }
        };

        let editor = Editor::with_state(Remote::new(client), session.form, session.user_tables);
        Self { settings, editor }
    }

    /// Write the draft back and print queued success notices.
    pub fn close(mut self) -> Result<(), CliError> {
        for n in self.editor.take_notifications() {
            // Failures reach the user through the command's CliError.
            if n.kind == NotificationKind::Valid {
                eprintln!("{}", n.message);
            }
        }

        let (form, user_tables) = self.editor.into_parts();
        let session = Session { form, user_tables, ..Session::default() };
        session.save().map_err(|e| CliError {
            code: EXIT_ERROR,
            message: e.to_string(),
            hint: None,
        })
    }

    fn require_backend(&self) -> Result<(), CliError> {
        if self.editor.backend().is_connected() {
            Ok(())
        } else {
            Err(hub_error(HubError::NotAuthenticated))
        }
    }

    /// Refuse to throw away a draft the user may still want.
    fn check_discard(&self, force: bool) -> Result<(), CliError> {
        if force || !self.settings.confirm_discard || !self.editor.should_block_navigation() {
            return Ok(());
        }
        Err(CliError {
            code: EXIT_UNSAVED,
            message: format!("Unsaved table {:?} would be discarded", self.editor.state().table.name),
            hint: Some("save it first, or pass --force".into()),
        })
    }

    // ── Commands ────────────────────────────────────────────────────

    pub fn cmd_new(&mut self, force: bool) -> Result<(), CliError> {
        self.check_discard(force)?;
        self.editor.clear().map_err(table_error)
    }

    pub fn cmd_name(&mut self, name: String) -> Result<(), CliError> {
        if self.editor.name_taken(&name) {
            eprintln!("warning: a table named {:?} already exists; saving will overwrite it", name);
        }
        self.editor.set_name(name).map_err(table_error)
    }

    pub fn cmd_resize(&mut self, rows: usize, cols: usize) -> Result<(), CliError> {
        self.editor.resize(Dimensions::new(rows, cols)).map_err(table_error)
    }

    /// `row` and `col` are 1-based, as displayed by `show`.
    pub fn cmd_set(&mut self, row: usize, col: usize, value: String) -> Result<(), CliError> {
        let (Some(r), Some(c)) = (row.checked_sub(1), col.checked_sub(1)) else {
            return Err(CliError::usage("Rows and columns are numbered from 1"));
        };
        self.editor
            .set_cell(r, c, value)
            .map_err(|e| table_error(e).with_hint("see `gridshare show` for the current size"))
    }

    pub fn cmd_show(&self, json: bool) -> Result<(), CliError> {
        let visible = visible_table(self.editor.state());
        if json {
            let out = serde_json::to_string_pretty(&visible)
                .map_err(|e| CliError::error(e.to_string()))?;
            println!("{}", out);
        } else {
            print!("{}", render(&visible));
        }
        Ok(())
    }

    pub fn cmd_save(&mut self) -> Result<(), CliError> {
        self.require_backend()?;
        self.editor.submit().map_err(table_error)
    }

    pub fn cmd_open(&mut self, name: &str, force: bool) -> Result<(), CliError> {
        self.check_discard(force)?;
        self.require_backend()?;
        self.editor.load(name).map_err(table_error)
    }

    pub fn cmd_list(&mut self, json: bool) -> Result<(), CliError> {
        self.require_backend()?;
        self.editor.refresh_user_tables().map_err(table_error)?;

        let tables = self.editor.user_tables();
        if json {
            let out = serde_json::to_string_pretty(tables)
                .map_err(|e| CliError::error(e.to_string()))?;
            println!("{}", out);
            return Ok(());
        }

        print!("{}", render_list(tables));
        Ok(())
    }

    pub fn cmd_share(&mut self, users: Vec<String>, mode: ViewMode) -> Result<(), CliError> {
        self.require_backend()?;
        self.editor.open_share_dialog();
        let result = self.editor.share(users, mode);
        self.editor.close_share_dialog();
        result.map_err(table_error)
    }

    pub fn cmd_download(&self, out: Option<PathBuf>) -> Result<(), CliError> {
        self.require_backend()?;
        let dir = out.unwrap_or_else(|| self.settings.download_dir());
        match self.editor.download(&dir) {
            Some(path) => {
                println!("{}", path.display());
                Ok(())
            }
            None => Err(CliError {
                code: EXIT_REMOTE,
                message: "Nothing downloaded".into(),
                hint: Some("the table must be named and saved; rerun with RUST_LOG=debug for details".into()),
            }),
        }
    }
}

pub fn table_error(e: TableError) -> CliError {
    let code = match &e {
        TableError::Validation(_) => EXIT_VALIDATION,
        TableError::Remote(_) => EXIT_REMOTE,
        TableError::OutOfBounds { .. } => EXIT_USAGE,
        TableError::Busy => EXIT_ERROR,
    };
    CliError { code, message: e.to_string(), hint: None }
}

/// The table as the user sees it: every visible cell, hidden ones dropped.
fn visible_table(state: &FormState) -> Table {
    let grid = (0..state.window.rows)
        .map(|r| {
            (0..state.window.cols)
                .map(|c| state.visible_cell(r, c).unwrap_or_default().to_string())
                .collect()
        })
        .collect();
    Table {
        grid,
        ..state.table.clone()
    }
}

fn render_list(tables: &[UserTable]) -> String {
    let width = tables.iter().map(|t| t.name.chars().count()).max().unwrap_or(0).max(4);
    let mut out = format!("{:<width$}  {:<16}  ACCESS\n", "NAME", "OWNER", width = width);
    for t in tables {
        out.push_str(&format!(
            "{:<width$}  {:<16}  {}\n",
            t.name, t.owner, t.permissions, width = width
        ));
    }
    out
}

fn render(table: &Table) -> String {
    let mut out = String::new();
    let name = if table.name.is_empty() { "(untitled)" } else { &table.name };
    out.push_str(&format!(
        "{} [{}x{}]\n",
        name, table.dimensions.rows, table.dimensions.cols
    ));

    let cols = table.grid.first().map_or(0, Vec::len);
    if cols == 0 {
        return out;
    }

    let gutter = table.grid.len().to_string().len();
    let widths: Vec<usize> = (0..cols)
        .map(|c| {
            let label = column_label(c).len();
            table.grid.iter().map(|row| row[c].chars().count()).fold(label, usize::max)
        })
        .collect();

    out.push_str(&" ".repeat(gutter));
    for (c, w) in widths.iter().enumerate() {
        out.push_str(&format!(" | {:<w$}", column_label(c), w = w));
    }
    out.push('\n');

    for (r, row) in table.grid.iter().enumerate() {
        out.push_str(&format!("{:>gutter$}", r + 1, gutter = gutter));
        for (cell, w) in row.iter().zip(&widths) {
            out.push_str(&format!(" | {:<w$}", cell, w = w));
        }
        out.push('\n');
    }
    out
}

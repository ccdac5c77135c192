// gridshare CLI - headless table editor
//
// One live draft is kept in <config dir>/session.json between invocations.

mod edit;
mod exit_codes;
mod hub;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use gridshare_config::{Settings, HOME_ENV};
use gridshare_core::ViewMode;

use edit::Workspace;
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "gridshare")]
#[command(about = "Edit, save and share tables from the command line")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Directory holding settings, session and credentials
    #[arg(long, global = true, env = HOME_ENV, value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a bearer token for the table backend
    Login {
        /// API token (falls back to GRIDSHARE_TOKEN)
        #[arg(long, env = "GRIDSHARE_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Backend API base URL (defaults to hub.apiBase in settings.json)
        #[arg(long)]
        api_base: Option<String>,

        /// User id shown in messages
        #[arg(long)]
        user: Option<String>,
    },

    /// Forget saved credentials
    Logout,

    #[command(flatten)]
    Table(TableCommand),
}

/// Commands that work on the saved draft.
#[derive(Subcommand)]
enum TableCommand {
    /// Start a fresh, empty table
    New {
        /// Discard the current draft even if it has unsaved work
        #[arg(long)]
        force: bool,
    },

    /// Name the current table
    Name {
        name: String,
    },

    /// Change the table size; shrinking hides cells without deleting them
    #[command(after_help = "\
Examples:
  gridshare resize 3 4
  gridshare resize 1 4     # rows 2 and 3 are hidden, not lost
  gridshare resize 3 4     # ...and come back unchanged")]
    Resize {
        rows: usize,
        cols: usize,
    },

    /// Set one cell (rows and columns count from 1)
    Set {
        row: usize,
        col: usize,
        value: String,
    },

    /// Print the visible table
    Show {
        /// Print the table document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save the current table to the backend
    Save,

    /// Load a saved table into the draft
    Open {
        name: String,

        /// Discard the current draft even if it has unsaved work
        #[arg(long)]
        force: bool,
    },

    /// List tables you own or that were shared with you
    List {
        #[arg(long)]
        json: bool,
    },

    /// Share the saved table with other users
    Share {
        /// User to share with (repeatable)
        #[arg(long = "user", required = true, value_name = "ID")]
        users: Vec<String>,

        #[arg(long, value_enum, default_value = "read-only")]
        mode: ModeArg,
    },

    /// Download the current table's export as <name>.csv
    Download {
        /// Target directory (defaults to download.directory in settings.json)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    ReadOnly,
    Edit,
}

impl From<ModeArg> for ViewMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::ReadOnly => ViewMode::ReadOnly,
            ModeArg::Edit => ViewMode::Edit,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Login { token, api_base, user } => {
            let api_base = api_base.unwrap_or_else(|| Settings::load().api_base);
            hub::cmd_login(token, api_base, user)
        }
        Commands::Logout => hub::cmd_logout(),
        Commands::Table(command) => {
            let mut ws = Workspace::open();
            let result = match command {
                TableCommand::New { force } => ws.cmd_new(force),
                TableCommand::Name { name } => ws.cmd_name(name),
                TableCommand::Resize { rows, cols } => ws.cmd_resize(rows, cols),
                TableCommand::Set { row, col, value } => ws.cmd_set(row, col, value),
                TableCommand::Show { json } => ws.cmd_show(json),
                TableCommand::Save => ws.cmd_save(),
                TableCommand::Open { name, force } => ws.cmd_open(&name, force),
                TableCommand::List { json } => ws.cmd_list(json),
                TableCommand::Share { users, mode } => ws.cmd_share(users, mode.into()),
                TableCommand::Download { out } => ws.cmd_download(out),
            };
            // Written back even on failure: a rejected save keeps every edit.
            let closed = ws.close();
            result.and(closed)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Some(home) = &cli.home {
        std::env::set_var(HOME_ENV, home);
    }

    match run(cli.command) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

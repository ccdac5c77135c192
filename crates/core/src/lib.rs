//! Core of the gridshare table editor.
//!
//! A table has a declared size (`Dimensions`) and a backing grid that only
//! ever grows. The visible `Window` decides which part of the grid is shown
//! and persisted, so shrinking and re-growing a table never loses cells.
//!
//! No I/O here. The backend is reached through the [`TableBackend`] trait.

pub mod backend;
pub mod editor;
pub mod error;
pub mod filter;
pub mod form;
pub mod guard;
pub mod resize;
pub mod table;

pub use backend::TableBackend;
pub use editor::{Editor, Notification, NotificationKind};
pub use error::TableError;
pub use filter::{column_label, filter_for_persistence, table_exists, validate};
pub use form::{reduce, FormAction, FormState};
pub use guard::{has_hidden_data, has_name, should_block_navigation};
pub use resize::{resize, resize_cols, resize_rows};
pub use table::{
    Dimensions, Grid, ShareRequest, Table, UserTable, UserTableField, ViewMode, Window,
};

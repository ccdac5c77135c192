//! Form state container.
//!
//! Holds the live editing copy of a table, its visible window and the
//! lifecycle flags of the request in flight. Every change goes through
//! [`reduce`], which consumes the old state and returns the new one.

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::filter::filter_for_persistence;
use crate::resize::resize;
use crate::table::{Dimensions, Table, Window};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormState {
    pub table: Table,

    #[serde(rename = "toShow")]
    pub window: Window,

    /// A save or load is pending.
    #[serde(skip)]
    pub loading: bool,

    /// Message of the last rejected request; empty when none.
    #[serde(skip)]
    pub error: String,
}

/// Transitions of the form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    SetName(String),
    SetCell { row: usize, col: usize, value: String },
    SetDimensions(Dimensions),
    Clear,
    SavePending,
    SaveFulfilled,
    SaveRejected(String),
    LoadPending,
    LoadFulfilled(Table),
    LoadRejected(String),
}

impl FormAction {
    fn name(&self) -> &'static str {
        match self {
            FormAction::SetName(_) => "set_name",
            FormAction::SetCell { .. } => "set_cell",
            FormAction::SetDimensions(_) => "set_dimensions",
            FormAction::Clear => "clear",
            FormAction::SavePending => "save/pending",
            FormAction::SaveFulfilled => "save/fulfilled",
            FormAction::SaveRejected(_) => "save/rejected",
            FormAction::LoadPending => "load/pending",
            FormAction::LoadFulfilled(_) => "load/fulfilled",
            FormAction::LoadRejected(_) => "load/rejected",
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.table.dimensions
    }

    /// Apply one action, returning the next state.
    pub fn reduce(self, action: FormAction) -> Result<Self, TableError> {
        reduce(self, action)
    }

    /// The table as it is sent on save: only visible, non-blank rows.
    pub fn payload(&self) -> Table {
        Table {
            name: self.table.name.clone(),
            dimensions: self.table.dimensions,
            grid: filter_for_persistence(&self.table.grid, self.window),
            id: self.table.id.clone(),
        }
    }

    /// Visible cell text, or `None` outside the window.
    pub fn visible_cell(&self, row: usize, col: usize) -> Option<&str> {
        if row >= self.window.rows || col >= self.window.cols {
            return None;
        }
        self.table.cell(row, col)
    }
}

/// The reducer. An error leaves nothing half-applied: the failing branch
/// returns before any field of the new state is written.
pub fn reduce(mut state: FormState, action: FormAction) -> Result<FormState, TableError> {
    log::debug!("form: {}", action.name());

    match action {
        FormAction::SetName(name) => {
            state.table.name = name;
        }
        FormAction::SetCell { row, col, value } => {
            let Window { rows, cols } = state.window;
            let out_of_bounds = TableError::OutOfBounds { row, col, rows, cols };
            if row >= rows || col >= cols {
                return Err(out_of_bounds);
            }
            let cell = state
                .table
                .grid
                .get_mut(row)
                .and_then(|r| r.get_mut(col))
                .ok_or(out_of_bounds)?;
            *cell = value;
        }
        FormAction::SetDimensions(next) => {
            let prev = state.table.dimensions;
            let grid = std::mem::take(&mut state.table.grid);
            let (grid, window) = resize(grid, state.window, prev, next);
            state.table.grid = grid;
            state.window = window;
            state.table.dimensions = next;
        }
        FormAction::Clear => {
            state.table = Table::blank();
            state.window = Window::default();
        }
        FormAction::SavePending => {
            if state.loading {
                return Err(TableError::Busy);
            }
            state.loading = true;
        }
        FormAction::SaveFulfilled => {
            state.loading = false;
        }
        FormAction::SaveRejected(message) | FormAction::LoadRejected(message) => {
            state.error = message;
            state.loading = false;
        }
        FormAction::LoadPending => {
            state.loading = true;
        }
        FormAction::LoadFulfilled(mut table) => {
            pad_to_dimensions(&mut table);
            state.window = Window::from(table.dimensions);
            state.table = table;
            state.loading = false;
        }
    }

    Ok(state)
}

/// The backend stores filtered grids, so a loaded grid can be shorter or
/// narrower than its declared dimensions. Pad it with blank cells.
fn pad_to_dimensions(table: &mut Table) {
    let Dimensions { rows, cols } = table.dimensions;
    if table.grid.len() < rows {
        table.grid.resize_with(rows, Vec::new);
    }
    for row in table.grid.iter_mut() {
        if row.len() < cols {
            row.resize_with(cols, String::new);
        }
    }
}

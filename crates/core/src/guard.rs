// Unsaved-changes guard
//
// A heuristic, not a dirty check: editing a cell without touching the name
// or the dimensions is not detected.

use crate::form::FormState;

/// The table has been given a name.
pub fn has_name(state: &FormState) -> bool {
    !state.table.name.is_empty()
}

/// A dimension was set to zero while cells are still shown along it.
pub fn has_hidden_data(state: &FormState) -> bool {
    let dims = state.table.dimensions;
    (dims.rows == 0 && state.window.rows > 0) || (dims.cols == 0 && state.window.cols > 0)
}

/// Leaving the page should ask for confirmation first.
pub fn should_block_navigation(has_name: bool, has_data: bool) -> bool {
    has_name || has_data
}

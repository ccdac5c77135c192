// Validation and persistence filtering

use crate::table::{Grid, Table, UserTable, UserTableField, Window};

/// A table can be saved only under a non-blank name.
pub fn validate(table: &Table) -> bool {
    !table.name.trim().is_empty()
}

/// Cut the grid down to the visible window and drop blank rows.
///
/// This is the exact grid sent on save: cells hidden by an earlier shrink
/// are never persisted, and a row whose visible cells are all empty or
/// whitespace is left out. Kept rows stay in order.
pub fn filter_for_persistence(grid: &[Vec<String>], window: Window) -> Grid {
    grid.iter()
        .take(window.rows)
        .map(|row| row.iter().take(window.cols).cloned().collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect()
}

/// Whether any table summary has `value` in the given field.
pub fn table_exists(user_tables: &[UserTable], field: UserTableField, value: &str) -> bool {
    user_tables.iter().any(|t| t.field(field) == Some(value))
}

/// Zero-based column index to spreadsheet letters (0 → A, 26 → AA).
pub fn column_label(index: usize) -> String {
    let mut name = String::new();
    let mut n = index + 1;

    while n > 0 {
        n -= 1;
        name.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }

    name
}

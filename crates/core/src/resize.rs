//! Row/column resize reconciliation.
//!
//! The declared size and the backing grid are kept apart. Shrinking only
//! narrows the window; the cells stay in the grid. Growing either reveals
//! hidden cells or, when nothing is hidden, appends blank ones.
//!
//! The decision between the two growth paths is whether the window was at
//! the previous declared extent before the update. Rows are reconciled
//! before columns, with the pre-update column count, so that new rows get
//! the width the column pass expects to extend.

use crate::table::{Dimensions, Grid, Window};

/// Reconcile rows after the declared row count moves from `prev_rows` to
/// `new_rows`. New rows are `cols` blank cells wide.
pub fn resize_rows(
    mut grid: Grid,
    mut window: Window,
    prev_rows: usize,
    new_rows: usize,
    cols: usize,
) -> (Grid, Window) {
    if prev_rows > new_rows {
        window.rows = window.rows.saturating_sub(prev_rows - new_rows);
    } else if prev_rows < new_rows && window.rows == prev_rows {
        let added = new_rows - prev_rows;
        grid.extend((0..added).map(|_| vec![String::new(); cols]));
        window.rows = new_rows;
    } else {
        // Hidden rows from an earlier shrink: reveal, no new storage.
        window.rows += new_rows - prev_rows;
    }
    (grid, window)
}

/// Reconcile columns after the declared column count moves from `prev_cols`
/// to `new_cols`. Growth extends every row of the grid, hidden rows included.
pub fn resize_cols(
    mut grid: Grid,
    mut window: Window,
    prev_cols: usize,
    new_cols: usize,
) -> (Grid, Window) {
    if prev_cols > new_cols {
        window.cols = window.cols.saturating_sub(prev_cols - new_cols);
    } else if prev_cols < new_cols && window.cols == prev_cols {
        let added = new_cols - prev_cols;
        for row in grid.iter_mut() {
            row.extend(std::iter::repeat_with(String::new).take(added));
        }
        window.cols = new_cols;
    } else {
        window.cols += new_cols - prev_cols;
    }
    (grid, window)
}

/// Apply a full dimension change: rows first, then columns.
pub fn resize(grid: Grid, window: Window, prev: Dimensions, next: Dimensions) -> (Grid, Window) {
    let (grid, window) = resize_rows(grid, window, prev.rows, next.rows, prev.cols);
    resize_cols(grid, window, prev.cols, next.cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_grow_rows_from_empty() {
        let (g, w) = resize_rows(Vec::new(), Window::new(0, 0), 0, 2, 3);
        assert_eq!(g, grid(&[&["", "", ""], &["", "", ""]]));
        assert_eq!(w.rows, 2);
    }

    #[test]
    fn test_shrink_rows_keeps_storage() {
        let g = grid(&[&["a", "b"], &["c", "d"]]);
        let (g, w) = resize_rows(g, Window::new(2, 2), 2, 1, 2);
        assert_eq!(w.rows, 1);
        assert_eq!(g.len(), 2);
        assert_eq!(g[1], vec!["c", "d"]);
    }

    #[test]
    fn test_shrink_to_zero_rows() {
        let g = grid(&[&["a"], &["b"], &["c"]]);
        let (g, w) = resize_rows(g, Window::new(3, 1), 3, 0, 1);
        assert_eq!(w.rows, 0);
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn test_shrink_then_grow_rows_restores_cells() {
        let g = grid(&[&["a", "b"], &["c", "d"]]);
        let (g, w) = resize_rows(g, Window::new(2, 2), 2, 1, 2);
        let (g, w) = resize_rows(g, w, 1, 2, 2);
        assert_eq!(w.rows, 2);
        assert_eq!(g[0], vec!["a", "b"]);
        assert_eq!(g[1], vec!["c", "d"]);
    }

    #[test]
    fn test_grow_rows_reveals_hidden() {
        // Window narrower than the declared count: reveal, no append.
        let g = grid(&[&["a"], &["b"], &["c"]]);
        let (g, w) = resize_rows(g, Window::new(1, 1), 2, 3, 1);
        assert_eq!(w.rows, 2);
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn test_same_rows_is_noop() {
        let g = grid(&[&["a"]]);
        let (g2, w) = resize_rows(g.clone(), Window::new(1, 1), 1, 1, 1);
        assert_eq!(g2, g);
        assert_eq!(w, Window::new(1, 1));
    }

    #[test]
    fn test_grow_cols_full_window() {
        let g = grid(&[&["a", "b"]]);
        let (g, w) = resize_cols(g, Window::new(1, 2), 2, 4);
        assert_eq!(g, grid(&[&["a", "b", "", ""]]));
        assert_eq!(w.cols, 4);
    }

    #[test]
    fn test_grow_cols_extends_hidden_rows() {
        let g = grid(&[&["a"], &["b"]]);
        let (g, w) = resize_cols(g, Window::new(1, 1), 1, 2);
        assert_eq!(w.cols, 2);
        assert_eq!(g[1], vec!["b", ""]);
    }

    #[test]
    fn test_shrink_cols_keeps_storage() {
        let g = grid(&[&["a", "b", "c"]]);
        let (g, w) = resize_cols(g, Window::new(1, 3), 3, 1);
        assert_eq!(w.cols, 1);
        assert_eq!(g[0].len(), 3);
    }

    #[test]
    fn test_resize_rows_use_previous_width() {
        // 0x0 -> 2x3: rows are added 0 wide, then every row gains 3 cells.
        let (g, w) = resize(
            Vec::new(),
            Window::default(),
            Dimensions::new(0, 0),
            Dimensions::new(2, 3),
        );
        assert_eq!(g, grid(&[&["", "", ""], &["", "", ""]]));
        assert_eq!(w, Window::new(2, 3));
    }

    #[test]
    fn test_resize_grow_rows_shrink_cols() {
        let g = grid(&[&["a", "b"]]);
        let (g, w) = resize(g, Window::new(1, 2), Dimensions::new(1, 2), Dimensions::new(2, 1));
        assert_eq!(g, grid(&[&["a", "b"], &["", ""]]));
        assert_eq!(w, Window::new(2, 1));
    }

    #[test]
    fn test_shrink_regrow_cycles_append_storage() {
        // The window moves with the declared size, so each regrow takes the
        // append path and the backing grid keeps growing.
        let mut g = grid(&[&["a"], &["b"]]);
        let mut w = Window::new(2, 1);
        for _ in 0..100 {
            (g, w) = resize(g, w, Dimensions::new(2, 1), Dimensions::new(1, 1));
            (g, w) = resize(g, w, Dimensions::new(1, 1), Dimensions::new(2, 1));
        }
        assert_eq!(w, Window::new(2, 1));
        assert_eq!(g.len(), 102);
        assert_eq!(g[..2], grid(&[&["a"], &["b"]])[..]);
    }
}

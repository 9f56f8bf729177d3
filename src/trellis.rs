//! Trellis storage for the dynamic programs.
//!
//! [`ColumnIndex`] assigns each reachable state a column; [`Trellis`] is the
//! `(n + 1) x k` matrix of probabilities indexed by (symbols consumed, column).

use std::collections::BTreeSet;

use crate::state::StateId;

/// Marker for cells that have not been computed. Valid cells always hold a
/// probability in `[0, 1]`.
pub const UNSET: f64 = -1.0;

/// Slack allowed above 1.0 for accumulated rounding in a valid cell.
const CELL_SLACK: f64 = 1e-9;

/// Column assignment for one algorithm run: START is column 0, END is column
/// `k - 1`, reachable hidden states fill `1..k-1` in ascending id order.
#[derive(Clone, Debug)]
pub struct ColumnIndex {
    columns: Vec<StateId>,
    by_state: Vec<Option<usize>>,
}

impl ColumnIndex {
    /// Build from the reachable set. `reachable` must contain both `start`
    /// and `end`; `arena_len` bounds every id.
    pub fn new(
        reachable: &BTreeSet<StateId>,
        start: StateId,
        end: StateId,
        arena_len: usize,
    ) -> Self {
        let mut columns = Vec::with_capacity(reachable.len());
        columns.push(start);
        columns.extend(
            reachable
                .iter()
                .copied()
                .filter(|&s| s != start && s != end),
        );
        columns.push(end);

        let mut by_state = vec![None; arena_len];
        for (col, s) in columns.iter().enumerate() {
            by_state[s.index()] = Some(col);
        }
        Self { columns, by_state }
    }

    /// Number of columns `k`.
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[inline]
    pub fn end_column(&self) -> usize {
        self.columns.len() - 1
    }

    /// Columns of the hidden states, `1..k-1`.
    #[inline]
    pub fn hidden_columns(&self) -> std::ops::Range<usize> {
        1..self.end_column()
    }

    #[inline]
    pub fn state(&self, column: usize) -> StateId {
        self.columns[column]
    }

    /// Column of `state`, or `None` if it was not reachable.
    #[inline]
    pub fn column(&self, state: StateId) -> Option<usize> {
        self.by_state.get(state.index()).copied().flatten()
    }
}

/// Row-major `(rows x cols)` matrix of probabilities with an explicit unset
/// marker.
#[derive(Clone, Debug)]
pub struct Trellis {
    cols: usize,
    cells: Vec<f64>,
}

impl Trellis {
    /// A trellis for `symbols` observations over `cols` columns, with the base
    /// row set (`T[0][0] = 1`, `T[0][h] = 0`) and every other cell unset.
    pub fn new(symbols: usize, cols: usize) -> Self {
        let rows = symbols + 1;
        let mut cells = vec![UNSET; rows * cols];
        if cols > 0 {
            cells[..cols].fill(0.0);
            cells[0] = 1.0;
        }
        Self { cols, cells }
    }

    #[cfg(test)]
    fn rows(&self) -> usize {
        self.cells.len() / self.cols
    }

    #[cfg(test)]
    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.cols + col] != UNSET
    }

    /// Value of a computed cell.
    ///
    /// Reading an unset cell is a logic error in the caller and is caught in
    /// debug builds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let v = self.cells[row * self.cols + col];
        debug_assert!(v != UNSET, "read of unset trellis cell ({row}, {col})");
        v
    }

    /// Store a probability; each cell is written at most once.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(
            (0.0..=1.0 + CELL_SLACK).contains(&value),
            "trellis value {value} out of range at ({row}, {col})"
        );
        let cell = &mut self.cells[row * self.cols + col];
        debug_assert!(*cell == UNSET, "trellis cell ({row}, {col}) written twice");
        *cell = value;
    }

    /// Row `row` as a slice; unset cells read as [`UNSET`].
    #[cfg(test)]
    fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_end_pinned() {
        let reachable: BTreeSet<StateId> = [5, 0, 3, 9, 1].into_iter().map(StateId::new).collect();
        let idx = ColumnIndex::new(&reachable, StateId::new(3), StateId::new(1), 10);
        assert_eq!(idx.len(), 5);
        assert_eq!(idx.state(0), StateId::new(3));
        assert_eq!(idx.state(4), StateId::new(1));
        assert_eq!(
            idx.hidden_columns().map(|c| idx.state(c).index()).collect::<Vec<_>>(),
            vec![0, 5, 9]
        );
        assert_eq!(idx.column(StateId::new(9)), Some(3));
        assert_eq!(idx.column(StateId::new(7)), None);
        assert_eq!(idx.column(StateId::new(40)), None);
    }

    #[test]
    fn base_row_and_unset_cells() {
        let t = Trellis::new(3, 4);
        assert_eq!(t.rows(), 4);
        assert_eq!(t.cols(), 4);
        assert_eq!(t.row(0), &[1.0, 0.0, 0.0, 0.0]);
        assert!(t.row(1).iter().all(|&v| v == UNSET));
        assert!(!t.is_set(2, 1));
    }

    #[test]
    fn set_then_get() {
        let mut t = Trellis::new(1, 3);
        t.set(1, 1, 0.25);
        assert!(t.is_set(1, 1));
        assert_eq!(t.get(1, 1), 0.25);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    #[cfg(debug_assertions)]
    fn out_of_range_value_is_caught() {
        let mut t = Trellis::new(1, 3);
        t.set(1, 1, 1.5);
    }
}

//! Viterbi decoding: the single most probable state path.

use crate::engine::{HmmEngine, Prepared};
use crate::error::{HmmError, Result};
use crate::graph::StateGraph;
use crate::path::StatePath;
use crate::state::StateId;
use crate::traits::MaxProduct;
use crate::trellis::{ColumnIndex, Trellis};

/// Which trellis cells lie on some chain of existing edges from START of the
/// matching length, regardless of the edge weights.
struct Support {
    cols: usize,
    cells: Vec<bool>,
}

impl Support {
    fn new(graph: &StateGraph, index: &ColumnIndex, rows: usize) -> Self {
        let cols = index.len();
        let mut cells = vec![false; (rows + 1) * cols];
        cells[0] = true;
        for row in 1..=rows {
            for col in index.hidden_columns() {
                let reached = graph[index.state(col)].incoming().iter().any(|&p| {
                    index
                        .column(p)
                        .is_some_and(|pc| cells[(row - 1) * cols + pc])
                });
                cells[row * cols + col] = reached;
            }
        }
        Self { cols, cells }
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.cols + col]
    }
}

impl<R> HmmEngine<R> {
    /// Most probable path `START, s_1, .., s_n, END` for `observed`.
    ///
    /// The final hidden state is the one with the highest trellis value in the
    /// last row, taken only over hidden states that
    /// - have an edge into END (the weight of that edge does not enter the
    ///   choice), and
    /// - can be reached from START by a chain of exactly
    ///   `observed.chars().count()` existing edges.
    ///
    /// Hidden states failing either condition are never picked, even when
    /// their trellis value is the row maximum. Ties go to the lowest column. A
    /// path of probability zero is still returned as long as the graph has a
    /// walk of the right length.
    ///
    /// # Errors
    /// - [`HmmError::UnreachableEnd`],
    /// - [`HmmError::UnsupportedSymbol`],
    /// - [`HmmError::NoFeasiblePath`] if no walk START -> .. -> END emits
    ///   exactly `observed.chars().count()` symbols.
    pub fn viterbi(&self, observed: &str) -> Result<StatePath> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("viterbi", symbols = observed.chars().count());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let Prepared { symbols, index } = self.prepare(observed)?;
        let n = symbols.len();
        let (start, end) = (self.start(), self.end());
        let graph = self.graph();

        if n == 0 {
            if graph[start].transition(end).is_none() {
                return Err(HmmError::NoFeasiblePath { len: 0 });
            }
            return StatePath::new(graph, vec![start, end], &symbols);
        }

        let trellis = self.fill_trellis::<MaxProduct>(&index, &symbols);
        let support = Support::new(graph, &index, n);

        let last = index
            .hidden_columns()
            .filter(|&col| support.get(n, col) && graph[index.state(col)].transition(end).is_some())
            .fold(None, |best: Option<usize>, col| match best {
                Some(b) if trellis.get(n, b) >= trellis.get(n, col) => Some(b),
                _ => Some(col),
            })
            .ok_or(HmmError::NoFeasiblePath { len: n })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            state = %index.state(last),
            value = trellis.get(n, last),
            "viterbi terminal state"
        );

        let mut states = Vec::with_capacity(n + 2);
        states.push(end);
        let mut col = last;
        for row in (1..=n).rev() {
            let current = index.state(col);
            states.push(current);
            col = best_parent(graph, &trellis, &support, &index, row, current)
                .ok_or(HmmError::NoFeasiblePath { len: n })?;
        }
        debug_assert_eq!(col, 0, "traceback must end at START");
        states.push(start);
        states.reverse();

        StatePath::new(graph, states, &symbols)
    }
}

/// Column of the parent of `current` at `row - 1` maximizing
/// `V[row-1][p] * t(p -> current)` among supported cells; ties go to the
/// lowest column.
fn best_parent(
    graph: &StateGraph,
    trellis: &Trellis,
    support: &Support,
    index: &ColumnIndex,
    row: usize,
    current: StateId,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &parent in graph[current].incoming() {
        let Some(pc) = index.column(parent) else {
            continue;
        };
        if !support.get(row - 1, pc) {
            continue;
        }
        let value = trellis.get(row - 1, pc) * graph.transition(parent, current);
        best = match best {
            Some((bc, bv)) if bv > value || (bv == value && bc < pc) => Some((bc, bv)),
            _ => Some((pc, value)),
        };
    }
    best.map(|(col, _)| col)
}

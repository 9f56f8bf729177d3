//! Exhaustive enumeration of state paths.
//!
//! The number of walks grows as (branching factor)^n; this is a validation
//! tool for short sequences, never an inference path for real inputs.

use crate::engine::HmmEngine;
use crate::error::Result;
use crate::graph::StateGraph;
use crate::path::StatePath;
use crate::state::StateId;

impl<R> HmmEngine<R> {
    /// Every walk `START, s_1, .., s_n, END` through existing transitions,
    /// scored against `observed` and sorted by probability, highest first.
    /// Walks of equal probability keep their discovery order, which follows
    /// transitions in ascending target id.
    ///
    /// # Errors
    /// - [`HmmError::UnreachableEnd`](crate::HmmError::UnreachableEnd),
    /// - [`HmmError::UnsupportedSymbol`](crate::HmmError::UnsupportedSymbol).
    pub fn enumerate_paths(&self, observed: &str) -> Result<Vec<StatePath>> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("enumerate_paths", symbols = observed.chars().count());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let symbols = self.prepare(observed)?.symbols;
        let target_len = symbols.len() + 2;

        let mut walks = Vec::new();
        let mut walk = Vec::with_capacity(target_len);
        walk.push(self.start());
        collect_walks(self.graph(), self.end(), target_len, &mut walk, &mut walks);

        #[cfg(feature = "tracing")]
        tracing::debug!(walks = walks.len(), "enumerated state walks");

        let mut paths = walks
            .into_iter()
            .map(|states| StatePath::new(self.graph(), states, &symbols))
            .collect::<Result<Vec<_>>>()?;
        paths.sort_by(|a, b| b.probability().total_cmp(&a.probability()));
        Ok(paths)
    }
}

/// Depth-first extension of `walk` until it holds `target_len` states; walks
/// that end on `end` at that length are kept.
fn collect_walks(
    graph: &StateGraph,
    end: StateId,
    target_len: usize,
    walk: &mut Vec<StateId>,
    out: &mut Vec<Vec<StateId>>,
) {
    let Some(&current) = walk.last() else {
        return;
    };
    if walk.len() == target_len {
        if current == end {
            out.push(walk.clone());
        }
        return;
    }
    for &next in graph[current].transitions().keys() {
        walk.push(next);
        collect_walks(graph, end, target_len, walk, out);
        walk.pop();
    }
}

//! Inference engine over a normalized state graph.
//!
//! The engine owns a read-only [`StateGraph`] together with the random source
//! used by [`compose`](HmmEngine::compose). Every inference call:
//! 1. computes the states reachable from START and fails early if END is not
//!    among them,
//! 2. checks the observed symbols against the emission alphabet of the
//!    reachable hidden states,
//! 3. assigns trellis columns and runs its dynamic program.
//!
//! The algorithms themselves live in [`crate::algorithms`].

use std::collections::{BTreeSet, VecDeque};

use rand::rngs::StdRng;

use crate::builder::HmmEngineBuilder;
use crate::error::{HmmError, Result};
use crate::graph::StateGraph;
use crate::state::StateId;
use crate::traits::Recurrence;
use crate::trellis::{ColumnIndex, Trellis};

/// Inference and sampling over one hidden Markov model.
///
/// Typical usage:
/// ```
/// use hmm_graph::{HmmEngine, StateGraph, StateKind};
///
/// let mut g = StateGraph::new();
/// let start = g.add_state(StateKind::Start).unwrap();
/// let island = g.add_state(StateKind::Hidden).unwrap();
/// let end = g.add_state(StateKind::End).unwrap();
/// g.add_transition(start, island, 1.0).unwrap();
/// g.add_transition(island, island, 0.9).unwrap();
/// g.add_transition(island, end, 0.1).unwrap();
/// g.add_emission(island, 'C', 1.0).unwrap();
/// g.add_emission(island, 'G', 1.0).unwrap();
///
/// let engine = HmmEngine::builder(g).normalize(true).build().unwrap();
/// let p = engine.forward("CG").unwrap();
/// assert!((p - 0.9 * 0.1 * 0.25).abs() < 1e-12);
/// ```
pub struct HmmEngine<R = StdRng> {
    graph: StateGraph,
    start: StateId,
    end: StateId,
    rng: R,
    compose_limit: Option<usize>,
}

/// Inputs shared by the trellis algorithms after validation.
pub(crate) struct Prepared {
    pub(crate) symbols: Vec<char>,
    pub(crate) index: ColumnIndex,
}

impl HmmEngine<StdRng> {
    /// Start configuring an engine for `graph`.
    pub fn builder(graph: StateGraph) -> HmmEngineBuilder<StdRng> {
        HmmEngineBuilder::new(graph)
    }

    /// Engine with the default configuration; `graph` must already be
    /// normalized.
    pub fn new(graph: StateGraph) -> Result<Self> {
        HmmEngineBuilder::new(graph).build()
    }
}

impl<R> HmmEngine<R> {
    pub(crate) fn from_parts(
        graph: StateGraph,
        start: StateId,
        end: StateId,
        rng: R,
        compose_limit: Option<usize>,
    ) -> Self {
        Self {
            graph,
            start,
            end,
            rng,
            compose_limit,
        }
    }

    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn end(&self) -> StateId {
        self.end
    }

    pub fn compose_limit(&self) -> Option<usize> {
        self.compose_limit
    }

    /// Give back the graph, dropping the random source.
    pub fn into_graph(self) -> StateGraph {
        self.graph
    }

    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// States reachable from START by following transitions (breadth-first).
    pub fn reachable_states(&self) -> BTreeSet<StateId> {
        let mut visited = vec![false; self.graph.len()];
        let mut queue = VecDeque::new();
        visited[self.start.index()] = true;
        queue.push_back(self.start);

        while let Some(current) = queue.pop_front() {
            for &next in self.graph[current].transitions().keys() {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }

        visited
            .iter()
            .enumerate()
            .filter(|(_, &seen)| seen)
            .map(|(i, _)| StateId::new(i))
            .collect()
    }

    /// Reachable set, failing with [`HmmError::UnreachableEnd`] when END is
    /// not part of it.
    pub(crate) fn reachable_with_end(&self) -> Result<BTreeSet<StateId>> {
        let reachable = self.reachable_states();
        if reachable.contains(&self.end) {
            Ok(reachable)
        } else {
            Err(HmmError::UnreachableEnd)
        }
    }

    /// Emission alphabet of the reachable hidden states.
    pub(crate) fn alphabet(&self, reachable: &BTreeSet<StateId>) -> BTreeSet<char> {
        reachable
            .iter()
            .map(|&s| &self.graph[s])
            .filter(|s| s.is_hidden())
            .flat_map(|s| s.emissions().keys().copied())
            .collect()
    }

    /// Reachability, symbol validation and column assignment for `observed`.
    pub(crate) fn prepare(&self, observed: &str) -> Result<Prepared> {
        let reachable = self.reachable_with_end()?;
        let symbols: Vec<char> = observed.chars().collect();
        let alphabet = self.alphabet(&reachable);
        if let Some((position, &symbol)) = symbols
            .iter()
            .enumerate()
            .find(|(_, c)| !alphabet.contains(*c))
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(%symbol, position, "observation outside the emission alphabet");
            return Err(HmmError::UnsupportedSymbol { symbol, position });
        }
        let index = ColumnIndex::new(&reachable, self.start, self.end, self.graph.len());
        Ok(Prepared { symbols, index })
    }

    /// Bottom-up fill of the `(n + 1) x k` trellis under rule `Rec`.
    ///
    /// Row 0 is the base row. For rows `i >= 1` the START column is zero, the
    /// hidden columns follow the recurrence and the END column stays unset.
    pub(crate) fn fill_trellis<Rec: Recurrence>(
        &self,
        index: &ColumnIndex,
        symbols: &[char],
    ) -> Trellis {
        #[cfg(feature = "tracing")]
        let span = tracing::trace_span!(
            "fill_trellis",
            rule = Rec::NAME,
            rows = symbols.len() + 1,
            cols = index.len()
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut trellis = Trellis::new(symbols.len(), index.len());
        for (row, &symbol) in (1..).zip(symbols) {
            trellis.set(row, 0, 0.0);
            for col in index.hidden_columns() {
                let state = &self.graph[index.state(col)];
                let emit = state.emission(symbol).unwrap_or(0.0);
                let mut acc = Rec::identity();
                for &parent in state.incoming() {
                    let Some(parent_col) = index.column(parent) else {
                        continue;
                    };
                    let step = self.graph.transition(parent, state.id());
                    acc = Rec::combine(acc, trellis.get(row - 1, parent_col) * step);
                }
                trellis.set(row, col, emit * acc);
            }
        }
        trellis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateKind;
    use crate::traits::SumProduct;

    fn chain() -> StateGraph {
        // 0:START -> 1 -> 2 -> 4:END, 3 is disconnected
        let mut g = StateGraph::new();
        let s = g.add_state(StateKind::Start).unwrap();
        let a = g.add_state(StateKind::Hidden).unwrap();
        let b = g.add_state(StateKind::Hidden).unwrap();
        let orphan = g.add_state(StateKind::Hidden).unwrap();
        let e = g.add_state(StateKind::End).unwrap();
        g.add_transition(s, a, 1.0).unwrap();
        g.add_transition(a, b, 1.0).unwrap();
        g.add_transition(b, e, 1.0).unwrap();
        g.add_transition(orphan, a, 1.0).unwrap();
        g.add_emission(a, 'x', 1.0).unwrap();
        g.add_emission(b, 'y', 1.0).unwrap();
        g.add_emission(orphan, 'z', 1.0).unwrap();
        g.normalize_all().unwrap();
        g
    }

    #[test]
    fn bfs_skips_unreachable_states() {
        let engine = HmmEngine::new(chain()).unwrap();
        let reachable: Vec<usize> = engine.reachable_states().iter().map(|s| s.index()).collect();
        assert_eq!(reachable, vec![0, 1, 2, 4]);
    }

    #[test]
    fn symbols_of_unreachable_states_are_unsupported() {
        let engine = HmmEngine::new(chain()).unwrap();
        let err = engine.prepare("xz").err().unwrap();
        assert_eq!(
            err,
            HmmError::UnsupportedSymbol {
                symbol: 'z',
                position: 1
            }
        );
        let prepared = engine.prepare("xy").unwrap();
        assert_eq!(prepared.index.len(), 4);
        assert_eq!(prepared.symbols, vec!['x', 'y']);
    }

    #[test]
    fn trellis_ignores_unreachable_parents() {
        let engine = HmmEngine::new(chain()).unwrap();
        let Prepared { symbols, index } = engine.prepare("xy").unwrap();
        let t = engine.fill_trellis::<SumProduct>(&index, &symbols);
        assert_eq!(t.get(1, 1), 1.0);
        assert_eq!(t.get(1, 2), 0.0);
        assert_eq!(t.get(2, 1), 0.0);
        assert_eq!(t.get(2, 2), 1.0);
        assert_eq!(t.get(2, 0), 0.0);
        assert!(!t.is_set(2, index.end_column()));
    }
}

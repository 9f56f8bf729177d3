//! Configuration for [`HmmEngine`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{HmmError, Result};
use crate::graph::StateGraph;
use crate::state::StateKind;
use crate::HmmEngine;

/// Seed of the default random source.
pub const DEFAULT_SEED: u64 = 0;

/// Builder for [`HmmEngine`].
///
/// ```
/// use hmm_graph::{HmmEngineBuilder, StateGraph, StateKind};
///
/// let mut g = StateGraph::new();
/// let s = g.add_state(StateKind::Start).unwrap();
/// let h = g.add_state(StateKind::Hidden).unwrap();
/// let e = g.add_state(StateKind::End).unwrap();
/// g.add_transition(s, h, 1.0).unwrap();
/// g.add_transition(h, e, 1.0).unwrap();
/// g.add_emission(h, 'A', 1.0).unwrap();
///
/// let mut engine = HmmEngineBuilder::new(g)
///     .with_seed(13)
///     .normalize(true)
///     .with_compose_limit(1_000)
///     .build()
///     .unwrap();
/// assert_eq!(engine.compose().unwrap(), "A");
/// ```
pub struct HmmEngineBuilder<R = StdRng> {
    graph: StateGraph,
    rng: R,
    normalize: bool,
    compose_limit: Option<usize>,
}

impl HmmEngineBuilder<StdRng> {
    pub fn new(graph: StateGraph) -> Self {
        Self {
            graph,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
            normalize: false,
            compose_limit: None,
        }
    }

    /// Seed the default random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl<R: Rng> HmmEngineBuilder<R> {
    /// Replace the random source used by `compose`.
    pub fn with_rng<R2: Rng>(self, rng: R2) -> HmmEngineBuilder<R2> {
        HmmEngineBuilder {
            graph: self.graph,
            rng,
            normalize: self.normalize,
            compose_limit: self.compose_limit,
        }
    }

    /// Normalize every state while building.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Fail `compose` once it has emitted more than `limit` symbols.
    pub fn with_compose_limit(mut self, limit: usize) -> Self {
        self.compose_limit = Some(limit);
        self
    }

    /// # Errors
    /// - [`HmmError::MissingTerminal`] if the graph lacks START or END,
    /// - any error of [`StateGraph::normalize_all`] when normalizing,
    /// - [`HmmError::NotNormalized`] naming the first state whose tables were
    ///   never normalized (or changed since).
    pub fn build(self) -> Result<HmmEngine<R>> {
        let mut graph = self.graph;
        let start = graph
            .start()
            .ok_or(HmmError::MissingTerminal(StateKind::Start))?;
        let end = graph.end().ok_or(HmmError::MissingTerminal(StateKind::End))?;
        if self.normalize {
            graph.normalize_all()?;
        }
        if let Some(stale) = graph.states().find(|s| !s.is_normalized()) {
            return Err(HmmError::NotNormalized(stale.id()));
        }
        Ok(HmmEngine::from_parts(
            graph,
            start,
            end,
            self.rng,
            self.compose_limit,
        ))
    }
}

//! Joint probability of one state path producing one observed sequence.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{HmmError, Result};
use crate::graph::StateGraph;
use crate::state::StateId;
use crate::utils::TotalF64;

/// Scores concrete state paths against a graph's current tables.
#[derive(Clone, Copy, Debug)]
pub struct PathScorer<'g> {
    graph: &'g StateGraph,
}

impl<'g> PathScorer<'g> {
    pub fn new(graph: &'g StateGraph) -> Self {
        Self { graph }
    }

    /// `log P = sum_i ln e(s_i, o_i) + sum_i ln t(s_i -> s_{i+1})` for
    /// `states = [START, s_1, .., s_n, END]` and `symbols = [o_1, .., o_n]`.
    ///
    /// Missing transitions or emissions count as probability zero, so the
    /// result is `-inf` for paths the model cannot produce.
    ///
    /// # Errors
    /// [`HmmError::PathLength`] unless `states.len() == symbols.len() + 2`.
    pub fn log_joint_probability(&self, states: &[StateId], symbols: &[char]) -> Result<f64> {
        let expected = symbols.len() + 2;
        if states.len() != expected {
            return Err(HmmError::PathLength {
                expected,
                actual: states.len(),
            });
        }
        let log_emit: f64 = symbols
            .iter()
            .zip(&states[1..])
            .map(|(&sym, &s)| self.graph.emission(s, sym).ln())
            .sum();
        let log_trans: f64 = states
            .windows(2)
            .map(|w| self.graph.transition(w[0], w[1]).ln())
            .sum();
        Ok(log_emit + log_trans)
    }

    /// `exp` of [`log_joint_probability`](Self::log_joint_probability).
    pub fn joint_probability(&self, states: &[StateId], symbols: &[char]) -> Result<f64> {
        self.log_joint_probability(states, symbols).map(f64::exp)
    }
}

/// A state path from START to END inclusive, with its joint probability for
/// the observed sequence it was scored against.
///
/// Ordering is ascending by probability; equal probabilities fall back to the
/// state sequence so that `Ord` agrees with `Eq`.
#[derive(Clone, Debug)]
pub struct StatePath {
    states: Vec<StateId>,
    probability: f64,
}

impl StatePath {
    /// Score `states` against `observed` using the graph's current tables.
    pub fn new(graph: &StateGraph, states: Vec<StateId>, observed: &[char]) -> Result<Self> {
        let probability = PathScorer::new(graph).joint_probability(&states, observed)?;
        Ok(Self {
            states,
            probability,
        })
    }

    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Number of states, START and END included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> Option<StateId> {
        self.states.first().copied()
    }

    pub fn last(&self) -> Option<StateId> {
        self.states.last().copied()
    }
}

impl PartialEq for StatePath {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StatePath {}

impl PartialOrd for StatePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StatePath {
    fn cmp(&self, other: &Self) -> Ordering {
        TotalF64(self.probability)
            .cmp(&TotalF64(other.probability))
            .then_with(|| self.states.cmp(&other.states))
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, s) in self.states.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{s}")?;
        }
        write!(f, "] p = {}", self.probability)
    }
}

/// Total probability mass of `paths`.
pub fn sum_path_probabilities(paths: &[StatePath]) -> f64 {
    paths.iter().map(StatePath::probability).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateKind;

    fn coin_graph() -> (StateGraph, [StateId; 4]) {
        let mut g = StateGraph::new();
        let s = g.add_state(StateKind::Start).unwrap();
        let fair = g.add_state(StateKind::Hidden).unwrap();
        let loaded = g.add_state(StateKind::Hidden).unwrap();
        let e = g.add_state(StateKind::End).unwrap();
        g.add_transition(s, fair, 0.5).unwrap();
        g.add_transition(s, loaded, 0.5).unwrap();
        g.add_transition(fair, fair, 0.8).unwrap();
        g.add_transition(fair, e, 0.2).unwrap();
        g.add_transition(loaded, fair, 0.5).unwrap();
        g.add_transition(loaded, e, 0.5).unwrap();
        g.add_emission(fair, 'H', 0.5).unwrap();
        g.add_emission(fair, 'T', 0.5).unwrap();
        g.add_emission(loaded, 'H', 0.9).unwrap();
        g.add_emission(loaded, 'T', 0.1).unwrap();
        g.normalize_all().unwrap();
        (g, [s, fair, loaded, e])
    }

    #[test]
    fn joint_probability_multiplies_edges_and_emissions() {
        let (g, [s, fair, loaded, e]) = coin_graph();
        let p = StatePath::new(&g, vec![s, loaded, fair, e], &['H', 'T']).unwrap();
        let expected = 0.5 * 0.9 * 0.5 * 0.5 * 0.2;
        assert!((p.probability() - expected).abs() < 1e-12);
        assert_eq!(p.len(), 4);
        assert_eq!(p.first(), Some(s));
        assert_eq!(p.last(), Some(e));
    }

    #[test]
    fn missing_edge_scores_zero() {
        let (g, [s, fair, loaded, e]) = coin_graph();
        // fair -> loaded does not exist
        let p = StatePath::new(&g, vec![s, fair, loaded, e], &['H', 'H']).unwrap();
        assert_eq!(p.probability(), 0.0);
        let log_p = PathScorer::new(&g)
            .log_joint_probability(p.states(), &['H', 'H'])
            .unwrap();
        assert_eq!(log_p, f64::NEG_INFINITY);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let (g, [s, fair, _, e]) = coin_graph();
        assert_eq!(
            StatePath::new(&g, vec![s, fair, e], &['H', 'T']).unwrap_err(),
            HmmError::PathLength {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn ordering_and_display() {
        let (g, [s, fair, loaded, e]) = coin_graph();
        let a = StatePath::new(&g, vec![s, fair, e], &['H']).unwrap();
        let b = StatePath::new(&g, vec![s, loaded, e], &['H']).unwrap();
        assert!(a < b);
        let mut v = vec![b.clone(), a.clone()];
        v.sort();
        assert_eq!(v, vec![a.clone(), b.clone()]);
        assert!((sum_path_probabilities(&v) - (0.5 * 0.5 * 0.2 + 0.5 * 0.9 * 0.5)).abs() < 1e-12);
        assert!(a.to_string().starts_with("[0, 1, 3] p = "));
    }
}

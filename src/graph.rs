//! The state graph: an arena of states plus their transition and emission
//! tables.
//!
//! A graph is built in a setup phase (add states, transitions, emissions),
//! normalized once, and then handed to [`HmmEngine`](crate::HmmEngine), which
//! treats it as read-only.
//!
//! Every mutating call validates its arguments before touching the graph, so a
//! rejected call leaves the graph exactly as it was.

use std::ops::Index;

use crate::distribution::CumulativeDistribution;
use crate::error::{HmmError, Result, Table};
use crate::state::{State, StateId, StateKind};
use crate::utils::is_unit_sum;

/// Arena of model states.
#[derive(Clone, Debug, Default)]
pub struct StateGraph {
    states: Vec<State>,
    start: Option<StateId>,
    end: Option<StateId>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state and return its id. Ids are handed out sequentially.
    ///
    /// # Errors
    /// [`HmmError::DuplicateTerminal`] when adding a second START or END state.
    pub fn add_state(&mut self, kind: StateKind) -> Result<StateId> {
        let id = StateId::new(self.states.len());
        match kind {
            StateKind::Start if self.start.is_some() => {
                return Err(HmmError::DuplicateTerminal(kind))
            }
            StateKind::End if self.end.is_some() => return Err(HmmError::DuplicateTerminal(kind)),
            StateKind::Start => self.start = Some(id),
            StateKind::End => self.end = Some(id),
            StateKind::Hidden => {}
        }
        self.states.push(State::new(id, kind));
        Ok(id)
    }

    /// Register (or overwrite) the raw weight of `source -> target` and record
    /// `source` among `target`'s incoming states.
    ///
    /// # Errors
    /// - [`HmmError::UnknownState`] if either id is not in this graph,
    /// - [`HmmError::TransitionFromEnd`] if `source` is the END state,
    /// - [`HmmError::InvalidProbability`] for negative or non-finite weights.
    pub fn add_transition(&mut self, source: StateId, target: StateId, weight: f64) -> Result<()> {
        let src = self.get(source).ok_or(HmmError::UnknownState(source))?;
        self.get(target).ok_or(HmmError::UnknownState(target))?;
        if src.kind() == StateKind::End {
            return Err(HmmError::TransitionFromEnd(source));
        }
        check_weight(source, weight)?;

        let src = &mut self.states[source.index()];
        src.transitions.insert(target, weight);
        src.transition_sampler = None;
        self.states[target.index()].incoming.insert(source);
        Ok(())
    }

    /// Register (or overwrite) the raw weight of `state` emitting `symbol`.
    ///
    /// # Errors
    /// - [`HmmError::UnknownState`] if `state` is not in this graph,
    /// - [`HmmError::EmissionOnTerminal`] for START and END states,
    /// - [`HmmError::InvalidProbability`] for negative or non-finite weights.
    pub fn add_emission(&mut self, state: StateId, symbol: char, weight: f64) -> Result<()> {
        let s = self.get(state).ok_or(HmmError::UnknownState(state))?;
        if !s.is_hidden() {
            return Err(HmmError::EmissionOnTerminal {
                state,
                kind: s.kind(),
            });
        }
        check_weight(state, weight)?;

        let s = &mut self.states[state.index()];
        s.emissions.insert(symbol, weight);
        s.emission_sampler = None;
        Ok(())
    }

    /// Rescale the transition weights of `state` to sum to one, then do the
    /// same, independently, for its emission weights. Empty tables are left
    /// empty. Builds the cumulative tables used by sampling.
    ///
    /// # Errors
    /// - [`HmmError::UnknownState`] if `state` is not in this graph,
    /// - [`HmmError::DegenerateDistribution`] if a non-empty table sums to zero
    ///   or its sum overflows.
    pub fn normalize(&mut self, state: StateId) -> Result<()> {
        let s = self.get(state).ok_or(HmmError::UnknownState(state))?;
        let transition_sum: f64 = s.transitions.values().sum();
        let emission_sum: f64 = s.emissions.values().sum();
        if !s.transitions.is_empty() && !is_usable_sum(transition_sum) {
            return Err(HmmError::DegenerateDistribution {
                state,
                table: Table::Transitions,
            });
        }
        if !s.emissions.is_empty() && !is_usable_sum(emission_sum) {
            return Err(HmmError::DegenerateDistribution {
                state,
                table: Table::Emissions,
            });
        }

        let s = &mut self.states[state.index()];
        if !s.transitions.is_empty() {
            s.transitions.values_mut().for_each(|p| *p /= transition_sum);
        }
        if !s.emissions.is_empty() {
            s.emissions.values_mut().for_each(|p| *p /= emission_sum);
        }
        s.transition_sampler = Some(CumulativeDistribution::from_weights(
            s.transitions.iter().map(|(&t, &p)| (t, p)),
        ));
        s.emission_sampler = Some(CumulativeDistribution::from_weights(
            s.emissions.iter().map(|(&c, &p)| (c, p)),
        ));
        Ok(())
    }

    /// Normalize every state in arena order, stopping at the first failure.
    pub fn normalize_all(&mut self) -> Result<()> {
        for idx in 0..self.states.len() {
            self.normalize(StateId::new(idx))?;
        }
        Ok(())
    }

    /// True if every non-empty table sums to one within `tolerance`.
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        self.states.iter().all(|s| {
            (s.transitions.is_empty() || is_unit_sum(s.transitions.values(), tolerance))
                && (s.emissions.is_empty() || is_unit_sum(s.emissions.values(), tolerance))
        })
    }

    #[inline]
    pub fn get(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    pub fn start(&self) -> Option<StateId> {
        self.start
    }

    pub fn end(&self) -> Option<StateId> {
        self.end
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All states in arena order.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.iter()
    }

    /// Weight of `source -> target`; 0.0 when no such transition exists.
    #[inline]
    pub fn transition(&self, source: StateId, target: StateId) -> f64 {
        self.get(source)
            .and_then(|s| s.transition(target))
            .unwrap_or(0.0)
    }

    /// Weight of `state` emitting `symbol`; 0.0 when absent.
    #[inline]
    pub fn emission(&self, state: StateId, symbol: char) -> f64 {
        self.get(state)
            .and_then(|s| s.emission(symbol))
            .unwrap_or(0.0)
    }
}

impl Index<StateId> for StateGraph {
    type Output = State;

    /// # Panics
    /// Panics if `id` was not issued by this graph.
    fn index(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }
}

/// A sum that can divide every weight into a distribution.
fn is_usable_sum(sum: f64) -> bool {
    sum.is_finite() && sum > 0.0
}

fn check_weight(state: StateId, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(HmmError::InvalidProbability { state, value })
    }
}

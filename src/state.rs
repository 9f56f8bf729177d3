//! States of the model graph.
//!
//! A [`State`] is stored in the arena of a [`StateGraph`](crate::graph::StateGraph)
//! and referred to everywhere else by its [`StateId`], a plain arena index.
//! Transition, back-reference and emission tables are ordered maps, so every
//! traversal of a state's edges visits them in arena order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::distribution::CumulativeDistribution;

/// Arena index of a state. Equality, hashing and ordering are those of the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

impl StateId {
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the state in its graph's arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a state in the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Sole origin of every path; never emits.
    Start,
    /// Emitting state.
    Hidden,
    /// Terminal state; no outgoing transitions, never emits.
    End,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateKind::Start => "START",
            StateKind::Hidden => "HIDDEN",
            StateKind::End => "END",
        };
        f.write_str(name)
    }
}

/// One vertex of the model graph together with its outgoing edges.
#[derive(Clone, Debug)]
pub struct State {
    id: StateId,
    kind: StateKind,
    pub(crate) transitions: BTreeMap<StateId, f64>,
    /// States holding a transition into this one.
    pub(crate) incoming: BTreeSet<StateId>,
    pub(crate) emissions: BTreeMap<char, f64>,
    pub(crate) transition_sampler: Option<CumulativeDistribution<StateId>>,
    pub(crate) emission_sampler: Option<CumulativeDistribution<char>>,
}

impl State {
    pub(crate) fn new(id: StateId, kind: StateKind) -> Self {
        Self {
            id,
            kind,
            transitions: BTreeMap::new(),
            incoming: BTreeSet::new(),
            emissions: BTreeMap::new(),
            transition_sampler: None,
            emission_sampler: None,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    pub fn is_hidden(&self) -> bool {
        self.kind == StateKind::Hidden
    }

    /// Outgoing transition weights keyed by target.
    pub fn transitions(&self) -> &BTreeMap<StateId, f64> {
        &self.transitions
    }

    /// Emission weights keyed by symbol.
    pub fn emissions(&self) -> &BTreeMap<char, f64> {
        &self.emissions
    }

    /// States that hold a transition into this state.
    pub fn incoming(&self) -> &BTreeSet<StateId> {
        &self.incoming
    }

    /// Weight of the transition to `target`, if one was added.
    #[inline]
    pub fn transition(&self, target: StateId) -> Option<f64> {
        self.transitions.get(&target).copied()
    }

    /// Weight of emitting `symbol`, if one was added.
    #[inline]
    pub fn emission(&self, symbol: char) -> Option<f64> {
        self.emissions.get(&symbol).copied()
    }

    /// True once `normalize` has built the sampling tables and nothing has
    /// been added since.
    pub fn is_normalized(&self) -> bool {
        self.transition_sampler.is_some() && self.emission_sampler.is_some()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[HMM state, id = {}, kind = {}]", self.id, self.kind)
    }
}

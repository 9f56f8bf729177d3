//! Hidden Markov models as explicit state graphs.
//!
//! This crate models a discrete-time HMM as a graph of states with a single
//! START and a single END state, and runs exact inference and stochastic
//! simulation over it.
//!
//! ## Core idea
//! 1. Build a [`StateGraph`]: add states, raw transition and emission weights.
//! 2. Normalize it, once, so each state's tables become distributions.
//! 3. Hand it to an [`HmmEngine`] and query it with observed symbol strings.
//!
//! ## Quick start
//! ```
//! use hmm_graph::{HmmEngine, StateGraph, StateKind};
//!
//! let mut g = StateGraph::new();
//! let start = g.add_state(StateKind::Start).unwrap();
//! let coding = g.add_state(StateKind::Hidden).unwrap();
//! let noncoding = g.add_state(StateKind::Hidden).unwrap();
//! let end = g.add_state(StateKind::End).unwrap();
//!
//! g.add_transition(start, noncoding, 0.49).unwrap();
//! g.add_transition(start, coding, 0.49).unwrap();
//! g.add_transition(start, end, 0.02).unwrap();
//! g.add_transition(coding, coding, 0.4).unwrap();
//! g.add_transition(coding, end, 0.3).unwrap();
//! g.add_transition(coding, noncoding, 0.3).unwrap();
//! g.add_transition(noncoding, noncoding, 0.3).unwrap();
//! g.add_transition(noncoding, coding, 0.35).unwrap();
//! g.add_transition(noncoding, end, 0.35).unwrap();
//! for (sym, p) in [('A', 0.18), ('C', 0.32), ('G', 0.32), ('T', 0.18)] {
//!     g.add_emission(coding, sym, p).unwrap();
//!     g.add_emission(noncoding, sym, 0.25).unwrap();
//! }
//!
//! let mut engine = HmmEngine::builder(g).with_seed(13).normalize(true).build().unwrap();
//!
//! let best = engine.viterbi("AGCG").unwrap();
//! let all = engine.enumerate_paths("AGCG").unwrap();
//! assert_eq!(best.states(), all[0].states());
//!
//! let total = engine.forward("AGCG").unwrap();
//! assert!((total - hmm_graph::sum_path_probabilities(&all)).abs() < 1e-12);
//!
//! let sampled = engine.compose().unwrap();
//! assert!(sampled.chars().all(|c| "ACGT".contains(c)));
//! ```
//!
//! ## Operations
//! - [`HmmEngine::reachable_states`]: breadth-first reachability from START.
//! - [`HmmEngine::viterbi`]: most probable state path.
//! - [`HmmEngine::forward`]: total probability of the observations.
//! - [`HmmEngine::enumerate_paths`]: every path, scored, highest first; for
//!   validating the dynamic programs on short inputs.
//! - [`HmmEngine::compose`]: sample an observation sequence.
//!
//! With the `tracing` feature enabled each operation runs inside a span.

pub mod algorithms;
pub mod builder;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod graph;
pub mod path;
pub mod state;
pub mod traits;
pub mod trellis;
pub mod utils;

pub use crate::builder::HmmEngineBuilder;
pub use crate::engine::HmmEngine;
pub use crate::error::{HmmError, Result, Table};
pub use crate::graph::StateGraph;
pub use crate::path::{sum_path_probabilities, PathScorer, StatePath};
pub use crate::state::{State, StateId, StateKind};
pub use crate::traits::Recurrence;

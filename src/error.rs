//! Error taxonomy for graph construction, inference and sampling.

use thiserror::Error;

use crate::state::{StateId, StateKind};

/// Which probability table of a state an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Outgoing state transitions.
    Transitions,
    /// Symbol emissions.
    Emissions,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Table::Transitions => f.write_str("transition"),
            Table::Emissions => f.write_str("emission"),
        }
    }
}

/// Every failure the engine reports. All errors are returned synchronously to
/// the caller of the failing operation; nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HmmError {
    /// END states may not have outgoing transitions.
    #[error("invalid topology: end state {0} may not have outgoing transitions")]
    TransitionFromEnd(StateId),

    /// START and END states may not emit symbols.
    #[error("invalid topology: {kind} state {state} may not have emissions")]
    EmissionOnTerminal { state: StateId, kind: StateKind },

    /// A model holds exactly one START and one END state.
    #[error("invalid topology: the model already has a {0} state")]
    DuplicateTerminal(StateKind),

    /// The graph has no START or no END state.
    #[error("invalid topology: the model has no {0} state")]
    MissingTerminal(StateKind),

    /// The id does not name a state of this graph.
    #[error("invalid topology: unknown state {0}")]
    UnknownState(StateId),

    /// Weights must be finite and non-negative.
    #[error("invalid probability {value} on state {state}")]
    InvalidProbability { state: StateId, value: f64 },

    /// A non-empty table whose weights sum to zero, or overflow to infinity,
    /// cannot be normalized.
    #[error("degenerate distribution: {table} weights of state {state} sum to zero or overflow")]
    DegenerateDistribution { state: StateId, table: Table },

    /// Sampling tables are built by `normalize`; this state was never
    /// normalized or was modified afterwards.
    #[error("state {0} is not normalized")]
    NotNormalized(StateId),

    /// END cannot be reached from START by following transitions.
    #[error("end state is unreachable from the start state")]
    UnreachableEnd,

    /// No reachable hidden state can emit this symbol.
    #[error("unsupported observation symbol {symbol:?} at position {position}")]
    UnsupportedSymbol { symbol: char, position: usize },

    /// A weighted draw walked off the end of a normalized distribution.
    #[error("sampling exhausted the {table} distribution of state {state}")]
    ExhaustedSampling { state: StateId, table: Table },

    /// The graph has no walk START -> ... -> END emitting exactly `len` symbols.
    #[error("no state path emits exactly {len} symbols")]
    NoFeasiblePath { len: usize },

    /// A state path must hold START, one state per symbol, and END.
    #[error("state path has {actual} states, expected {expected}")]
    PathLength { expected: usize, actual: usize },

    /// `compose` emitted more symbols than the configured limit.
    #[error("composition exceeded the limit of {limit} symbols")]
    ComposeLimitExceeded { limit: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HmmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_state() {
        let err = HmmError::DegenerateDistribution {
            state: StateId::new(2),
            table: Table::Emissions,
        };
        assert_eq!(
            err.to_string(),
            "degenerate distribution: emission weights of state 2 sum to zero or overflow"
        );
        let err = HmmError::EmissionOnTerminal {
            state: StateId::new(0),
            kind: StateKind::Start,
        };
        assert!(err.to_string().contains("START state 0"));
    }

    #[test]
    fn unsupported_symbol_is_quoted() {
        let err = HmmError::UnsupportedSymbol {
            symbol: 'X',
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "unsupported observation symbol 'X' at position 3"
        );
    }
}

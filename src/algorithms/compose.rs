//! Random sequence generation.

use rand::Rng;

use crate::engine::HmmEngine;
use crate::error::{HmmError, Result, Table};
use crate::state::StateId;

impl<R: Rng> HmmEngine<R> {
    /// Walk the model from START, sampling each next state from the current
    /// state's transitions and, for every hidden state entered, one symbol
    /// from its emissions. Returns the emitted symbols once END is entered.
    ///
    /// Each draw is a uniform value in `[0, 1)` mapped through the cumulative
    /// table built at normalization, so a fixed seed reproduces the output.
    ///
    /// # Errors
    /// - [`HmmError::UnreachableEnd`],
    /// - [`HmmError::NotNormalized`] for a state without sampling tables,
    /// - [`HmmError::ExhaustedSampling`] when a draw selects nothing,
    /// - [`HmmError::ComposeLimitExceeded`] past the configured limit.
    pub fn compose(&mut self) -> Result<String> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("compose");
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        self.reachable_with_end()?;
        let (start, end) = (self.start(), self.end());
        let limit = self.compose_limit();

        let mut out = String::new();
        let mut emitted = 0usize;
        let mut current = start;
        loop {
            current = self.sample_transition(current)?;
            if current == end {
                return Ok(out);
            }
            if let Some(limit) = limit {
                if emitted >= limit {
                    return Err(HmmError::ComposeLimitExceeded { limit });
                }
            }
            out.push(self.sample_emission(current)?);
            emitted += 1;
        }
    }

    fn sample_transition(&mut self, state: StateId) -> Result<StateId> {
        let u: f64 = self.rng_mut().gen();
        let sampler = self.graph()[state]
            .transition_sampler
            .as_ref()
            .ok_or(HmmError::NotNormalized(state))?;
        sampler.sample(u).ok_or(HmmError::ExhaustedSampling {
            state,
            table: Table::Transitions,
        })
    }

    fn sample_emission(&mut self, state: StateId) -> Result<char> {
        let u: f64 = self.rng_mut().gen();
        let sampler = self.graph()[state]
            .emission_sampler
            .as_ref()
            .ok_or(HmmError::NotNormalized(state))?;
        sampler.sample(u).ok_or(HmmError::ExhaustedSampling {
            state,
            table: Table::Emissions,
        })
    }
}

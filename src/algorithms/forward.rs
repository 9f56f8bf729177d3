//! Forward algorithm: probability of the observations summed over all paths.

use crate::engine::{HmmEngine, Prepared};
use crate::error::Result;
use crate::traits::SumProduct;

impl<R> HmmEngine<R> {
    /// Total probability that the model emits `observed` and then terminates.
    ///
    /// The last trellis row is closed off through the transitions into END.
    /// The direct START -> END edge is left out of that sum, so an empty
    /// observation yields 0.0 regardless of its weight.
    ///
    /// # Errors
    /// - [`HmmError::UnreachableEnd`](crate::HmmError::UnreachableEnd),
    /// - [`HmmError::UnsupportedSymbol`](crate::HmmError::UnsupportedSymbol).
    pub fn forward(&self, observed: &str) -> Result<f64> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("forward", symbols = observed.chars().count());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let Prepared { symbols, index } = self.prepare(observed)?;
        let n = symbols.len();
        if n == 0 {
            return Ok(0.0);
        }

        let trellis = self.fill_trellis::<SumProduct>(&index, &symbols);
        let end = self.end();
        let total = self.graph()[end]
            .incoming()
            .iter()
            .filter(|&&parent| parent != self.start())
            .filter_map(|&parent| index.column(parent).map(|col| (parent, col)))
            .map(|(parent, col)| trellis.get(n, col) * self.graph().transition(parent, end))
            .sum();
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use crate::{HmmEngine, StateGraph, StateKind};

    #[test]
    fn two_state_closed_form() {
        let mut g = StateGraph::new();
        let s = g.add_state(StateKind::Start).unwrap();
        let a = g.add_state(StateKind::Hidden).unwrap();
        let b = g.add_state(StateKind::Hidden).unwrap();
        let e = g.add_state(StateKind::End).unwrap();
        g.add_transition(s, a, 0.6).unwrap();
        g.add_transition(s, b, 0.4).unwrap();
        g.add_transition(a, b, 0.5).unwrap();
        g.add_transition(a, e, 0.5).unwrap();
        g.add_transition(b, a, 0.3).unwrap();
        g.add_transition(b, e, 0.7).unwrap();
        g.add_emission(a, 'x', 0.9).unwrap();
        g.add_emission(a, 'y', 0.1).unwrap();
        g.add_emission(b, 'x', 0.2).unwrap();
        g.add_emission(b, 'y', 0.8).unwrap();
        let engine = HmmEngine::builder(g).normalize(true).build().unwrap();

        // "x": a then end, or b then end
        let one = 0.6 * 0.9 * 0.5 + 0.4 * 0.2 * 0.7;
        assert!((engine.forward("x").unwrap() - one).abs() < 1e-12);

        // "xy": a->b or b->a
        let two = 0.6 * 0.9 * 0.5 * 0.8 * 0.7 + 0.4 * 0.2 * 0.3 * 0.1 * 0.5;
        assert!((engine.forward("xy").unwrap() - two).abs() < 1e-12);
    }

    #[test]
    fn empty_observation_is_zero() {
        let mut g = StateGraph::new();
        let s = g.add_state(StateKind::Start).unwrap();
        let h = g.add_state(StateKind::Hidden).unwrap();
        let e = g.add_state(StateKind::End).unwrap();
        g.add_transition(s, e, 0.5).unwrap();
        g.add_transition(s, h, 0.5).unwrap();
        g.add_transition(h, e, 1.0).unwrap();
        g.add_emission(h, 'q', 1.0).unwrap();
        let engine = HmmEngine::builder(g).normalize(true).build().unwrap();
        assert_eq!(engine.forward("").unwrap(), 0.0);
    }
}

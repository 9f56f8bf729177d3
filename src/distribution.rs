//! Cumulative distributions for weighted sampling.
//!
//! Built once when a state is normalized, in the iteration order of the
//! backing table, so a draw maps to the same outcome on every run.

use crate::utils::PROBABILITY_TOLERANCE;

/// Outcomes paired with running probability totals.
#[derive(Clone, Debug, PartialEq)]
pub struct CumulativeDistribution<T> {
    outcomes: Vec<T>,
    cumulative: Vec<f64>,
}

impl<T: Copy> CumulativeDistribution<T> {
    /// Accumulate `(outcome, probability)` pairs in the order given. A final
    /// total within [`PROBABILITY_TOLERANCE`] of one is pinned to exactly one.
    pub fn from_weights<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let mut outcomes = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0.0;
        for (outcome, p) in weights {
            total += p;
            outcomes.push(outcome);
            cumulative.push(total);
        }
        if let Some(last) = cumulative.last_mut() {
            if (*last - 1.0).abs() <= PROBABILITY_TOLERANCE {
                *last = 1.0;
            }
        }
        Self {
            outcomes,
            cumulative,
        }
    }

    /// Map a draw `u` in `[0, 1)` to the first outcome whose running total
    /// exceeds it. `None` means the draw fell past the last total, which only
    /// happens when the weights do not sum to one.
    #[inline]
    pub fn sample(&self, u: f64) -> Option<T> {
        let idx = self.cumulative.partition_point(|&c| c <= u);
        self.outcomes.get(idx).copied()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Sum of all weights.
    #[cfg(test)]
    fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::CumulativeDistribution;

    #[test]
    fn draw_selects_first_bucket_above() {
        let d = CumulativeDistribution::from_weights([('a', 0.25), ('b', 0.5), ('c', 0.25)]);
        assert_eq!(d.sample(0.0), Some('a'));
        assert_eq!(d.sample(0.2499), Some('a'));
        assert_eq!(d.sample(0.25), Some('b'));
        assert_eq!(d.sample(0.74), Some('b'));
        assert_eq!(d.sample(0.75), Some('c'));
        assert_eq!(d.sample(0.999_999), Some('c'));
    }

    #[test]
    fn zero_weight_outcomes_are_never_drawn() {
        let d = CumulativeDistribution::from_weights([(1usize, 0.0), (2, 1.0), (3, 0.0)]);
        for u in [0.0, 0.3, 0.9999] {
            assert_eq!(d.sample(u), Some(2));
        }
    }

    #[test]
    fn short_total_exhausts() {
        let d = CumulativeDistribution::from_weights([('x', 0.4), ('y', 0.4)]);
        assert!((d.total() - 0.8).abs() < 1e-12);
        assert_eq!(d.sample(0.9), None);
    }

    #[test]
    fn rounding_short_of_one_is_pinned() {
        let d = CumulativeDistribution::from_weights([('x', 0.1); 10]);
        assert_eq!(d.total(), 1.0);
        assert_eq!(d.sample(1.0 - f64::EPSILON), Some('x'));
    }

    #[test]
    fn empty_never_samples() {
        let d: CumulativeDistribution<char> =
            CumulativeDistribution::from_weights(std::iter::empty());
        assert!(d.is_empty());
        assert_eq!(d.len(), 0);
        assert_eq!(d.sample(0.0), None);
    }
}

//! Core trait definitions for trellis dynamic programs over a state graph.
//!
//! Viterbi and the forward algorithm fill the same `(n + 1) x k` trellis with
//! the same recurrence shape:
//!
//! ```text
//! T[i][h] = e(h, o_i) * (⊕ over parents p of h) T[i-1][p] * t(p -> h)
//! ```
//!
//! and differ only in the combining operator `⊕`. Implement [`Recurrence`]
//! to plug a new operator into [`HmmEngine`](crate::HmmEngine)'s trellis fill.

/// Combining rule over the parent contributions of one trellis cell.
pub trait Recurrence {
    /// Name used in tracing spans.
    const NAME: &'static str;

    /// Value of the combination over an empty set of parents.
    ///
    /// Must lie in `[0, 1]`; the trellis rejects anything else.
    fn identity() -> f64;

    /// Fold one parent contribution into the running value.
    fn combine(acc: f64, candidate: f64) -> f64;
}

/// `⊕ = max`: probability of the single best path (Viterbi).
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxProduct;

impl Recurrence for MaxProduct {
    const NAME: &'static str = "max_product";

    #[inline]
    fn identity() -> f64 {
        0.0
    }

    #[inline]
    fn combine(acc: f64, candidate: f64) -> f64 {
        acc.max(candidate)
    }
}

/// `⊕ = +`: probability mass of all paths (forward algorithm).
#[derive(Clone, Copy, Debug, Default)]
pub struct SumProduct;

impl Recurrence for SumProduct {
    const NAME: &'static str = "sum_product";

    #[inline]
    fn identity() -> f64 {
        0.0
    }

    #[inline]
    fn combine(acc: f64, candidate: f64) -> f64 {
        acc + candidate
    }
}

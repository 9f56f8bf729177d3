//! Assorted numeric helpers.

use std::cmp::Ordering;
use std::fmt;

/// Tolerance used when checking that a distribution sums to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Total-ordering wrapper for f64 to satisfy `Ord` (NaN-safe via `total_cmp`).
#[derive(Clone, Copy, Debug)]
pub struct TotalF64(pub f64);

impl PartialEq for TotalF64 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for TotalF64 {}
impl PartialOrd for TotalF64 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for TotalF64 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
impl fmt::Display for TotalF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether `values` sum to 1.0 within `tolerance`.
pub fn is_unit_sum<'a, I>(values: I, tolerance: f64) -> bool
where
    I: IntoIterator<Item = &'a f64>,
{
    let sum: f64 = values.into_iter().sum();
    (sum - 1.0).abs() <= tolerance
}

//! Inference operations of [`HmmEngine`](crate::HmmEngine).
//!
//! - [`viterbi`]   : most probable state path for an observed sequence.
//! - [`forward`]   : total probability of an observed sequence.
//! - [`enumerate`] : brute-force enumeration of every state path, for
//!   validating the dynamic programs on small inputs.
//! - [`compose`]   : random sequence generation by weighted sampling.

pub mod compose;
pub mod enumerate;
pub mod forward;
pub mod viterbi;

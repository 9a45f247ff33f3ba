//! Low-discrepancy sequences.

mod halton;

pub use halton::{radical_inverse, HaltonSequence};

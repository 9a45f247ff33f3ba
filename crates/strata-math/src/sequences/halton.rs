//! Halton sequence.

use crate::error::{MathError, MathResult};

const PRIMES: [u32; 16] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Van der Corput radical inverse of `index` in `base`.
///
/// ```rust
/// use strata_math::sequences::radical_inverse;
///
/// assert_eq!(radical_inverse(1, 2), 0.5);
/// assert_eq!(radical_inverse(3, 2), 0.75);
/// ```
#[must_use]
pub fn radical_inverse(mut index: u64, base: u32) -> f64 {
    let base = u64::from(base);
    let inv_base = 1.0 / base as f64;
    let mut factor = inv_base;
    let mut value = 0.0;
    while index > 0 {
        value += (index % base) as f64 * factor;
        index /= base;
        factor *= inv_base;
    }
    value
}

/// Multi-dimensional Halton points in `[0, 1)^d`, one prime base per
/// dimension. The first point is index 1, so the origin is never emitted.
#[derive(Debug, Clone)]
pub struct HaltonSequence {
    dimensions: usize,
    index: u64,
}

impl HaltonSequence {
    /// Creates a sequence of the given dimension (1 to 16).
    pub fn new(dimensions: usize) -> MathResult<Self> {
        if dimensions == 0 || dimensions > PRIMES.len() {
            return Err(MathError::invalid_input(format!(
                "halton dimension must be between 1 and {}, got {dimensions}",
                PRIMES.len()
            )));
        }
        Ok(Self {
            dimensions,
            index: 0,
        })
    }

    /// Dimension of the generated points.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl Iterator for HaltonSequence {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        self.index += 1;
        let index = self.index;
        Some(
            PRIMES[..self.dimensions]
                .iter()
                .map(|&base| radical_inverse(index, base))
                .collect(),
        )
    }
}

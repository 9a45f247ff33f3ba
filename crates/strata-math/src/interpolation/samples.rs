//! Validated sample arrays shared by the interpolation family.

use std::cmp::Ordering;

use crate::error::{MathError, MathResult};

/// Paired abscissas and ordinates with strictly ascending, finite `xs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Samples {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Samples {
    /// Validates and copies the sample arrays.
    ///
    /// Input is never sorted or truncated: unequal lengths, too few points,
    /// non-finite values and non-ascending abscissas are all errors.
    pub(crate) fn new(xs: &[f64], ys: &[f64], min_points: usize) -> MathResult<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < min_points {
            return Err(MathError::insufficient_data(min_points, xs.len()));
        }
        if let Some(bad) = xs.iter().chain(ys).find(|v| !v.is_finite()) {
            return Err(MathError::invalid_input(format!("sample value {bad} is not finite")));
        }
        if let Some(i) = (1..xs.len()).find(|&i| xs[i] <= xs[i - 1]) {
            return Err(MathError::invalid_input(format!(
                "x values must be strictly increasing: x[{}] = {} follows {}",
                i,
                xs[i],
                xs[i - 1]
            )));
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    pub(crate) fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub(crate) fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub(crate) fn len(&self) -> usize {
        self.xs.len()
    }

    pub(crate) fn min_x(&self) -> f64 {
        self.xs[0]
    }

    pub(crate) fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    pub(crate) fn contains(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }

    /// Fails with a range error when `x` is outside the samples and
    /// extrapolation is not allowed.
    pub(crate) fn check_range(&self, x: f64, allow_extrapolation: bool) -> MathResult<()> {
        if x.is_nan() {
            return Err(MathError::invalid_input("evaluation point is NaN"));
        }
        if allow_extrapolation || self.contains(x) {
            Ok(())
        } else {
            Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.min_x(),
                max: self.max_x(),
            })
        }
    }

    /// Index `i` with `xs[i] <= x <= xs[i + 1]`, clamped to the first and
    /// last segments. Needs at least two samples.
    pub(crate) fn segment(&self, x: f64) -> usize {
        let last = self.xs.len() - 2;
        match self
            .xs
            .binary_search_by(|sample| sample.partial_cmp(&x).unwrap_or(Ordering::Equal))
        {
            Ok(i) => i.min(last),
            Err(i) => i.saturating_sub(1).min(last),
        }
    }

    /// Index of the first sample with `xs[i] >= x`, clamped to the last.
    pub(crate) fn upper_index(&self, x: f64) -> usize {
        self.xs.partition_point(|&v| v < x).min(self.xs.len() - 1)
    }
}

/// Linear blend `y0 (1 - t) + y1 t`; exact at both ends.
pub(crate) fn lerp(y0: f64, y1: f64, t: f64) -> f64 {
    y0 * (1.0 - t) + y1 * t
}

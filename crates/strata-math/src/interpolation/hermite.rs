//! Cubic Hermite spline.

use super::samples::Samples;
use super::Interpolation;
use crate::error::{MathError, MathResult};

/// Cubic Hermite spline with finite-difference tangents.
///
/// Interior tangents are the centred difference
/// `(y[i+1] - y[i-1]) / (x[i+1] - x[i-1])`; the end tangents are one-sided.
/// Outside the samples the spline does not extrapolate: when allowed it
/// returns the nearest boundary sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CubicHermiteSplineInterpolation {
    samples: Option<Samples>,
    tangents: Vec<f64>,
}

impl CubicHermiteSplineInterpolation {
    /// Creates an initialized spline.
    pub fn new(xs: &[f64], ys: &[f64]) -> MathResult<Self> {
        let mut spline = Self::default();
        spline.initialize(xs, ys)?;
        Ok(spline)
    }

    fn tangents(xs: &[f64], ys: &[f64]) -> Vec<f64> {
        let n = xs.len();
        (0..n)
            .map(|i| {
                let (lo, hi) = (i.saturating_sub(1), (i + 1).min(n - 1));
                (ys[hi] - ys[lo]) / (xs[hi] - xs[lo])
            })
            .collect()
    }
}

impl Interpolation for CubicHermiteSplineInterpolation {
    fn name(&self) -> &'static str {
        "CubicHermiteSplineInterpolation"
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
        let samples = Samples::new(xs, ys, 2)?;
        self.tangents = Self::tangents(samples.xs(), samples.ys());
        self.samples = Some(samples);
        Ok(())
    }

    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        let samples = self
            .samples
            .as_ref()
            .ok_or_else(|| MathError::not_initialized(self.name()))?;
        samples.check_range(x, allow_extrapolation)?;

        let (xs, ys) = (samples.xs(), samples.ys());
        if x <= xs[0] {
            return Ok(ys[0]);
        }
        if x >= xs[xs.len() - 1] {
            return Ok(ys[ys.len() - 1]);
        }

        let i = samples.segment(x);
        let h = xs[i + 1] - xs[i];
        let t = (x - xs[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        Ok(h00 * ys[i] + h10 * h * self.tangents[i] + h01 * ys[i + 1] + h11 * h * self.tangents[i + 1])
    }

    fn min_x(&self) -> Option<f64> {
        self.samples.as_ref().map(Samples::min_x)
    }

    fn max_x(&self) -> Option<f64> {
        self.samples.as_ref().map(Samples::max_x)
    }

    fn box_clone(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

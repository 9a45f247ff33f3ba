//! Piecewise-constant (step) interpolation.

use super::linear::zero_rates;
use super::samples::Samples;
use super::Interpolation;
use crate::error::{MathError, MathResult};

/// Backward-flat steps: for `x` in `(X[i-1], X[i]]` the value is `Y[i]`.
///
/// Below the first sample the value is `Y[0]`; above the last it is
/// `Y[last]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PiecewiseConstantInterpolation {
    samples: Option<Samples>,
}

impl PiecewiseConstantInterpolation {
    /// Creates an initialized interpolation.
    pub fn new(xs: &[f64], ys: &[f64]) -> MathResult<Self> {
        let mut step = Self::default();
        step.initialize(xs, ys)?;
        Ok(step)
    }
}

impl Interpolation for PiecewiseConstantInterpolation {
    fn name(&self) -> &'static str {
        "PiecewiseConstantInterpolation"
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
        self.samples = Some(Samples::new(xs, ys, 1)?);
        Ok(())
    }

    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        let samples = self
            .samples
            .as_ref()
            .ok_or_else(|| MathError::not_initialized(self.name()))?;
        samples.check_range(x, allow_extrapolation)?;
        Ok(samples.ys()[samples.upper_index(x)])
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

/// Backward-flat steps in zero-rate space over discount factors.
///
/// Each sample becomes the zero rate `-ln(y) / x`; between samples the rate
/// of the right-hand sample applies and the value is `exp(-r x)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PiecewiseConstantZeroRateInterpolation {
    samples: Option<(Samples, Vec<f64>)>,
}

impl PiecewiseConstantZeroRateInterpolation {
    /// Creates an initialized interpolation.
    pub fn new(xs: &[f64], ys: &[f64]) -> MathResult<Self> {
        let mut step = Self::default();
        step.initialize(xs, ys)?;
        Ok(step)
    }
}

impl Interpolation for PiecewiseConstantZeroRateInterpolation {
    fn name(&self) -> &'static str {
        "PiecewiseConstantZeroRateInterpolation"
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
        let samples = Samples::new(xs, ys, 1)?;
        if let Some(y) = samples.ys().iter().find(|y| **y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "discount factor {y} must be positive"
            )));
        }
        let rates = zero_rates(samples.xs(), samples.ys())?;
        self.samples = Some((samples, rates));
        Ok(())
    }

    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        let (samples, rates) = self
            .samples
            .as_ref()
            .ok_or_else(|| MathError::not_initialized(self.name()))?;
        samples.check_range(x, allow_extrapolation)?;
        let i = samples.upper_index(x);
        if x == samples.xs()[i] {
            return Ok(samples.ys()[i]);
        }
        Ok((-rates[i] * x).exp())
    }

    fn min_x(&self) -> Option<f64> {
        self.samples.as_ref().map(|(s, _)| s.min_x())
    }

    fn max_x(&self) -> Option<f64> {
        self.samples.as_ref().map(|(s, _)| s.max_x())
    }

    fn box_clone(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

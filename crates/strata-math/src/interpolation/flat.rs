//! Flat (constant) interpolation.

use super::Interpolation;
use crate::error::{MathError, MathResult};

/// Returns one constant everywhere, whatever `x` and the extrapolation flag.
///
/// `initialize` keeps the first ordinate; the abscissas only need to match
/// the ordinates in length.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatInterpolation {
    value: Option<f64>,
}

impl FlatInterpolation {
    /// Creates an initialized flat interpolation from samples.
    pub fn new(xs: &[f64], ys: &[f64]) -> MathResult<Self> {
        let mut flat = Self::default();
        flat.initialize(xs, ys)?;
        Ok(flat)
    }

    /// Flat interpolation at a known constant.
    #[must_use]
    pub fn with_value(value: f64) -> Self {
        Self { value: Some(value) }
    }
}

impl Interpolation for FlatInterpolation {
    fn name(&self) -> &'static str {
        "FlatInterpolation"
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        let value = *ys.first().ok_or_else(|| MathError::insufficient_data(1, 0))?;
        if !value.is_finite() {
            return Err(MathError::invalid_input(format!("flat value {value} is not finite")));
        }
        self.value = Some(value);
        Ok(())
    }

    fn value_at(&self, _x: f64, _allow_extrapolation: bool) -> MathResult<f64> {
        self.value.ok_or_else(|| MathError::not_initialized(self.name()))
    }

    fn min_x(&self) -> Option<f64> {
        self.value.map(|_| f64::NEG_INFINITY)
    }

    fn max_x(&self) -> Option<f64> {
        self.value.map(|_| f64::INFINITY)
    }

    fn box_clone(&self) -> Box<dyn Interpolation> {
        Box::new(*self)
    }
}

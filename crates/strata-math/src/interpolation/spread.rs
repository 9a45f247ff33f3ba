//! Interpolations quoted as a spread over a base curve.
//!
//! The base curve is shared by reference: cloning a spread interpolation
//! copies its spread samples but not the base.

use std::sync::Arc;

use super::linear::{zero_rates, LinearInterpolation};
use super::Interpolation;
use crate::error::{MathError, MathResult};

fn require_base<'a>(
    base: Option<&'a Arc<dyn Interpolation>>,
    name: &str,
) -> MathResult<&'a Arc<dyn Interpolation>> {
    base.ok_or_else(|| MathError::invalid_input(format!("{name} has no base curve")))
}

fn spread_value(
    spread: &LinearInterpolation,
    name: &str,
    x: f64,
    allow_extrapolation: bool,
) -> MathResult<f64> {
    if spread.is_initialized() {
        spread.value_at(x, allow_extrapolation)
    } else {
        Err(MathError::not_initialized(name))
    }
}

macro_rules! spread_common {
    ($ty:ident) => {
        impl $ty {
            /// Creates an uninitialized spread over `base`.
            #[must_use]
            pub fn new(base: Arc<dyn Interpolation>) -> Self {
                Self {
                    base: Some(base),
                    spread: LinearInterpolation::default(),
                }
            }

            /// The base curve, if one is attached.
            #[must_use]
            pub fn base(&self) -> Option<&Arc<dyn Interpolation>> {
                self.base.as_ref()
            }
        }
    };
}

/// Additive spread: `base(x) + spread(x)`, the spread interpolated
/// linearly from the samples.
#[derive(Debug, Clone, Default)]
pub struct SpreadInterpolation {
    base: Option<Arc<dyn Interpolation>>,
    spread: LinearInterpolation,
}

spread_common!(SpreadInterpolation);

impl Interpolation for SpreadInterpolation {
    fn name(&self) -> &'static str {
        "SpreadInterpolation"
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
        require_base(self.base.as_ref(), self.name())?;
        self.spread.initialize(xs, ys)
    }

    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        let base = require_base(self.base.as_ref(), self.name())?;
        let spread = spread_value(&self.spread, self.name(), x, allow_extrapolation)?;
        Ok(base.value_at(x, allow_extrapolation)? + spread)
    }

    fn min_x(&self) -> Option<f64> {
        self.spread.min_x()
    }

    fn max_x(&self) -> Option<f64> {
        self.spread.max_x()
    }

    fn set_base(&mut self, base: Arc<dyn Interpolation>) -> MathResult<()> {
        self.base = Some(base);
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

/// Commodity curve quoted as an additive basis to a base curve.
///
/// Initialized with the commodity curve's own values; the basis
/// `y[i] - base(x[i])` is interpolated linearly and added back to the base.
#[derive(Debug, Clone, Default)]
pub struct CommodityBasisSpreadInterpolation {
    base: Option<Arc<dyn Interpolation>>,
    spread: LinearInterpolation,
}

spread_common!(CommodityBasisSpreadInterpolation);

impl Interpolation for CommodityBasisSpreadInterpolation {
    fn name(&self) -> &'static str {
        "CommodityBasisSpreadInterpolation"
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
        let base = require_base(self.base.as_ref(), self.name())?;
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        let basis = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| Ok(y - base.value_at(*x, true)?))
            .collect::<MathResult<Vec<f64>>>()?;
        self.spread.initialize(xs, &basis)
    }

    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        let base = require_base(self.base.as_ref(), self.name())?;
        let spread = spread_value(&self.spread, self.name(), x, allow_extrapolation)?;
        Ok(base.value_at(x, true)? + spread)
    }

    fn min_x(&self) -> Option<f64> {
        self.spread.min_x()
    }

    fn max_x(&self) -> Option<f64> {
        self.spread.max_x()
    }

    fn set_base(&mut self, base: Arc<dyn Interpolation>) -> MathResult<()> {
        self.base = Some(base);
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

/// Discount-factor curve quoted as a zero-rate basis over a base curve.
///
/// Initialized with the curve's discount factors; the basis
/// `s[i] = -ln(y[i] / base(x[i])) / x[i]` is interpolated linearly and the
/// value is `base(x) · exp(-s(x) · x)`.
#[derive(Debug, Clone, Default)]
pub struct RateBasisSpreadInterpolation {
    base: Option<Arc<dyn Interpolation>>,
    spread: LinearInterpolation,
}

spread_common!(RateBasisSpreadInterpolation);

impl Interpolation for RateBasisSpreadInterpolation {
    fn name(&self) -> &'static str {
        "RateBasisSpreadInterpolation"
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
        let base = require_base(self.base.as_ref(), self.name())?;
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        let ratios = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| {
                let b = base.value_at(*x, true)?;
                if *y <= 0.0 || b <= 0.0 {
                    return Err(MathError::invalid_input(format!(
                        "discount factors must be positive at {x}: curve {y}, base {b}"
                    )));
                }
                Ok(y / b)
            })
            .collect::<MathResult<Vec<f64>>>()?;
        let spreads = zero_rates(xs, &ratios)?;
        self.spread.initialize(xs, &spreads)
    }

    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        let base = require_base(self.base.as_ref(), self.name())?;
        let spread = spread_value(&self.spread, self.name(), x, allow_extrapolation)?;
        Ok(base.value_at(x, true)? * (-spread * x).exp())
    }

    fn min_x(&self) -> Option<f64> {
        self.spread.min_x()
    }

    fn max_x(&self) -> Option<f64> {
        self.spread.max_x()
    }

    fn set_base(&mut self, base: Arc<dyn Interpolation>) -> MathResult<()> {
        self.base = Some(base);
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

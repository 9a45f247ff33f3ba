//! Interpolation methods for curves and volatility smiles.
//!
//! Every method implements [`Interpolation`]: initialize once from paired
//! sample arrays, then evaluate at arbitrary points under an explicit
//! extrapolation policy.
//!
//! # Available Methods
//!
//! | Method | Samples | Outside the samples (when allowed) |
//! |--------|---------|-------------------------------------|
//! | [`FlatInterpolation`] | ≥ 1 | constant everywhere |
//! | [`LinearInterpolation`] | ≥ 2 | flat below, last-segment slope above |
//! | [`LogLinearInterpolation`] | ≥ 2, `y > 0` | as linear, in log space |
//! | [`LinearRateInterpolation`] | ≥ 2, `y > 0` | as linear, in zero-rate space |
//! | [`PiecewiseConstantInterpolation`] | ≥ 1 | flat |
//! | [`PiecewiseConstantZeroRateInterpolation`] | ≥ 1, `y > 0` | flat zero rate |
//! | [`CubicHermiteSplineInterpolation`] | ≥ 2 | clamped to the boundary sample |
//! | [`SpreadInterpolation`] and the basis-spread variants | ≥ 2 | base curve plus extrapolated spread |
//! | [`WingModelInterpolation`] | ≥ 4 | wing formula |
//! | [`SabrModelInterpolation`] | ≥ 3 | Hagan formula |
//!
//! The log and zero-rate variants are the linear core wrapped in a
//! transform/inverse pair rather than separate algorithms.
//!
//! # Example
//!
//! ```rust
//! use strata_math::interpolation::{Interpolation, LinearInterpolation};
//!
//! let linear = LinearInterpolation::new(&[1.0, 2.0, 3.0], &[10.0, 20.0, 15.0]).unwrap();
//! assert_eq!(linear.interpolate(1.5).unwrap(), 15.0);
//! assert!(linear.value_at(4.0, false).is_err());
//! assert_eq!(linear.value_at(4.0, true).unwrap(), 10.0);
//! ```

mod flat;
mod hermite;
mod linear;
mod piecewise;
mod point;
mod registry;
mod sabr;
mod samples;
mod spread;
mod wing;

pub use flat::FlatInterpolation;
pub use hermite::CubicHermiteSplineInterpolation;
pub use linear::{LinearInterpolation, LinearRateInterpolation, LogLinearInterpolation};
pub use piecewise::{PiecewiseConstantInterpolation, PiecewiseConstantZeroRateInterpolation};
pub use point::{DiscreteSpace, Point};
pub use registry::{InterpolationFactory, InterpolationKind, InterpolationRegistry};
pub use sabr::{sabr_implied_volatility, SabrCalibrator, SabrModelInterpolation, SabrParameters};
pub use spread::{
    CommodityBasisSpreadInterpolation, RateBasisSpreadInterpolation, SpreadInterpolation,
};
pub use wing::{WingModelInterpolation, WingParameters};

use std::fmt;
use std::sync::Arc;

use crate::error::{MathError, MathResult};

/// Common contract of every interpolation method.
///
/// Instances are inert until [`initialize`](Interpolation::initialize)
/// succeeds; evaluation before that fails with
/// [`MathError::NotInitialized`]. Evaluation never mutates the instance, so
/// an initialized interpolation can be shared across threads.
pub trait Interpolation: Send + Sync + fmt::Debug {
    /// Registry name, e.g. `"LinearInterpolation"`.
    fn name(&self) -> &'static str;

    /// Replaces the sample data and refits any derived state.
    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()>;

    /// Value at `x`. Outside the sample range this fails with
    /// [`MathError::ExtrapolationNotAllowed`] unless `allow_extrapolation`
    /// is set, in which case the method's own extrapolation policy applies.
    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64>;

    /// Value at `x` without extrapolation.
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.value_at(x, false)
    }

    /// Smallest sample abscissa, once initialized.
    fn min_x(&self) -> Option<f64>;

    /// Largest sample abscissa, once initialized.
    fn max_x(&self) -> Option<f64>;

    /// Whether `initialize` has succeeded.
    fn is_initialized(&self) -> bool {
        self.min_x().is_some()
    }

    /// Attaches the base curve a spread method is quoted against.
    fn set_base(&mut self, _base: Arc<dyn Interpolation>) -> MathResult<()> {
        Err(MathError::invalid_input(format!(
            "{} is not quoted against a base curve",
            self.name()
        )))
    }

    /// Independent copy behind a new box.
    fn box_clone(&self) -> Box<dyn Interpolation>;
}

impl Clone for Box<dyn Interpolation> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

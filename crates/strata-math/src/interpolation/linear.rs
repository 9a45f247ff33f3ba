//! The linear family: one linear core wrapped in a transform.
//!
//! [`LinearInterpolation`] works on raw values, [`LogLinearInterpolation`]
//! on `ln y` and [`LinearRateInterpolation`] on zero rates `-ln(y) / x`.
//! Each transforms the samples once at initialization, interpolates
//! linearly in transformed space and maps the result back.

use super::samples::{lerp, Samples};
use super::Interpolation;
use crate::error::{MathError, MathResult};

/// Abscissas closer to zero than this are treated as the origin when
/// converting discount factors to zero rates.
pub(crate) const ZERO_TIME: f64 = 1e-12;

/// Value-space transform applied around the linear core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transform {
    /// Raw values.
    Identity,
    /// `ln y`.
    Log,
    /// Zero rate `-ln(y) / x`.
    ZeroRate,
}

impl Transform {
    /// Maps sample ordinates into transformed space.
    pub(crate) fn forward(self, xs: &[f64], ys: &[f64]) -> MathResult<Vec<f64>> {
        match self {
            Transform::Identity => Ok(ys.to_vec()),
            Transform::Log => {
                require_positive(ys)?;
                Ok(ys.iter().map(|y| y.ln()).collect())
            }
            Transform::ZeroRate => {
                require_positive(ys)?;
                zero_rates(xs, ys)
            }
        }
    }

    /// Maps a transformed value at `x` back to value space.
    pub(crate) fn inverse(self, x: f64, v: f64) -> f64 {
        match self {
            Transform::Identity => v,
            Transform::Log => v.exp(),
            Transform::ZeroRate => (-v * x).exp(),
        }
    }
}

fn require_positive(ys: &[f64]) -> MathResult<()> {
    match ys.iter().find(|y| **y <= 0.0) {
        Some(y) => Err(MathError::invalid_input(format!(
            "value {y} must be positive for a log transform"
        ))),
        None => Ok(()),
    }
}

/// Zero rates `-ln(y) / x`; a sample at the origin copies its neighbour's
/// rate.
pub(crate) fn zero_rates(xs: &[f64], ys: &[f64]) -> MathResult<Vec<f64>> {
    let mut rates: Vec<Option<f64>> = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x.abs() > ZERO_TIME).then(|| -y.ln() / x))
        .collect();

    for i in 0..rates.len() {
        if rates[i].is_none() {
            let neighbour = rates
                .get(i + 1)
                .copied()
                .flatten()
                .or_else(|| i.checked_sub(1).and_then(|j| rates[j]));
            rates[i] = neighbour;
        }
    }

    rates
        .into_iter()
        .map(|r| {
            r.ok_or_else(|| {
                MathError::invalid_input("a single sample at the origin has no zero rate")
            })
        })
        .collect()
}

/// Linear interpolation in transformed space.
#[derive(Debug, Clone, PartialEq)]
struct TransformedLinear {
    transform: Transform,
    samples: Option<(Samples, Vec<f64>)>,
}

impl TransformedLinear {
    fn new(transform: Transform) -> Self {
        Self {
            transform,
            samples: None,
        }
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
        let samples = Samples::new(xs, ys, 2)?;
        let values = self.transform.forward(samples.xs(), samples.ys())?;
        self.samples = Some((samples, values));
        Ok(())
    }

    #[allow(clippy::float_cmp)]
    fn value_at(&self, name: &str, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        let (samples, values) = self
            .samples
            .as_ref()
            .ok_or_else(|| MathError::not_initialized(name))?;
        samples.check_range(x, allow_extrapolation)?;

        let xs = samples.xs();
        let n = xs.len();
        // Boundary samples come back untouched.
        if x == xs[0] {
            return Ok(samples.ys()[0]);
        }
        if x == xs[n - 1] {
            return Ok(samples.ys()[n - 1]);
        }

        let v = if x < xs[0] {
            values[0]
        } else if x > xs[n - 1] {
            let slope = (values[n - 1] - values[n - 2]) / (xs[n - 1] - xs[n - 2]);
            values[n - 1] + slope * (x - xs[n - 1])
        } else {
            let i = samples.segment(x);
            let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
            lerp(values[i], values[i + 1], t)
        };

        Ok(self.transform.inverse(x, v))
    }

    fn min_x(&self) -> Option<f64> {
        self.samples.as_ref().map(|(s, _)| s.min_x())
    }

    fn max_x(&self) -> Option<f64> {
        self.samples.as_ref().map(|(s, _)| s.max_x())
    }
}

macro_rules! linear_family {
    ($(#[$doc:meta])* $ty:ident, $transform:expr, $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $ty {
            core: TransformedLinear,
        }

        impl $ty {
            /// Creates an initialized interpolation.
            pub fn new(xs: &[f64], ys: &[f64]) -> MathResult<Self> {
                let mut interpolation = Self::default();
                interpolation.initialize(xs, ys)?;
                Ok(interpolation)
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self {
                    core: TransformedLinear::new($transform),
                }
            }
        }

        impl Interpolation for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
                self.core.initialize(xs, ys)
            }

            fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
                self.core.value_at($name, x, allow_extrapolation)
            }

            fn min_x(&self) -> Option<f64> {
                self.core.min_x()
            }

            fn max_x(&self) -> Option<f64> {
                self.core.max_x()
            }

            fn box_clone(&self) -> Box<dyn Interpolation> {
                Box::new(self.clone())
            }
        }
    };
}

linear_family!(
    /// Piecewise-linear interpolation on raw values.
    ///
    /// Extrapolates flat below the first sample and along the last
    /// segment's slope above the last sample.
    LinearInterpolation,
    Transform::Identity,
    "LinearInterpolation"
);

linear_family!(
    /// Linear interpolation of `ln y`; on discount factors this is
    /// piecewise-constant forward rates. Requires positive values.
    LogLinearInterpolation,
    Transform::Log,
    "LogLinearInterpolation"
);

linear_family!(
    /// Linear interpolation of zero rates `-ln(y) / x` implied by discount
    /// factors. A sample at `x = 0` takes its neighbour's rate.
    LinearRateInterpolation,
    Transform::ZeroRate,
    "LinearRateInterpolation"
);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_scenario() {
        let linear = LinearInterpolation::new(&[1.0, 2.0, 3.0], &[10.0, 20.0, 15.0]).unwrap();

        assert_relative_eq!(linear.interpolate(1.5).unwrap(), 15.0, epsilon = 1e-12);
        assert_relative_eq!(linear.value_at(2.5, true).unwrap(), 17.5, epsilon = 1e-12);
        assert!(matches!(
            linear.value_at(4.0, false),
            Err(MathError::ExtrapolationNotAllowed { .. })
        ));
        assert_relative_eq!(linear.value_at(4.0, true).unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(linear.value_at(0.0, true).unwrap(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_boundaries_return_samples() {
        let linear = LinearInterpolation::new(&[1.0, 2.0, 3.0], &[10.0, 20.0, 15.0]).unwrap();
        assert_eq!(linear.interpolate(1.0).unwrap(), 10.0);
        assert_eq!(linear.interpolate(3.0).unwrap(), 15.0);
    }

    #[test]
    fn test_log_linear_discount_factors() {
        let log_linear = LogLinearInterpolation::new(&[0.0, 1.0, 2.0], &[1.0, 0.97, 0.94]).unwrap();

        let df = log_linear.interpolate(0.5).unwrap();
        assert_relative_eq!(df, 0.97_f64.sqrt(), epsilon = 1e-14);

        // Constant zero rate over [0, 1].
        let rate = -df.ln() / 0.5;
        assert_relative_eq!(rate, -(0.97_f64.ln()), epsilon = 1e-12);

        let df = log_linear.interpolate(1.5).unwrap();
        assert_relative_eq!(df, (0.97_f64 * 0.94).sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn test_linear_rate_copies_rate_at_origin() {
        let curve = LinearRateInterpolation::new(&[0.0, 1.0, 2.0], &[1.0, 0.97, 0.94]).unwrap();
        let r1 = -(0.97_f64.ln());
        let r2 = -(0.94_f64.ln()) / 2.0;

        assert_relative_eq!(curve.interpolate(0.5).unwrap(), (-r1 * 0.5).exp(), epsilon = 1e-14);
        let r = 0.5 * (r1 + r2);
        assert_relative_eq!(curve.interpolate(1.5).unwrap(), (-r * 1.5).exp(), epsilon = 1e-14);
        assert_eq!(curve.interpolate(0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_linear_rate_extrapolation() {
        let curve = LinearRateInterpolation::new(&[1.0, 2.0], &[0.97, 0.94]).unwrap();
        let r1 = -(0.97_f64.ln());
        let r2 = -(0.94_f64.ln()) / 2.0;

        // Flat rate below the first pillar.
        assert_relative_eq!(curve.value_at(0.5, true).unwrap(), (-r1 * 0.5).exp(), epsilon = 1e-14);
        // Rate extrapolated along the last segment above.
        let r3 = r2 + (r2 - r1);
        assert_relative_eq!(curve.value_at(3.0, true).unwrap(), (-r3 * 3.0).exp(), epsilon = 1e-14);
    }

    #[test]
    fn test_log_transforms_reject_non_positive_values() {
        assert!(LogLinearInterpolation::new(&[0.0, 1.0], &[1.0, 0.0]).is_err());
        assert!(LinearRateInterpolation::new(&[0.0, 1.0], &[1.0, -0.5]).is_err());
    }

    #[test]
    fn test_zero_rates_at_origin() {
        let rates = zero_rates(&[0.0, 2.0], &[1.0, 0.9]).unwrap();
        assert_relative_eq!(rates[0], rates[1]);
        assert!(zero_rates(&[0.0], &[1.0]).is_err());
    }
}

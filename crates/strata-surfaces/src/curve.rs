//! One-dimensional interpolated term curves.

use rust_decimal::prelude::ToPrimitive;

use strata_config::{CurveConfig, Validate};
use strata_core::{Date, DayCountConvention};
use strata_math::interpolation::{Interpolation, InterpolationRegistry};

use crate::error::{SurfaceError, SurfaceResult};
use crate::surface::create_method;

/// Year fraction from `start` to `end` as `f64`.
pub(crate) fn years_between(day_count: DayCountConvention, start: Date, end: Date) -> SurfaceResult<f64> {
    let years = day_count.year_fraction(start, end);
    years
        .to_f64()
        .ok_or_else(|| SurfaceError::invalid_data(format!("year fraction {years} is not representable")))
}

/// Term curve of values against years from a base date.
///
/// What the values mean (discount factors, zero rates, forwards) is up to
/// the caller; [`discount_factor`](Self::discount_factor) and
/// [`zero_rate`](Self::zero_rate) assume discount factors.
///
/// # Example
///
/// ```rust
/// use strata_core::{Date, DayCountConvention};
/// use strata_math::interpolation::LogLinearInterpolation;
/// use strata_surfaces::InterpolatedCurve;
///
/// let base = Date::from_ymd(2024, 1, 1).unwrap();
/// let curve = InterpolatedCurve::new(
///     "USD.OIS",
///     base,
///     DayCountConvention::Act365Fixed,
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.97, 0.94],
///     Box::new(LogLinearInterpolation::default()),
/// )
/// .unwrap();
/// assert!((curve.value_at(1.0).unwrap() - 0.97).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedCurve {
    id: String,
    base_date: Date,
    day_count: DayCountConvention,
    times: Vec<f64>,
    values: Vec<f64>,
    interpolation: Box<dyn Interpolation>,
    allow_extrapolation: bool,
}

impl InterpolatedCurve {
    /// Builds a curve over year offsets and initializes `interpolation`.
    pub fn new(
        id: impl Into<String>,
        base_date: Date,
        day_count: DayCountConvention,
        times: Vec<f64>,
        values: Vec<f64>,
        mut interpolation: Box<dyn Interpolation>,
    ) -> SurfaceResult<Self> {
        let id = id.into();
        interpolation.initialize(&times, &values).map_err(|e| {
            SurfaceError::invalid_data(format!("curve {id}: {e}"))
        })?;
        Ok(Self {
            id,
            base_date,
            day_count,
            times,
            values,
            interpolation,
            allow_extrapolation: false,
        })
    }

    /// Builds a curve over pillar dates, measured from `base_date`.
    pub fn from_dates(
        id: impl Into<String>,
        base_date: Date,
        day_count: DayCountConvention,
        dates: &[Date],
        values: Vec<f64>,
        interpolation: Box<dyn Interpolation>,
    ) -> SurfaceResult<Self> {
        let times = dates
            .iter()
            .map(|d| years_between(day_count, base_date, *d))
            .collect::<SurfaceResult<Vec<_>>>()?;
        Self::new(id, base_date, day_count, times, values, interpolation)
    }

    /// Builds a curve named, interpolated and day-counted per `config`.
    pub fn from_config(
        config: &CurveConfig,
        registry: &InterpolationRegistry,
        base_date: Date,
        times: Vec<f64>,
        values: Vec<f64>,
    ) -> SurfaceResult<Self> {
        config.validate_or_error()?;
        let interpolation = create_method(registry, &config.interpolation)?;
        let curve = Self::new(
            config.name.clone(),
            base_date,
            config.day_count,
            times,
            values,
            interpolation,
        )?;
        tracing::debug!(
            curve = %curve.id,
            pillars = curve.times.len(),
            interpolation = curve.interpolation.name(),
            "built curve"
        );
        Ok(curve.with_extrapolation(config.allow_extrapolation))
    }

    /// Enables or disables extrapolation beyond the pillars.
    #[must_use]
    pub fn with_extrapolation(mut self, allow: bool) -> Self {
        self.allow_extrapolation = allow;
        self
    }

    /// Curve identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Date the pillars are measured from.
    pub fn base_date(&self) -> Date {
        self.base_date
    }

    /// Day count of the time axis.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Name of the interpolation method.
    pub fn interpolation(&self) -> &'static str {
        self.interpolation.name()
    }

    /// Pillars as `(years, value)` pairs.
    pub fn pillars(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Value `t` years from the base date.
    pub fn value_at(&self, t: f64) -> SurfaceResult<f64> {
        Ok(self.interpolation.value_at(t, self.allow_extrapolation)?)
    }

    /// Value at `date`.
    pub fn value_at_date(&self, date: Date) -> SurfaceResult<f64> {
        self.value_at(self.years_to(date)?)
    }

    /// Discount factor to `date`.
    pub fn discount_factor(&self, date: Date) -> SurfaceResult<f64> {
        if date == self.base_date {
            return Ok(1.0);
        }
        self.value_at_date(date)
    }

    /// Continuously compounded zero rate to `date`.
    pub fn zero_rate(&self, date: Date) -> SurfaceResult<f64> {
        let t = self.years_to(date)?;
        if t <= 0.0 {
            return Err(SurfaceError::invalid_data(format!(
                "zero rate needs a date after {}, got {date}",
                self.base_date
            )));
        }
        let df = self.value_at(t)?;
        if df <= 0.0 {
            return Err(SurfaceError::invalid_data(format!("discount factor {df} at {date} is not positive")));
        }
        Ok(-df.ln() / t)
    }

    /// Years from the base date to `date`.
    pub fn years_to(&self, date: Date) -> SurfaceResult<f64> {
        years_between(self.day_count, self.base_date, date)
    }
}

impl Interpolation for InterpolatedCurve {
    fn name(&self) -> &'static str {
        self.interpolation.name()
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> strata_math::MathResult<()> {
        self.interpolation.initialize(xs, ys)?;
        self.times = xs.to_vec();
        self.values = ys.to_vec();
        Ok(())
    }

    fn value_at(&self, x: f64, allow_extrapolation: bool) -> strata_math::MathResult<f64> {
        self.interpolation.value_at(x, allow_extrapolation)
    }

    fn min_x(&self) -> Option<f64> {
        self.interpolation.min_x()
    }

    fn max_x(&self) -> Option<f64> {
        self.interpolation.max_x()
    }

    fn box_clone(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;
    use strata_math::interpolation::{LinearInterpolation, RateBasisSpreadInterpolation};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn discount_curve() -> InterpolatedCurve {
        InterpolatedCurve::from_config(
            &CurveConfig::log_linear_discount(),
            &InterpolationRegistry::with_defaults(),
            d(2024, 1, 1),
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.97, 0.94],
        )
        .unwrap()
    }

    #[test]
    fn test_from_config_uses_named_interpolation() {
        let curve = discount_curve();
        assert_eq!(curve.id(), "DISCOUNT.LOGLINEAR");
        assert_eq!(curve.interpolation(), "LogLinearInterpolation");
        assert_eq!(curve.pillars().count(), 3);
    }

    #[test]
    fn test_discount_factor_and_zero_rate() {
        let curve = discount_curve();
        assert_relative_eq!(curve.discount_factor(d(2024, 1, 1)).unwrap(), 1.0);
        assert_relative_eq!(curve.discount_factor(d(2024, 12, 31)).unwrap(), 0.97, epsilon = 1e-12);

        let one_year = d(2024, 12, 31);
        assert_relative_eq!(curve.zero_rate(one_year).unwrap(), -(0.97f64).ln(), epsilon = 1e-12);
        assert!(curve.zero_rate(d(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_from_dates() {
        let base = d(2024, 1, 1);
        let curve = InterpolatedCurve::from_dates(
            "FWD",
            base,
            DayCountConvention::Act365Fixed,
            &[d(2024, 12, 31), d(2025, 12, 31)],
            vec![100.0, 102.0],
            Box::new(LinearInterpolation::default()),
        )
        .unwrap();
        assert_relative_eq!(curve.value_at(1.0).unwrap(), 100.0, epsilon = 1e-12);
        assert_relative_eq!(curve.value_at(1.5).unwrap(), 101.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolation_follows_config() {
        let loose = discount_curve();
        assert!(loose.value_at(3.0).unwrap() < 0.94);

        let strict = loose.clone().with_extrapolation(false);
        let err = strict.value_at(3.0).unwrap_err();
        assert!(err.to_string().contains("does not support extrapolation"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CurveConfig::new("BAD").with_interpolation("Nope");
        let err = InterpolatedCurve::from_config(
            &config,
            &InterpolationRegistry::with_defaults(),
            d(2024, 1, 1),
            vec![0.0, 1.0],
            vec![1.0, 0.99],
        )
        .unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidConfig { .. }));
    }

    #[test]
    fn test_curve_as_spread_base() {
        let base = Arc::new(discount_curve());
        let mut spread = RateBasisSpreadInterpolation::new(base);
        spread.initialize(&[1.0, 2.0], &[0.0, 0.0]).unwrap();
        assert_relative_eq!(spread.interpolate(1.0).unwrap(), 0.97, epsilon = 1e-12);
    }
}

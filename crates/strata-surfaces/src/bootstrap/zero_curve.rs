//! Sequential zero-curve bootstrap.
//!
//! Instruments are sorted by maturity and solved one at a time. For each,
//! the continuously compounded zero rate at its maturity is seeded with the
//! quoted rate and adjusted by numerical Newton-Raphson until the
//! instrument reprices to zero against the curve built so far plus the
//! trial pillar. The curve starts at `(0, 1)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use strata_config::{BootstrapConfig, Validate};
use strata_core::schedule::{generate_dates, GenerationDirection, RollConvention, StubPolicy};
use strata_core::{Date, DayCountConvention, Period};
use strata_math::interpolation::{Interpolation, InterpolationRegistry};
use strata_math::solvers::newton_raphson_numerical;

use crate::curve::{years_between, InterpolatedCurve};
use crate::error::{SurfaceError, SurfaceResult};
use crate::key::parse_period;
use crate::surface::create_method;

/// Pillars closer than this are treated as the same maturity.
const PILLAR_EPSILON: f64 = 1e-10;

/// Market instrument a zero curve is bootstrapped from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CurveInstrument {
    /// Simple-interest deposit from the base date.
    Deposit {
        /// Time to maturity.
        tenor: Period,
        /// Quoted simple rate.
        rate: f64,
    },
    /// Par swap paying a fixed rate against a floating leg worth par.
    ParSwap {
        /// Time to maturity.
        tenor: Period,
        /// Quoted fixed rate.
        rate: f64,
        /// Fixed leg payment frequency.
        frequency: Period,
    },
}

impl CurveInstrument {
    /// Parses a deposit.
    pub fn deposit(tenor: &str, rate: f64) -> SurfaceResult<Self> {
        Ok(Self::Deposit {
            tenor: parse_period(tenor)?,
            rate,
        })
    }

    /// Parses a par swap.
    pub fn par_swap(tenor: &str, rate: f64, frequency: &str) -> SurfaceResult<Self> {
        Ok(Self::ParSwap {
            tenor: parse_period(tenor)?,
            rate,
            frequency: parse_period(frequency)?,
        })
    }

    /// Quoted rate.
    pub fn rate(&self) -> f64 {
        match self {
            Self::Deposit { rate, .. } | Self::ParSwap { rate, .. } => *rate,
        }
    }

    /// Time to maturity.
    pub fn tenor(&self) -> Period {
        match self {
            Self::Deposit { tenor, .. } | Self::ParSwap { tenor, .. } => *tenor,
        }
    }

    /// Maturity date from `base`.
    pub fn maturity(&self, base: Date) -> SurfaceResult<Date> {
        Ok(self.tenor().add_to(base)?)
    }

    /// Present value per unit notional against `curve` of discount factors.
    pub fn present_value(
        &self,
        base: Date,
        day_count: DayCountConvention,
        curve: &dyn Interpolation,
    ) -> SurfaceResult<f64> {
        let maturity = self.maturity(base)?;
        let df = |date: Date| -> SurfaceResult<f64> {
            Ok(curve.value_at(years_between(day_count, base, date)?, true)?)
        };
        match self {
            Self::Deposit { rate, .. } => {
                let tau = years_between(day_count, base, maturity)?;
                Ok(df(maturity)? * (1.0 + rate * tau) - 1.0)
            }
            Self::ParSwap { rate, frequency, .. } => {
                let dates = generate_dates(
                    base,
                    maturity,
                    *frequency,
                    RollConvention::None,
                    GenerationDirection::Backward,
                    StubPolicy::Short,
                )?;
                let mut annuity = 0.0;
                for pair in dates.windows(2) {
                    annuity += years_between(day_count, pair[0], pair[1])? * df(pair[1])?;
                }
                Ok(rate * annuity + df(maturity)? - 1.0)
            }
        }
    }
}

impl fmt::Display for CurveInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit { tenor, rate } => write!(f, "Deposit {tenor} @ {rate}"),
            Self::ParSwap {
                tenor,
                rate,
                frequency,
            } => write!(f, "ParSwap {tenor} @ {rate} every {frequency}"),
        }
    }
}

/// Bootstraps a discount curve from deposits and par swaps.
///
/// # Example
///
/// ```rust
/// use strata_config::BootstrapConfig;
/// use strata_core::Date;
/// use strata_surfaces::bootstrap::{CurveInstrument, ZeroCurveBootstrapper};
///
/// let base = Date::from_ymd(2024, 1, 2).unwrap();
/// let curve = ZeroCurveBootstrapper::new(base, BootstrapConfig::standard())
///     .instrument(CurveInstrument::deposit("6M", 0.05).unwrap())
///     .instrument(CurveInstrument::par_swap("2Y", 0.045, "6M").unwrap())
///     .bootstrap()
///     .unwrap();
///
/// assert_eq!(curve.pillars().count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ZeroCurveBootstrapper {
    base_date: Date,
    config: BootstrapConfig,
    instruments: Vec<CurveInstrument>,
    registry: InterpolationRegistry,
}

impl ZeroCurveBootstrapper {
    /// Creates an empty bootstrapper.
    #[must_use]
    pub fn new(base_date: Date, config: BootstrapConfig) -> Self {
        Self {
            base_date,
            config,
            instruments: Vec::new(),
            registry: InterpolationRegistry::with_defaults(),
        }
    }

    /// Resolves the output curve's interpolation through `registry`.
    #[must_use]
    pub fn with_registry(mut self, registry: InterpolationRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Adds an instrument.
    #[must_use]
    pub fn instrument(mut self, instrument: CurveInstrument) -> Self {
        self.instruments.push(instrument);
        self
    }

    /// Adds several instruments.
    #[must_use]
    pub fn instruments(mut self, instruments: impl IntoIterator<Item = CurveInstrument>) -> Self {
        self.instruments.extend(instruments);
        self
    }

    /// Solves every pillar and builds the curve of discount factors.
    pub fn bootstrap(&self) -> SurfaceResult<InterpolatedCurve> {
        self.config.validate_or_error()?;
        if self.instruments.is_empty() {
            return Err(SurfaceError::invalid_data("no instruments provided for bootstrap"));
        }

        let mut sorted = self
            .instruments
            .iter()
            .map(|i| Ok((self.years_to(i.maturity(self.base_date)?)?, *i)))
            .collect::<SurfaceResult<Vec<(f64, CurveInstrument)>>>()?;
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        // pillars are solved on the same method the returned curve uses
        let method = create_method(&self.registry, &self.config.curve_interpolation)?;
        let mut times = vec![0.0];
        let mut dfs = vec![1.0];
        for (t, instrument) in &sorted {
            let (t, instrument) = (*t, *instrument);
            let last = times[times.len() - 1];
            if t - last < PILLAR_EPSILON {
                return Err(SurfaceError::bootstrap_failed(
                    instrument.to_string(),
                    format!("maturity at {t:.6}y does not extend the curve past {last:.6}y"),
                ));
            }

            let objective = |z: f64| {
                self.trial_value(method.as_ref(), &times, &dfs, t, z, &instrument)
                    .unwrap_or(f64::NAN)
            };
            let solved =
                newton_raphson_numerical(objective, instrument.rate(), &self.config.solver_config())
                    .map_err(|e| {
                        tracing::warn!(instrument = %instrument, error = %e, "pillar solve failed");
                        SurfaceError::bootstrap_failed(instrument.to_string(), e.to_string())
                    })?;

            let df = (-solved.root * t).exp();
            tracing::debug!(
                instrument = %instrument,
                years = t,
                zero_rate = solved.root,
                discount_factor = df,
                iterations = solved.iterations,
                "solved pillar"
            );
            times.push(t);
            dfs.push(df);
        }

        let curve = InterpolatedCurve::new(
            self.config.name.clone(),
            self.base_date,
            self.config.day_count,
            times,
            dfs,
            method,
        )?;
        Ok(curve.with_extrapolation(true))
    }

    /// Present value of every instrument against `curve`, in input order.
    pub fn reprice(&self, curve: &InterpolatedCurve) -> SurfaceResult<Vec<(CurveInstrument, f64)>> {
        self.instruments
            .iter()
            .map(|i| Ok((*i, i.present_value(self.base_date, self.config.day_count, curve)?)))
            .collect()
    }

    fn trial_value(
        &self,
        method: &dyn Interpolation,
        times: &[f64],
        dfs: &[f64],
        t: f64,
        zero_rate: f64,
        instrument: &CurveInstrument,
    ) -> SurfaceResult<f64> {
        let mut xs = times.to_vec();
        let mut ys = dfs.to_vec();
        xs.push(t);
        ys.push((-zero_rate * t).exp());
        let mut partial = method.box_clone();
        partial.initialize(&xs, &ys)?;
        instrument.present_value(self.base_date, self.config.day_count, partial.as_ref())
    }

    fn years_to(&self, date: Date) -> SurfaceResult<f64> {
        years_between(self.config.day_count, self.base_date, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    fn market() -> Vec<CurveInstrument> {
        vec![
            CurveInstrument::par_swap("5Y", 0.042, "6M").unwrap(),
            CurveInstrument::deposit("3M", 0.050).unwrap(),
            CurveInstrument::par_swap("2Y", 0.045, "6M").unwrap(),
            CurveInstrument::deposit("6M", 0.052).unwrap(),
        ]
    }

    #[test]
    fn test_deposit_pillar_is_closed_form() {
        let curve = ZeroCurveBootstrapper::new(base(), BootstrapConfig::standard())
            .instrument(CurveInstrument::deposit("6M", 0.05).unwrap())
            .bootstrap()
            .unwrap();
        let maturity = Date::from_ymd(2024, 7, 2).unwrap();
        let tau = curve.years_to(maturity).unwrap();
        assert_relative_eq!(
            curve.discount_factor(maturity).unwrap(),
            1.0 / (1.0 + 0.05 * tau),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_all_instruments_reprice() {
        let bootstrapper = ZeroCurveBootstrapper::new(base(), BootstrapConfig::standard()).instruments(market());
        let curve = bootstrapper.bootstrap().unwrap();
        assert_eq!(curve.pillars().count(), 5);
        assert_eq!(curve.interpolation(), "LinearRateInterpolation");

        for (instrument, pv) in bootstrapper.reprice(&curve).unwrap() {
            assert!(pv.abs() < 1e-9, "{instrument} reprices to {pv}");
        }
    }

    #[test]
    fn test_discount_factors_decrease() {
        let curve = ZeroCurveBootstrapper::new(base(), BootstrapConfig::standard())
            .instruments(market())
            .bootstrap()
            .unwrap();
        let dfs: Vec<f64> = curve.pillars().map(|(_, df)| df).collect();
        assert!(dfs.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_duplicate_maturity_rejected() {
        let err = ZeroCurveBootstrapper::new(base(), BootstrapConfig::standard())
            .instrument(CurveInstrument::deposit("12M", 0.05).unwrap())
            .instrument(CurveInstrument::par_swap("1Y", 0.05, "6M").unwrap())
            .bootstrap()
            .unwrap_err();
        assert!(matches!(err, SurfaceError::BootstrapFailed { .. }));
    }

    #[test]
    fn test_empty_and_unsolvable() {
        let empty = ZeroCurveBootstrapper::new(base(), BootstrapConfig::standard()).bootstrap();
        assert!(matches!(empty, Err(SurfaceError::InvalidData { .. })));

        let capped = ZeroCurveBootstrapper::new(base(), BootstrapConfig::standard().with_solver(1e-30, 1))
            .instrument(CurveInstrument::par_swap("5Y", 0.04, "6M").unwrap())
            .bootstrap();
        assert!(matches!(capped, Err(SurfaceError::BootstrapFailed { .. })));
    }

    #[test]
    fn test_custom_interpolation_for_output() {
        let config = BootstrapConfig {
            curve_interpolation: "LogLinearInterpolation".to_string(),
            ..BootstrapConfig::standard()
        };
        let bootstrapper = ZeroCurveBootstrapper::new(base(), config).instruments(market());
        let curve = bootstrapper.bootstrap().unwrap();
        assert_eq!(curve.interpolation(), "LogLinearInterpolation");
        assert_relative_eq!(curve.value_at(0.0).unwrap(), 1.0);

        for (instrument, pv) in bootstrapper.reprice(&curve).unwrap() {
            assert!(pv.abs() < 1e-9, "{instrument} reprices to {pv}");
        }
    }

    #[test]
    fn test_output_methods_reprice_between_pillars() {
        for method in ["LinearInterpolation", "PiecewiseConstantZeroRateInterpolation"] {
            let config = BootstrapConfig {
                curve_interpolation: method.to_string(),
                ..BootstrapConfig::standard()
            };
            let bootstrapper = ZeroCurveBootstrapper::new(base(), config).instruments(market());
            let curve = bootstrapper.bootstrap().unwrap();
            assert_eq!(curve.interpolation(), method);
            for (instrument, pv) in bootstrapper.reprice(&curve).unwrap() {
                assert!(pv.abs() < 1e-9, "{method}: {instrument} reprices to {pv}");
            }
        }
    }
}

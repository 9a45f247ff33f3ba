//! Expiry by strike volatility surfaces, with an optional tenor dimension.
//!
//! Quotes arrive either as `(expiry, [tenor,] strike, volatility)` points or
//! as a table of expiry rows by strike columns. The surface indexes every
//! quote by [`SurfaceKey`], groups quotes into one dense grid per tenor and
//! evaluates each grid through an [`InterpolatedSurface`].

use std::cmp::Ordering;
use std::sync::Arc;

use ndarray::{Array2, Axis};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use strata_config::{SurfaceConfig, Validate};
use strata_core::{Date, DayCountConvention, Period};
use strata_math::interpolation::{
    Interpolation, InterpolationKind, InterpolationRegistry, SabrModelInterpolation,
    WingModelInterpolation,
};

use crate::curve::years_between;
use crate::error::{SurfaceError, SurfaceResult};
use crate::index::{SurfaceIndex, SurfaceTable};
use crate::key::SurfaceKey;
use crate::surface::{create_method, prototype_smile, InterpolatedSurface, SmileFactory};

/// One volatility quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityPoint {
    /// Where the quote sits on the surface.
    pub key: SurfaceKey,
    /// Quoted volatility.
    pub volatility: f64,
}

impl VolatilityPoint {
    /// Creates a quote.
    #[must_use]
    pub fn new(key: SurfaceKey, volatility: f64) -> Self {
        Self { key, volatility }
    }

    /// Parses the period fields of a quote; see [`SurfaceKey::parse`].
    pub fn parse(
        expiry: &str,
        tenor: Option<&str>,
        strike: Decimal,
        volatility: f64,
    ) -> SurfaceResult<Self> {
        Ok(Self::new(SurfaceKey::parse(expiry, tenor, strike)?, volatility))
    }
}

/// Grid of one tenor.
#[derive(Debug, Clone)]
struct TenorSlice {
    tenor: Option<Period>,
    tenor_years: f64,
    surface: Arc<InterpolatedSurface>,
}

/// Builder for [`VolatilitySurface`].
///
/// # Example
///
/// ```rust
/// use rust_decimal_macros::dec;
/// use strata_core::Date;
/// use strata_surfaces::VolatilitySurfaceBuilder;
///
/// let base = Date::from_ymd(2024, 1, 2).unwrap();
/// let surface = VolatilitySurfaceBuilder::new("EQ.VOL", base)
///     .table(
///         &["6M", "1Y"],
///         &[dec!(90), dec!(100), dec!(110)],
///         &[vec![0.24, 0.20, 0.22], vec![0.23, 0.19, 0.21]],
///     )
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let vol = surface.value_by_term("1Y".parse().unwrap(), 100.0).unwrap();
/// assert!((vol - 0.19).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct VolatilitySurfaceBuilder {
    id: String,
    base_date: Date,
    config: SurfaceConfig,
    forward: Option<f64>,
    points: Vec<VolatilityPoint>,
}

impl VolatilitySurfaceBuilder {
    /// Starts a surface with the default bilinear configuration.
    pub fn new(id: impl Into<String>, base_date: Date) -> Self {
        Self {
            id: id.into(),
            base_date,
            config: SurfaceConfig::default(),
            forward: None,
            points: Vec::new(),
        }
    }

    /// Sets interpolation, day count and smile settings.
    #[must_use]
    pub fn config(mut self, config: &SurfaceConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Forward of the underlying; required by SABR and wing smiles.
    #[must_use]
    pub fn forward(mut self, forward: f64) -> Self {
        self.forward = Some(forward);
        self
    }

    /// Adds one quote.
    #[must_use]
    pub fn point(mut self, point: VolatilityPoint) -> Self {
        self.points.push(point);
        self
    }

    /// Adds several quotes.
    #[must_use]
    pub fn points(mut self, points: impl IntoIterator<Item = VolatilityPoint>) -> Self {
        self.points.extend(points);
        self
    }

    /// Adds an expiry by strike table without a tenor.
    ///
    /// Non-finite cells are treated as missing quotes.
    pub fn table(self, expiries: &[&str], strikes: &[Decimal], values: &[Vec<f64>]) -> SurfaceResult<Self> {
        self.add_table(expiries, None, strikes, values)
    }

    /// Adds an expiry by strike table for one tenor.
    pub fn tenor_table(
        self,
        tenor: &str,
        expiries: &[&str],
        strikes: &[Decimal],
        values: &[Vec<f64>],
    ) -> SurfaceResult<Self> {
        self.add_table(expiries, Some(tenor), strikes, values)
    }

    fn add_table(
        mut self,
        expiries: &[&str],
        tenor: Option<&str>,
        strikes: &[Decimal],
        values: &[Vec<f64>],
    ) -> SurfaceResult<Self> {
        if values.len() != expiries.len() {
            return Err(SurfaceError::invalid_data(format!(
                "{} expiry labels for {} rows",
                expiries.len(),
                values.len()
            )));
        }
        for (expiry, row) in expiries.iter().zip(values) {
            if row.len() != strikes.len() {
                return Err(SurfaceError::invalid_data(format!(
                    "row {expiry} has {} values for {} strikes",
                    row.len(),
                    strikes.len()
                )));
            }
            for (strike, vol) in strikes.iter().zip(row) {
                if vol.is_finite() {
                    self.points.push(VolatilityPoint::parse(expiry, tenor, *strike, *vol)?);
                }
            }
        }
        Ok(self)
    }

    /// Builds with the built-in interpolation methods.
    pub fn build(self) -> SurfaceResult<VolatilitySurface> {
        self.build_with(&InterpolationRegistry::with_defaults())
    }

    /// Builds, resolving interpolation names through `registry`.
    pub fn build_with(self, registry: &InterpolationRegistry) -> SurfaceResult<VolatilitySurface> {
        self.config.validate_or_error()?;
        if self.points.is_empty() {
            return Err(SurfaceError::invalid_data(format!("surface {} has no quotes", self.id)));
        }
        if let Some(bad) = self.points.iter().find(|p| !p.volatility.is_finite()) {
            return Err(SurfaceError::invalid_data(format!(
                "quote {} is not finite",
                bad.key
            )));
        }

        let index = SurfaceIndex::build(self.points.iter().map(|p| p.key))?;
        let expiry_method = create_method(registry, &self.config.expiry_interpolation)?;
        let smile = self.smile_factory(registry)?;

        let slices = index
            .tenors()
            .into_iter()
            .map(|tenor| {
                let surface = self.slice_surface(&index, tenor, expiry_method.as_ref(), smile.clone())?;
                let tenor_years = match tenor {
                    Some(t) => years_between(self.config.day_count, self.base_date, t.add_to(self.base_date)?)?,
                    None => 0.0,
                };
                Ok(TenorSlice {
                    tenor,
                    tenor_years,
                    surface: Arc::new(surface),
                })
            })
            .collect::<SurfaceResult<Vec<_>>>()?;

        tracing::debug!(
            surface = %self.id,
            quotes = index.len(),
            tenors = slices.len(),
            strikes = index.strikes().len(),
            expiry_interpolation = %self.config.expiry_interpolation,
            strike_interpolation = %self.config.strike_interpolation,
            "built volatility surface"
        );

        Ok(VolatilitySurface {
            id: self.id,
            base_date: self.base_date,
            day_count: self.config.day_count,
            forward: self.forward,
            volatilities: self.points.iter().map(|p| p.volatility).collect(),
            index,
            slices,
        })
    }

    fn smile_factory(&self, registry: &InterpolationRegistry) -> SurfaceResult<SmileFactory> {
        let parametric = self
            .config
            .strike_interpolation
            .parse::<InterpolationKind>()
            .ok()
            .filter(|k| matches!(k, InterpolationKind::SabrModel | InterpolationKind::WingModel));

        let Some(kind) = parametric else {
            return Ok(prototype_smile(create_method(registry, &self.config.strike_interpolation)?));
        };
        let forward = self.forward.ok_or_else(|| SurfaceError::InvalidConfig {
            reason: format!("{} smiles need a forward", kind.name()),
        })?;

        if kind == InterpolationKind::SabrModel {
            let calibrator = self.config.sabr.calibrator();
            let relative = self.config.sabr.relative_strikes;
            let factory: SmileFactory = Arc::new(move |t: f64| -> SurfaceResult<Box<dyn Interpolation>> {
                tracing::debug!(expiry = t, forward, "fitting SABR smile");
                Ok(Box::new(
                    SabrModelInterpolation::new(forward, t)
                        .with_calibrator(calibrator.clone())
                        .with_relative_strikes(relative),
                ))
            });
            Ok(factory)
        } else {
            let parameters = self.config.wing.parameters(forward, forward);
            let factory: SmileFactory = Arc::new(move |t: f64| -> SurfaceResult<Box<dyn Interpolation>> {
                tracing::debug!(expiry = t, forward, "fitting wing smile");
                Ok(Box::new(WingModelInterpolation::new(parameters)))
            });
            Ok(factory)
        }
    }

    fn slice_surface(
        &self,
        index: &SurfaceIndex,
        tenor: Option<Period>,
        expiry_method: &dyn Interpolation,
        smile: SmileFactory,
    ) -> SurfaceResult<InterpolatedSurface> {
        let same_tenor = |t: &Option<Period>| match (t, &tenor) {
            (None, None) => true,
            (Some(a), Some(b)) => a.cmp_interval(b) == Ordering::Equal,
            _ => false,
        };
        let keys: Vec<(&SurfaceKey, usize)> = index.iter().filter(|(k, _)| same_tenor(&k.tenor)).collect();

        let mut expiries: Vec<Period> = Vec::new();
        let mut strikes: Vec<Decimal> = Vec::new();
        for (key, _) in &keys {
            if expiries.last().map_or(true, |e| e.cmp_interval(&key.expiry) != Ordering::Equal) {
                expiries.push(key.expiry);
            }
            strikes.push(key.strike);
        }
        strikes.sort();
        strikes.dedup();

        let mut grid = Array2::from_elem((expiries.len(), strikes.len()), f64::NAN);
        let mut row = 0;
        for (key, position) in &keys {
            while expiries[row].cmp_interval(&key.expiry) != Ordering::Equal {
                row += 1;
            }
            let column = strikes.binary_search(&key.strike).map_err(|_| SurfaceError::key_not_found(key))?;
            grid[(row, column)] = self.points[*position].volatility;
        }
        if let Some(((r, c), _)) = grid.indexed_iter().find(|(_, v)| v.is_nan()) {
            let tenor = tenor.map(|t| format!(" tenor {t}")).unwrap_or_default();
            return Err(SurfaceError::invalid_data(format!(
                "missing quote for expiry {}{tenor} strike {}",
                expiries[r], strikes[c]
            )));
        }

        // nominal period order and calendar order can differ (30D vs 1M)
        let dates = expiries
            .iter()
            .map(|e| Ok(e.add_to(self.base_date)?))
            .collect::<SurfaceResult<Vec<Date>>>()?;
        let mut order: Vec<usize> = (0..expiries.len()).collect();
        order.sort_by_key(|&i| dates[i]);
        if let Some(pair) = order.windows(2).find(|w| dates[w[0]] == dates[w[1]]) {
            return Err(SurfaceError::invalid_data(format!(
                "expiries {} and {} fall on the same date {}",
                expiries[pair[0]], expiries[pair[1]], dates[pair[0]]
            )));
        }
        let grid = grid.select(Axis(0), &order);
        let times = order
            .iter()
            .map(|&i| years_between(self.config.day_count, self.base_date, dates[i]))
            .collect::<SurfaceResult<Vec<f64>>>()?;
        let strike_values = strikes
            .iter()
            .map(|k| {
                k.to_f64()
                    .ok_or_else(|| SurfaceError::invalid_data(format!("strike {k} is not representable")))
            })
            .collect::<SurfaceResult<Vec<f64>>>()?;

        InterpolatedSurface::new(
            times,
            strike_values,
            grid,
            expiry_method,
            smile,
            self.config.allow_extrapolation,
        )
    }
}

/// Volatility surface indexed by expiry, optional tenor and strike.
#[derive(Debug, Clone)]
pub struct VolatilitySurface {
    id: String,
    base_date: Date,
    day_count: DayCountConvention,
    forward: Option<f64>,
    volatilities: Vec<f64>,
    index: SurfaceIndex,
    slices: Vec<TenorSlice>,
}

impl VolatilitySurface {
    /// Surface identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Date expiries are measured from.
    pub fn base_date(&self) -> Date {
        self.base_date
    }

    /// Day count converting expiries to years.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Forward the smiles were fitted against, if any.
    pub fn forward(&self) -> Option<f64> {
        self.forward
    }

    /// Whether the surface has a tenor dimension.
    pub fn has_tenor(&self) -> bool {
        self.slices.iter().any(|s| s.tenor.is_some())
    }

    /// Tenors of the surface, ascending.
    pub fn tenors(&self) -> Vec<Period> {
        self.slices.iter().filter_map(|s| s.tenor).collect()
    }

    /// Flat position of a quote in input order.
    pub fn index_of(&self, key: &SurfaceKey) -> Option<usize> {
        self.index.index_of(key)
    }

    /// Quoted volatility at an exact key.
    pub fn quote(&self, key: &SurfaceKey) -> Option<f64> {
        self.index_of(key).map(|i| self.volatilities[i])
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.volatilities.len()
    }

    /// Whether the surface holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.volatilities.is_empty()
    }

    /// Tabular snapshot, one row per expiry (and tenor).
    pub fn surface(&self) -> SurfaceResult<SurfaceTable> {
        self.index.table(&self.volatilities)
    }

    /// Grid of a single tenor; `None` selects the plain surface.
    pub fn grid(&self, tenor: Option<Period>) -> Option<&InterpolatedSurface> {
        self.slices
            .iter()
            .find(|s| match (s.tenor, tenor) {
                (None, None) => true,
                (Some(a), Some(b)) => a.cmp_interval(&b) == Ordering::Equal,
                _ => false,
            })
            .map(|s| s.surface.as_ref())
    }

    /// Volatility at an expiry in years and a strike.
    ///
    /// Fails on a surface with several tenors; use
    /// [`value_with_tenor`](Self::value_with_tenor) there.
    pub fn value(&self, expiry_years: f64, strike: f64) -> SurfaceResult<f64> {
        match self.slices.as_slice() {
            [slice] => slice.surface.value(expiry_years, strike),
            _ => Err(SurfaceError::invalid_data(format!(
                "surface {} has {} tenors; a tenor is required",
                self.id,
                self.slices.len()
            ))),
        }
    }

    /// Volatility at an expiry period from the base date.
    pub fn value_by_term(&self, expiry: Period, strike: f64) -> SurfaceResult<f64> {
        self.value(self.years_to(expiry.add_to(self.base_date)?)?, strike)
    }

    /// Volatility at an absolute expiry date.
    pub fn value_by_date(&self, expiry: Date, strike: f64) -> SurfaceResult<f64> {
        if expiry < self.base_date {
            return Err(SurfaceError::invalid_data(format!(
                "expiry {expiry} is before base date {}",
                self.base_date
            )));
        }
        self.value(self.years_to(expiry)?, strike)
    }

    /// Volatility at an expiry, tenor and strike.
    ///
    /// Between quoted tenors the value is linear in tenor years; outside
    /// them the nearest tenor is used.
    pub fn value_with_tenor(&self, expiry_years: f64, tenor: Period, strike: f64) -> SurfaceResult<f64> {
        let tenor_years = self.years_to(tenor.add_to(self.base_date)?)?;
        let quoted: Vec<&TenorSlice> = self.slices.iter().filter(|s| s.tenor.is_some()).collect();
        let (Some(first), Some(last)) = (quoted.first(), quoted.last()) else {
            return self.value(expiry_years, strike);
        };

        if tenor_years <= first.tenor_years {
            return first.surface.value(expiry_years, strike);
        }
        if tenor_years >= last.tenor_years {
            return last.surface.value(expiry_years, strike);
        }
        let upper = quoted.partition_point(|s| s.tenor_years < tenor_years);
        let (lo, hi) = (quoted[upper - 1], quoted[upper]);
        let v_lo = lo.surface.value(expiry_years, strike)?;
        let v_hi = hi.surface.value(expiry_years, strike)?;
        let w = (tenor_years - lo.tenor_years) / (hi.tenor_years - lo.tenor_years);
        Ok(v_lo + w * (v_hi - v_lo))
    }

    /// Volatilities at a batch of `(expiry years, strike)` queries.
    pub fn values(&self, queries: &[(f64, f64)]) -> SurfaceResult<Vec<f64>> {
        match self.slices.as_slice() {
            [slice] => slice.surface.values_at(queries),
            _ => queries.iter().map(|(t, k)| self.value(*t, *k)).collect(),
        }
    }

    fn years_to(&self, date: Date) -> SurfaceResult<f64> {
        years_between(self.day_count, self.base_date, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;
    use strata_config::{SabrConfig, SurfaceConfig};
    use strata_math::interpolation::{sabr_implied_volatility, SabrParameters};

    fn base() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    fn strikes() -> Vec<Decimal> {
        vec![dec!(90), dec!(100), dec!(110)]
    }

    fn plain() -> VolatilitySurface {
        VolatilitySurfaceBuilder::new("EQ", base())
            .table(
                &["1Y", "3M", "6M"],
                &strikes(),
                &[vec![0.22, 0.20, 0.21], vec![0.30, 0.25, 0.27], vec![0.26, 0.22, 0.24]],
            )
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_quotes_reproduced_at_terms() {
        let surface = plain();
        assert_relative_eq!(surface.value_by_term("3M".parse().unwrap(), 90.0).unwrap(), 0.30, epsilon = 1e-12);
        assert_relative_eq!(surface.value_by_term("6M".parse().unwrap(), 110.0).unwrap(), 0.24, epsilon = 1e-12);
        assert_relative_eq!(surface.value_by_term("12M".parse().unwrap(), 100.0).unwrap(), 0.20, epsilon = 1e-12);
    }

    #[test]
    fn test_mixed_unit_expiries_follow_calendar_order() {
        // from 1 Feb 2023: 2W is 15 Feb, 1M is 1 Mar, 30D is 3 Mar
        let february = Date::from_ymd(2023, 2, 1).unwrap();
        let surface = VolatilitySurfaceBuilder::new("EQ", february)
            .table(
                &["30D", "2W", "1M"],
                &[dec!(90), dec!(110)],
                &[vec![0.24, 0.22], vec![0.30, 0.28], vec![0.26, 0.25]],
            )
            .unwrap()
            .build()
            .unwrap();

        assert_relative_eq!(surface.value_by_term("2W".parse().unwrap(), 90.0).unwrap(), 0.30, epsilon = 1e-12);
        assert_relative_eq!(surface.value_by_term("1M".parse().unwrap(), 110.0).unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(surface.value_by_term("30D".parse().unwrap(), 90.0).unwrap(), 0.24, epsilon = 1e-12);
        assert_relative_eq!(
            surface.value_by_date(Date::from_ymd(2023, 3, 2).unwrap(), 110.0).unwrap(),
            0.235,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_expiries_on_the_same_date_rejected() {
        let february = Date::from_ymd(2023, 2, 1).unwrap();
        let err = VolatilitySurfaceBuilder::new("EQ", february)
            .table(&["4W", "1M"], &[dec!(100)], &[vec![0.24], vec![0.26]])
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidData { .. }));
        assert!(err.to_string().contains("same date 2023-03-01"), "{err}");
    }

    #[test]
    fn test_date_and_term_agree() {
        let surface = plain();
        let expiry = Date::from_ymd(2024, 7, 2).unwrap();
        assert_relative_eq!(
            surface.value_by_date(expiry, 95.0).unwrap(),
            surface.value_by_term("6M".parse().unwrap(), 95.0).unwrap()
        );
        assert!(surface.value_by_date(Date::from_ymd(2023, 12, 1).unwrap(), 95.0).is_err());
    }

    #[test]
    fn test_index_and_snapshot() {
        let surface = plain();
        assert_eq!(surface.len(), 9);
        let key = SurfaceKey::parse("3M", None, dec!(100)).unwrap();
        assert_eq!(surface.index_of(&key), Some(4));
        assert_eq!(surface.quote(&key), Some(0.25));

        let table = surface.surface().unwrap();
        let grid = table.to_grid();
        assert_eq!(grid[0], vec!["Expiry", "90", "100", "110"]);
        assert_eq!(grid[1][0], "3M");
        assert_eq!(grid[3], vec!["1Y", "0.22", "0.2", "0.21"]);
    }

    #[test]
    fn test_duplicate_and_missing_quotes() {
        let duplicate = VolatilitySurfaceBuilder::new("EQ", base())
            .point(VolatilityPoint::parse("1Y", None, dec!(100), 0.2).unwrap())
            .point(VolatilityPoint::parse("12M", None, dec!(100), 0.21).unwrap())
            .build();
        assert!(matches!(duplicate, Err(SurfaceError::DuplicateKey { .. })));

        let missing = VolatilitySurfaceBuilder::new("EQ", base())
            .table(&["3M", "1Y"], &strikes(), &[vec![0.3, 0.25, 0.27], vec![0.22, f64::NAN, 0.21]])
            .unwrap()
            .build()
            .unwrap_err();
        assert!(missing.to_string().contains("missing quote for expiry 1Y"));
    }

    #[test]
    fn test_tenor_slices() {
        let surface = VolatilitySurfaceBuilder::new("SWPN", base())
            .tenor_table("2Y", &["1Y", "2Y"], &[dec!(0.01), dec!(0.02)], &[vec![0.30, 0.28], vec![0.26, 0.24]])
            .unwrap()
            .tenor_table("10Y", &["1Y", "2Y"], &[dec!(0.01), dec!(0.02)], &[vec![0.20, 0.18], vec![0.16, 0.14]])
            .unwrap()
            .build()
            .unwrap();

        assert!(surface.has_tenor());
        assert_eq!(surface.tenors().len(), 2);
        assert!(surface.value(1.0, 0.01).is_err());

        let t = surface.grid(Some("2Y".parse().unwrap())).unwrap().times()[0];
        let two = surface.value_with_tenor(t, "2Y".parse().unwrap(), 0.01).unwrap();
        let ten = surface.value_with_tenor(t, "10Y".parse().unwrap(), 0.01).unwrap();
        let thirty = surface.value_with_tenor(t, "30Y".parse().unwrap(), 0.01).unwrap();
        let five = surface.value_with_tenor(t, "5Y".parse().unwrap(), 0.01).unwrap();
        assert_relative_eq!(two, 0.30, epsilon = 1e-12);
        assert_relative_eq!(ten, 0.20, epsilon = 1e-12);
        assert_relative_eq!(thirty, 0.20, epsilon = 1e-12);
        assert!(five < two && five > ten);

        let grid = surface.surface().unwrap().to_grid();
        assert_eq!(grid[0], vec!["Expiry", "Tenor", "0.01", "0.02"]);
        assert_eq!(grid.len(), 5);
    }

    #[test]
    fn test_sabr_smile_surface() {
        let truth = SabrParameters::new(0.4, 0.85, -0.3, 0.5).unwrap();
        let forward = 100.0;
        let relative = [dec!(0.7), dec!(0.8), dec!(0.9), dec!(1.0), dec!(1.1), dec!(1.2), dec!(1.3)];
        let builder = VolatilitySurfaceBuilder::new("SABR", base());
        let mut points = Vec::new();
        for expiry in ["1Y", "2Y"] {
            let t = years_between(DayCountConvention::default(), base(), expiry.parse::<Period>().unwrap().add_to(base()).unwrap()).unwrap();
            for k in relative {
                let vol = sabr_implied_volatility(&truth, forward, k.to_f64().unwrap() * forward, t).unwrap();
                points.push(VolatilityPoint::parse(expiry, None, k, vol).unwrap());
            }
        }

        let surface = builder
            .config(&SurfaceConfig::sabr())
            .forward(forward)
            .points(points)
            .build()
            .unwrap();
        let t = surface.grid(None).unwrap().times()[0];
        let expected = sabr_implied_volatility(&truth, forward, 95.0, t).unwrap();
        assert_relative_eq!(surface.value(t, 0.95).unwrap(), expected, epsilon = 5e-3);
    }

    #[test]
    fn test_parametric_smiles_need_forward() {
        let err = VolatilitySurfaceBuilder::new("SABR", base())
            .config(&SurfaceConfig::sabr().with_sabr(SabrConfig::default()))
            .table(&["1Y"], &strikes(), &[vec![0.3, 0.25, 0.27]])
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidConfig { .. }));
    }

    #[test]
    fn test_unknown_interpolation_rejected() {
        let config = SurfaceConfig::new("BAD").with_interpolation("Bogus", "LinearInterpolation");
        let err = VolatilitySurfaceBuilder::new("EQ", base())
            .config(&config)
            .table(&["1Y"], &strikes(), &[vec![0.3, 0.25, 0.27]])
            .unwrap()
            .build();
        assert!(err.is_err());
    }
}

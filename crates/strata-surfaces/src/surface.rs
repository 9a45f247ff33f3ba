//! Two-dimensional interpolated surfaces.
//!
//! A surface holds a dense grid of values over ascending expiry times (rows)
//! and ascending strikes (columns). Evaluation at `(t, k)` runs in two
//! passes: every strike column is interpolated in time to produce the smile
//! at `t`, then a fresh smile method is fitted across strikes and evaluated
//! at `k`. Parametric smiles (SABR, wing) are therefore fitted lazily at the
//! query expiry rather than once per row.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array2, ArrayView1};

use strata_math::interpolation::{
    FlatInterpolation, Interpolation, InterpolationKind, InterpolationRegistry,
};
use strata_math::{MathError, MathResult};

use crate::error::{SurfaceError, SurfaceResult};

/// Builds the strike-direction method for a given expiry time.
pub type SmileFactory = Arc<dyn Fn(f64) -> SurfaceResult<Box<dyn Interpolation>> + Send + Sync>;

/// Smile factory that clones a fixed prototype whatever the expiry.
#[must_use]
pub fn prototype_smile(prototype: Box<dyn Interpolation>) -> SmileFactory {
    Arc::new(move |_: f64| -> SurfaceResult<Box<dyn Interpolation>> { Ok(prototype.box_clone()) })
}

/// Creates a method from the registry, accepting any spelling
/// [`InterpolationKind`] parses for built-in names.
pub(crate) fn create_method(
    registry: &InterpolationRegistry,
    name: &str,
) -> SurfaceResult<Box<dyn Interpolation>> {
    match registry.create(name) {
        Ok(method) => Ok(method),
        Err(MathError::UnknownInterpolation { .. }) => {
            let kind: InterpolationKind = name.parse()?;
            Ok(registry.create(kind.name())?)
        }
        Err(e) => Err(e.into()),
    }
}

fn check_ascending(label: &str, values: &[f64]) -> SurfaceResult<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(SurfaceError::invalid_data(format!("{label} must be finite")));
    }
    if let Some(pair) = values.windows(2).find(|w| w[1] <= w[0]) {
        return Err(SurfaceError::invalid_data(format!(
            "{label} must be strictly ascending: {} then {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

/// Dense surface over (expiry time, strike).
#[derive(Clone)]
pub struct InterpolatedSurface {
    times: Vec<f64>,
    strikes: Vec<f64>,
    values: Array2<f64>,
    columns: Vec<Box<dyn Interpolation>>,
    smile: SmileFactory,
    allow_extrapolation: bool,
}

impl InterpolatedSurface {
    /// Builds the surface and initializes one time interpolation per strike.
    ///
    /// `values` is indexed `[row, column]` = `[time, strike]`. A surface
    /// with a single expiry row is flat in time.
    pub fn new(
        times: Vec<f64>,
        strikes: Vec<f64>,
        values: Array2<f64>,
        expiry_method: &dyn Interpolation,
        smile: SmileFactory,
        allow_extrapolation: bool,
    ) -> SurfaceResult<Self> {
        if times.is_empty() || strikes.is_empty() {
            return Err(SurfaceError::invalid_data("surface needs at least one expiry and one strike"));
        }
        if values.dim() != (times.len(), strikes.len()) {
            return Err(SurfaceError::invalid_data(format!(
                "grid is {:?} but axes are {} expiries by {} strikes",
                values.dim(),
                times.len(),
                strikes.len()
            )));
        }
        check_ascending("expiry times", &times)?;
        check_ascending("strikes", &strikes)?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SurfaceError::invalid_data("surface values must be finite"));
        }

        let columns = values
            .columns()
            .into_iter()
            .map(|column| Self::column_method(&times, column, expiry_method))
            .collect::<SurfaceResult<Vec<_>>>()?;

        Ok(Self {
            times,
            strikes,
            values,
            columns,
            smile,
            allow_extrapolation,
        })
    }

    fn column_method(
        times: &[f64],
        column: ArrayView1<'_, f64>,
        expiry_method: &dyn Interpolation,
    ) -> SurfaceResult<Box<dyn Interpolation>> {
        let ys = column.to_vec();
        if times.len() == 1 {
            return Ok(Box::new(FlatInterpolation::with_value(ys[0])));
        }
        let mut method = expiry_method.box_clone();
        method.initialize(times, &ys)?;
        Ok(method)
    }

    /// Expiry times of the rows, ascending.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Strikes of the columns, ascending.
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// The underlying grid.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Whether queries outside the grid extrapolate.
    pub fn allow_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    /// Values across all strikes at expiry `t`.
    pub fn smile_at(&self, t: f64) -> SurfaceResult<Vec<f64>> {
        self.columns
            .iter()
            .map(|column| column.value_at(t, self.allow_extrapolation).map_err(SurfaceError::from))
            .collect()
    }

    /// Fitted strike method at expiry `t`.
    pub fn smile_method(&self, t: f64) -> SurfaceResult<Box<dyn Interpolation>> {
        let smile = self.smile_at(t)?;
        let mut method = (self.smile)(t)?;
        method.initialize(&self.strikes, &smile)?;
        Ok(method)
    }

    /// Value at expiry `t` and strike `k`.
    pub fn value(&self, t: f64, k: f64) -> SurfaceResult<f64> {
        if let [strike] = *self.strikes.as_slice() {
            if !self.allow_extrapolation && k != strike {
                return Err(MathError::ExtrapolationNotAllowed {
                    x: k,
                    min: strike,
                    max: strike,
                }
                .into());
            }
            return self.columns[0]
                .value_at(t, self.allow_extrapolation)
                .map_err(SurfaceError::from);
        }
        let method = self.smile_method(t).map_err(|e| {
            tracing::warn!(expiry = t, error = %e, "smile fit failed");
            e
        })?;
        Ok(method.value_at(k, self.allow_extrapolation)?)
    }

    /// Values at a batch of `(t, k)` queries, in query order.
    pub fn values_at(&self, queries: &[(f64, f64)]) -> SurfaceResult<Vec<f64>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            queries.par_iter().map(|(t, k)| self.value(*t, *k)).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            queries.iter().map(|(t, k)| self.value(*t, *k)).collect()
        }
    }
}

impl fmt::Debug for InterpolatedSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpolatedSurface")
            .field("times", &self.times)
            .field("strikes", &self.strikes)
            .field("expiry_method", &self.columns.first().map(|c| c.name()))
            .field("allow_extrapolation", &self.allow_extrapolation)
            .finish_non_exhaustive()
    }
}

/// Strike interpolation that reads a surface column by column.
///
/// Lets an [`InterpolatedSurface`] act as the one-dimensional smile of a
/// fixed expiry, e.g. as the base curve of a spread method.
#[derive(Debug, Clone)]
pub struct SurfaceSlice {
    surface: Arc<InterpolatedSurface>,
    expiry: f64,
}

impl SurfaceSlice {
    /// Smile of `surface` at `expiry`.
    #[must_use]
    pub fn new(surface: Arc<InterpolatedSurface>, expiry: f64) -> Self {
        Self { surface, expiry }
    }
}

impl Interpolation for SurfaceSlice {
    fn name(&self) -> &'static str {
        "SurfaceSlice"
    }

    fn initialize(&mut self, _xs: &[f64], _ys: &[f64]) -> MathResult<()> {
        Err(MathError::invalid_input(
            "a surface slice reads its samples from the surface",
        ))
    }

    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        if let (Some(min), Some(max)) = (self.min_x(), self.max_x()) {
            if !allow_extrapolation && (x < min || x > max) {
                return Err(MathError::ExtrapolationNotAllowed { x, min, max });
            }
        }
        self.surface
            .value(self.expiry, x)
            .map_err(|e| match e {
                SurfaceError::Math(inner) => inner,
                other => MathError::invalid_input(other.to_string()),
            })
    }

    fn min_x(&self) -> Option<f64> {
        self.surface.strikes.first().copied()
    }

    fn max_x(&self) -> Option<f64> {
        self.surface.strikes.last().copied()
    }

    fn box_clone(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use strata_math::interpolation::{LinearInterpolation, SpreadInterpolation};

    fn bilinear(allow_extrapolation: bool) -> InterpolatedSurface {
        InterpolatedSurface::new(
            vec![1.0, 2.0],
            vec![90.0, 100.0, 110.0],
            array![[0.30, 0.20, 0.25], [0.26, 0.18, 0.21]],
            &LinearInterpolation::default(),
            prototype_smile(Box::new(LinearInterpolation::default())),
            allow_extrapolation,
        )
        .unwrap()
    }

    #[test]
    fn test_grid_nodes_round_trip() {
        let surface = bilinear(false);
        assert_relative_eq!(surface.value(1.0, 90.0).unwrap(), 0.30);
        assert_relative_eq!(surface.value(2.0, 110.0).unwrap(), 0.21);
        assert_relative_eq!(surface.value(2.0, 100.0).unwrap(), 0.18);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let surface = bilinear(false);
        // smile at t = 1.5 is [0.28, 0.19, 0.23]
        assert_relative_eq!(surface.value(1.5, 95.0).unwrap(), 0.235, epsilon = 1e-12);
        assert_relative_eq!(surface.value(1.5, 105.0).unwrap(), 0.21, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolation_policy() {
        let strict = bilinear(false);
        assert!(strict.value(3.0, 100.0).is_err());
        assert!(strict.value(1.5, 120.0).is_err());

        let loose = bilinear(true);
        // last-segment slope in time: 0.18 - 0.02
        assert_relative_eq!(loose.value(3.0, 100.0).unwrap(), 0.16, epsilon = 1e-12);
        // flat below the first expiry
        assert_relative_eq!(loose.value(0.5, 100.0).unwrap(), 0.20, epsilon = 1e-12);
    }

    #[test]
    fn test_single_row_and_column() {
        let row = InterpolatedSurface::new(
            vec![0.5],
            vec![90.0, 110.0],
            array![[0.3, 0.2]],
            &LinearInterpolation::default(),
            prototype_smile(Box::new(LinearInterpolation::default())),
            true,
        )
        .unwrap();
        assert_relative_eq!(row.value(4.0, 100.0).unwrap(), 0.25, epsilon = 1e-12);

        let column = InterpolatedSurface::new(
            vec![1.0, 2.0],
            vec![100.0],
            array![[0.2], [0.3]],
            &LinearInterpolation::default(),
            prototype_smile(Box::new(LinearInterpolation::default())),
            false,
        )
        .unwrap();
        assert_relative_eq!(column.value(1.5, 100.0).unwrap(), 0.25, epsilon = 1e-12);
        let err = column.value(1.5, 250.0).unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::Math(MathError::ExtrapolationNotAllowed { x, .. }) if x == 250.0
        ));
    }

    #[test]
    fn test_rejects_malformed_grids() {
        let linear = LinearInterpolation::default();
        let smile = prototype_smile(Box::new(LinearInterpolation::default()));
        assert!(InterpolatedSurface::new(
            vec![1.0, 2.0],
            vec![90.0],
            array![[0.2, 0.3]],
            &linear,
            smile.clone(),
            false
        )
        .is_err());
        assert!(InterpolatedSurface::new(
            vec![2.0, 1.0],
            vec![90.0],
            array![[0.2], [0.3]],
            &linear,
            smile.clone(),
            false
        )
        .is_err());
        assert!(InterpolatedSurface::new(
            vec![1.0],
            vec![90.0],
            array![[f64::NAN]],
            &linear,
            smile,
            false
        )
        .is_err());
    }

    #[test]
    fn test_batch_matches_single_queries() {
        let surface = bilinear(true);
        let queries = [(1.0, 90.0), (1.25, 97.5), (2.0, 110.0), (2.5, 85.0)];
        let batch = surface.values_at(&queries).unwrap();
        for ((t, k), v) in queries.iter().zip(batch) {
            assert_relative_eq!(surface.value(*t, *k).unwrap(), v);
        }
    }

    #[test]
    fn test_slice_as_spread_base() {
        let surface = Arc::new(bilinear(false));
        let mut spread = SpreadInterpolation::new(Arc::new(SurfaceSlice::new(surface, 1.0)));
        spread.initialize(&[90.0, 110.0], &[0.01, 0.01]).unwrap();
        assert_relative_eq!(spread.interpolate(100.0).unwrap(), 0.21, epsilon = 1e-12);
        assert!(spread.interpolate(120.0).is_err());
    }

    #[test]
    fn test_slice_keeps_range_error_kind() {
        let surface = Arc::new(bilinear(false));

        let inside = SurfaceSlice::new(surface.clone(), 1.0);
        let err = inside.value_at(130.0, false).unwrap_err();
        assert!(matches!(err, MathError::ExtrapolationNotAllowed { .. }));

        // the strike is quoted but the expiry is past the surface
        let late = SurfaceSlice::new(surface, 3.0);
        let err = late.value_at(100.0, true).unwrap_err();
        assert!(matches!(err, MathError::ExtrapolationNotAllowed { x, .. } if x == 3.0));
    }

    #[test]
    fn test_create_method_accepts_loose_names() {
        let registry = InterpolationRegistry::with_defaults();
        assert_eq!(create_method(&registry, "linearinterpolation").unwrap().name(), "LinearInterpolation");
        assert!(create_method(&registry, "Bogus").is_err());
    }
}

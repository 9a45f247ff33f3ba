//! Market environment.
//!
//! An owned, explicitly passed collection of named curves and volatility
//! surfaces together with the interpolation registry used to build them.
//! Consumers receive the environment by reference; there is no global
//! registry.

use std::collections::HashMap;
use std::sync::Arc;

use strata_config::{CurveConfig, SurfaceConfig};
use strata_core::Date;
use strata_math::interpolation::InterpolationRegistry;

use crate::curve::InterpolatedCurve;
use crate::error::{SurfaceError, SurfaceResult};
use crate::volatility::{VolatilityPoint, VolatilitySurface, VolatilitySurfaceBuilder};

/// Named curves and surfaces as of one valuation date.
///
/// # Example
///
/// ```rust
/// use strata_config::CurveConfig;
/// use strata_core::Date;
/// use strata_surfaces::MarketEnvironment;
///
/// let today = Date::from_ymd(2024, 1, 1).unwrap();
/// let env = MarketEnvironment::builder(today)
///     .curve_from_config(&CurveConfig::discount(), vec![0.5, 1.0], vec![0.99, 0.97])
///     .unwrap()
///     .build();
///
/// assert!(env.curve("DISCOUNT").is_ok());
/// assert!(env.curve("MISSING").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MarketEnvironment {
    valuation_date: Date,
    curves: HashMap<String, Arc<InterpolatedCurve>>,
    surfaces: HashMap<String, Arc<VolatilitySurface>>,
    registry: InterpolationRegistry,
}

impl MarketEnvironment {
    /// Creates a builder with the built-in interpolation methods.
    #[must_use]
    pub fn builder(valuation_date: Date) -> MarketEnvironmentBuilder {
        MarketEnvironmentBuilder::new(valuation_date)
    }

    /// Valuation date.
    #[must_use]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Registry used to resolve interpolation names.
    pub fn registry(&self) -> &InterpolationRegistry {
        &self.registry
    }

    /// Curve registered under `id`.
    pub fn curve(&self, id: &str) -> SurfaceResult<Arc<InterpolatedCurve>> {
        self.curves
            .get(id)
            .cloned()
            .ok_or_else(|| SurfaceError::curve_not_found(id))
    }

    /// Surface registered under `id`.
    pub fn surface(&self, id: &str) -> SurfaceResult<Arc<VolatilitySurface>> {
        self.surfaces
            .get(id)
            .cloned()
            .ok_or_else(|| SurfaceError::surface_not_found(id))
    }

    /// Discount factor to `date` from curve `id`.
    pub fn discount_factor(&self, id: &str, date: Date) -> SurfaceResult<f64> {
        self.curve(id)?.discount_factor(date)
    }

    /// Volatility from surface `id` at an expiry date and strike.
    pub fn volatility(&self, id: &str, expiry: Date, strike: f64) -> SurfaceResult<f64> {
        self.surface(id)?.value_by_date(expiry, strike)
    }

    /// Whether a curve is registered under `id`.
    #[must_use]
    pub fn has_curve(&self, id: &str) -> bool {
        self.curves.contains_key(id)
    }

    /// Whether a surface is registered under `id`.
    #[must_use]
    pub fn has_surface(&self, id: &str) -> bool {
        self.surfaces.contains_key(id)
    }

    /// Curve identifiers, sorted.
    #[must_use]
    pub fn curve_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.curves.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Surface identifiers, sorted.
    #[must_use]
    pub fn surface_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.surfaces.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Copy of the environment with `curve` added or replaced.
    ///
    /// Other entries are shared with the original.
    #[must_use]
    pub fn with_curve(mut self, curve: InterpolatedCurve) -> Self {
        self.curves.insert(curve.id().to_string(), Arc::new(curve));
        self
    }

    /// Copy of the environment with `surface` added or replaced.
    #[must_use]
    pub fn with_surface(mut self, surface: VolatilitySurface) -> Self {
        self.surfaces.insert(surface.id().to_string(), Arc::new(surface));
        self
    }
}

/// Builder for [`MarketEnvironment`].
#[derive(Debug, Clone)]
pub struct MarketEnvironmentBuilder {
    valuation_date: Date,
    curves: HashMap<String, Arc<InterpolatedCurve>>,
    surfaces: HashMap<String, Arc<VolatilitySurface>>,
    registry: InterpolationRegistry,
}

impl MarketEnvironmentBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(valuation_date: Date) -> Self {
        Self {
            valuation_date,
            curves: HashMap::new(),
            surfaces: HashMap::new(),
            registry: InterpolationRegistry::with_defaults(),
        }
    }

    /// Replaces the interpolation registry.
    #[must_use]
    pub fn registry(mut self, registry: InterpolationRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Adds a built curve under its own identifier.
    #[must_use]
    pub fn curve(mut self, curve: InterpolatedCurve) -> Self {
        self.curves.insert(curve.id().to_string(), Arc::new(curve));
        self
    }

    /// Adds a shared curve under `id`.
    #[must_use]
    pub fn shared_curve(mut self, id: impl Into<String>, curve: Arc<InterpolatedCurve>) -> Self {
        self.curves.insert(id.into(), curve);
        self
    }

    /// Builds a curve from `config` with this builder's registry.
    pub fn curve_from_config(
        self,
        config: &CurveConfig,
        times: Vec<f64>,
        values: Vec<f64>,
    ) -> SurfaceResult<Self> {
        let curve =
            InterpolatedCurve::from_config(config, &self.registry, self.valuation_date, times, values)?;
        Ok(self.curve(curve))
    }

    /// Adds a built surface under its own identifier.
    #[must_use]
    pub fn surface(mut self, surface: VolatilitySurface) -> Self {
        self.surfaces.insert(surface.id().to_string(), Arc::new(surface));
        self
    }

    /// Builds a surface named after `config` from quotes.
    pub fn surface_from_config(
        self,
        config: &SurfaceConfig,
        forward: Option<f64>,
        points: Vec<VolatilityPoint>,
    ) -> SurfaceResult<Self> {
        let mut builder = VolatilitySurfaceBuilder::new(config.name.clone(), self.valuation_date)
            .config(config)
            .points(points);
        if let Some(forward) = forward {
            builder = builder.forward(forward);
        }
        let surface = builder.build_with(&self.registry)?;
        Ok(self.surface(surface))
    }

    /// Finishes the environment.
    #[must_use]
    pub fn build(self) -> MarketEnvironment {
        tracing::debug!(
            curves = self.curves.len(),
            surfaces = self.surfaces.len(),
            valuation_date = %self.valuation_date,
            "built market environment"
        );
        MarketEnvironment {
            valuation_date: self.valuation_date,
            curves: self.curves,
            surfaces: self.surfaces,
            registry: self.registry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;
    use strata_math::interpolation::{FlatInterpolation, Interpolation};

    fn today() -> Date {
        Date::from_ymd(2024, 1, 1).unwrap()
    }

    fn quotes() -> Vec<VolatilityPoint> {
        vec![
            VolatilityPoint::parse("1Y", None, dec!(90), 0.25).unwrap(),
            VolatilityPoint::parse("1Y", None, dec!(110), 0.21).unwrap(),
        ]
    }

    #[test]
    fn test_lookup_and_missing_ids() {
        let env = MarketEnvironment::builder(today())
            .curve_from_config(&CurveConfig::discount(), vec![0.5, 1.0], vec![0.99, 0.97])
            .unwrap()
            .surface_from_config(&SurfaceConfig::bilinear(), None, quotes())
            .unwrap()
            .build();

        assert_eq!(env.curve_ids(), vec!["DISCOUNT"]);
        assert_eq!(env.surface_ids(), vec!["VOL.BILINEAR"]);
        assert!(env.has_curve("DISCOUNT"));
        assert!(!env.has_surface("DISCOUNT"));

        let err = env.curve("EUR").unwrap_err();
        assert_eq!(err, SurfaceError::CurveNotFound { id: "EUR".to_string() });
        let err = env.surface("EUR").unwrap_err();
        assert_eq!(err, SurfaceError::SurfaceNotFound { id: "EUR".to_string() });
        assert!(matches!(
            env.volatility("EUR", today(), 100.0),
            Err(SurfaceError::SurfaceNotFound { .. })
        ));

        let vol = env.volatility("VOL.BILINEAR", Date::from_ymd(2024, 12, 31).unwrap(), 100.0).unwrap();
        assert_relative_eq!(vol, 0.23, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_registry_is_used() {
        let mut registry = InterpolationRegistry::new();
        registry.register(
            "Constant",
            Arc::new(|| Box::new(FlatInterpolation::default()) as Box<dyn Interpolation>),
        );
        let config = CurveConfig::new("FLAT").with_interpolation("LinearInterpolation");

        let env = MarketEnvironment::builder(today()).registry(registry);
        assert!(env.clone().curve_from_config(&config, vec![0.0, 1.0], vec![1.0, 1.0]).is_err());

        let method = env.registry.create("Constant").unwrap();
        let curve = InterpolatedCurve::new(
            "FLAT",
            today(),
            config.day_count,
            vec![0.0, 1.0],
            vec![0.5, 0.7],
            method,
        )
        .unwrap();
        let env = env.curve(curve).build();
        assert_relative_eq!(env.curve("FLAT").unwrap().value_at(0.9).unwrap(), 0.5);
    }

    #[test]
    fn test_with_curve_shares_other_entries() {
        let env = MarketEnvironment::builder(today())
            .curve_from_config(&CurveConfig::discount(), vec![0.5, 1.0], vec![0.99, 0.97])
            .unwrap()
            .build();
        let original = env.curve("DISCOUNT").unwrap();

        let replacement = InterpolatedCurve::from_config(
            &CurveConfig::log_linear_discount(),
            env.registry(),
            today(),
            vec![0.5, 1.0],
            vec![0.98, 0.96],
        )
        .unwrap();
        let bumped = env.clone().with_curve(replacement);

        assert!(Arc::ptr_eq(&original, &env.curve("DISCOUNT").unwrap()));
        assert!(bumped.has_curve("DISCOUNT.LOGLINEAR"));
        assert!(Arc::ptr_eq(&original, &bumped.curve("DISCOUNT").unwrap()));
    }
}

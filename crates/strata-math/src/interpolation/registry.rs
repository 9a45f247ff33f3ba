//! Name-keyed construction of interpolation methods.
//!
//! Surfaces and configuration files name their interpolation by string
//! (`"LinearInterpolation"`, `"SABRModelInterpolation"`, ...). The registry
//! maps those names to factories producing fresh, uninitialized instances.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::{
    CommodityBasisSpreadInterpolation, CubicHermiteSplineInterpolation, FlatInterpolation,
    Interpolation, LinearInterpolation, LinearRateInterpolation, LogLinearInterpolation,
    PiecewiseConstantInterpolation, PiecewiseConstantZeroRateInterpolation,
    RateBasisSpreadInterpolation, SabrModelInterpolation, SpreadInterpolation,
    WingModelInterpolation,
};
use crate::error::{MathError, MathResult};

/// Produces a fresh, uninitialized interpolation.
pub type InterpolationFactory = Arc<dyn Fn() -> Box<dyn Interpolation> + Send + Sync>;

/// Built-in interpolation methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InterpolationKind {
    /// [`FlatInterpolation`]
    Flat,
    /// [`LinearInterpolation`]
    Linear,
    /// [`LogLinearInterpolation`]
    LogLinear,
    /// [`LinearRateInterpolation`]
    LinearRate,
    /// [`PiecewiseConstantInterpolation`]
    PiecewiseConstant,
    /// [`PiecewiseConstantZeroRateInterpolation`]
    PiecewiseConstantZeroRate,
    /// [`CubicHermiteSplineInterpolation`]
    CubicHermiteSpline,
    /// [`SpreadInterpolation`]
    Spread,
    /// [`CommodityBasisSpreadInterpolation`]
    CommodityBasisSpread,
    /// [`RateBasisSpreadInterpolation`]
    RateBasisSpread,
    /// [`WingModelInterpolation`]
    WingModel,
    /// [`SabrModelInterpolation`]
    SabrModel,
}

impl InterpolationKind {
    /// Every built-in kind.
    pub const ALL: [InterpolationKind; 12] = [
        Self::Flat,
        Self::Linear,
        Self::LogLinear,
        Self::LinearRate,
        Self::PiecewiseConstant,
        Self::PiecewiseConstantZeroRate,
        Self::CubicHermiteSpline,
        Self::Spread,
        Self::CommodityBasisSpread,
        Self::RateBasisSpread,
        Self::WingModel,
        Self::SabrModel,
    ];

    /// Registry name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flat => "FlatInterpolation",
            Self::Linear => "LinearInterpolation",
            Self::LogLinear => "LogLinearInterpolation",
            Self::LinearRate => "LinearRateInterpolation",
            Self::PiecewiseConstant => "PiecewiseConstantInterpolation",
            Self::PiecewiseConstantZeroRate => "PiecewiseConstantZeroRateInterpolation",
            Self::CubicHermiteSpline => "CubicHermiteSplineInterpolation",
            Self::Spread => "SpreadInterpolation",
            Self::CommodityBasisSpread => "CommodityBasisSpreadInterpolation",
            Self::RateBasisSpread => "RateBasisSpreadInterpolation",
            Self::WingModel => "WingModelInterpolation",
            Self::SabrModel => "SABRModelInterpolation",
        }
    }

    /// Fresh, uninitialized instance with default settings.
    ///
    /// Spread kinds come without a base; attach one with
    /// [`Interpolation::set_base`] before initializing.
    pub fn create(&self) -> Box<dyn Interpolation> {
        match self {
            Self::Flat => Box::new(FlatInterpolation::default()),
            Self::Linear => Box::new(LinearInterpolation::default()),
            Self::LogLinear => Box::new(LogLinearInterpolation::default()),
            Self::LinearRate => Box::new(LinearRateInterpolation::default()),
            Self::PiecewiseConstant => Box::new(PiecewiseConstantInterpolation::default()),
            Self::PiecewiseConstantZeroRate => {
                Box::new(PiecewiseConstantZeroRateInterpolation::default())
            }
            Self::CubicHermiteSpline => Box::new(CubicHermiteSplineInterpolation::default()),
            Self::Spread => Box::new(SpreadInterpolation::default()),
            Self::CommodityBasisSpread => Box::new(CommodityBasisSpreadInterpolation::default()),
            Self::RateBasisSpread => Box::new(RateBasisSpreadInterpolation::default()),
            Self::WingModel => Box::new(WingModelInterpolation::default()),
            Self::SabrModel => Box::new(SabrModelInterpolation::default()),
        }
    }
}

impl fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationKind {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| MathError::UnknownInterpolation {
                name: s.to_string(),
            })
    }
}

/// Interpolation factories keyed by name.
///
/// ```rust
/// use strata_math::interpolation::InterpolationRegistry;
///
/// let registry = InterpolationRegistry::with_defaults();
/// let mut method = registry.create("LinearInterpolation").unwrap();
/// method.initialize(&[0.0, 1.0], &[1.0, 3.0]).unwrap();
/// assert_eq!(method.interpolate(0.5).unwrap(), 2.0);
/// assert!(registry.create("Bogus").is_err());
/// ```
#[derive(Clone, Default)]
pub struct InterpolationRegistry {
    factories: BTreeMap<String, InterpolationFactory>,
}

impl InterpolationRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in method.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in InterpolationKind::ALL {
            registry.register(kind.name(), Arc::new(move || kind.create()));
        }
        registry
    }

    /// Registers or replaces a factory, returning the one it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: InterpolationFactory,
    ) -> Option<InterpolationFactory> {
        self.factories.insert(name.into(), factory)
    }

    /// Fresh instance of the named method.
    pub fn create(&self, name: &str) -> MathResult<Box<dyn Interpolation>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| MathError::UnknownInterpolation {
                name: name.to_string(),
            })
    }

    /// Whether a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for InterpolationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpolationRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

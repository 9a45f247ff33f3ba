//! Volatility surface configuration.

use serde::{Deserialize, Serialize};

use strata_core::daycounts::DayCountConvention;

use crate::error::{check_interpolation, Validate, ValidationError};
use crate::smile::{SabrConfig, WingConfig};

/// Configuration for an expiry by strike surface.
///
/// Each strike column is interpolated across expiries with
/// `expiry_interpolation`; the resulting smile at the query expiry is then
/// interpolated across strikes with `strike_interpolation`. When the strike
/// method is a smile model, `sabr` or `wing` supplies its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Configuration name/identifier.
    pub name: String,

    /// Description of this configuration.
    #[serde(default)]
    pub description: Option<String>,

    /// Interpolation across expiries.
    #[serde(default = "default_linear")]
    pub expiry_interpolation: String,

    /// Interpolation across strikes.
    #[serde(default = "default_linear")]
    pub strike_interpolation: String,

    /// Day count turning expiry dates into years.
    #[serde(default)]
    pub day_count: DayCountConvention,

    /// Whether evaluation outside the grid extrapolates.
    #[serde(default)]
    pub allow_extrapolation: bool,

    /// SABR settings, used when the strike method is SABR.
    #[serde(default)]
    pub sabr: SabrConfig,

    /// Wing settings, used when the strike method is the wing model.
    #[serde(default)]
    pub wing: WingConfig,

    /// Whether this configuration is read-only.
    #[serde(default)]
    pub read_only: bool,
}

fn default_linear() -> String {
    "LinearInterpolation".to_string()
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::new("DEFAULT")
    }
}

impl SurfaceConfig {
    /// Creates a bilinear surface configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            expiry_interpolation: default_linear(),
            strike_interpolation: default_linear(),
            day_count: DayCountConvention::default(),
            allow_extrapolation: false,
            sabr: SabrConfig::default(),
            wing: WingConfig::default(),
            read_only: false,
        }
    }

    /// Bilinear surface, extrapolating flat-then-sloped at the edges.
    pub fn bilinear() -> Self {
        Self {
            description: Some("Linear in expiry and in strike".to_string()),
            allow_extrapolation: true,
            read_only: true,
            ..Self::new("VOL.BILINEAR")
        }
    }

    /// SABR smile per expiry, linear in expiry.
    pub fn sabr() -> Self {
        Self {
            description: Some("SABR smile per expiry".to_string()),
            strike_interpolation: "SABRModelInterpolation".to_string(),
            read_only: true,
            ..Self::new("VOL.SABR")
        }
    }

    /// Wing smile per expiry, linear in expiry.
    pub fn wing() -> Self {
        Self {
            description: Some("Wing model smile per expiry".to_string()),
            strike_interpolation: "WingModelInterpolation".to_string(),
            read_only: true,
            ..Self::new("VOL.WING")
        }
    }

    /// Builder method to set both interpolation methods.
    pub fn with_interpolation(
        mut self,
        expiry: impl Into<String>,
        strike: impl Into<String>,
    ) -> Self {
        self.expiry_interpolation = expiry.into();
        self.strike_interpolation = strike.into();
        self
    }

    /// Builder method to set day count.
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Builder method to allow extrapolation.
    pub fn with_extrapolation(mut self, allow: bool) -> Self {
        self.allow_extrapolation = allow;
        self
    }

    /// Builder method to set SABR settings.
    pub fn with_sabr(mut self, sabr: SabrConfig) -> Self {
        self.sabr = sabr;
        self
    }

    /// Builder method to set wing settings.
    pub fn with_wing(mut self, wing: WingConfig) -> Self {
        self.wing = wing;
        self
    }
}

impl Validate for SurfaceConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(ValidationError::new("name", "Name cannot be empty"));
        }

        check_interpolation("expiry_interpolation", &self.expiry_interpolation, &mut errors);
        check_interpolation("strike_interpolation", &self.strike_interpolation, &mut errors);

        errors.extend(self.sabr.validate().into_iter().map(|e| e.nested("sabr")));
        errors.extend(self.wing.validate().into_iter().map(|e| e.nested("wing")));

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_surfaces_are_valid() {
        for config in [SurfaceConfig::bilinear(), SurfaceConfig::sabr(), SurfaceConfig::wing()] {
            assert!(config.is_valid(), "{}: {:?}", config.name, config.validate());
        }
    }

    #[test]
    fn test_nested_errors_are_prefixed() {
        let config = SurfaceConfig::new("S").with_sabr(SabrConfig {
            beta: -1.0,
            ..SabrConfig::default()
        });
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "sabr.beta");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SurfaceConfig::sabr().with_extrapolation(true);
        let text = toml::to_string(&config).unwrap();
        let back: SurfaceConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}

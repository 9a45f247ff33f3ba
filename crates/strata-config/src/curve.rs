//! Interpolated curve configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use strata_core::daycounts::DayCountConvention;

use crate::error::{check_interpolation, Validate, ValidationError};

/// Configuration for a one-dimensional term curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Configuration name/identifier.
    pub name: String,

    /// Description of this configuration.
    #[serde(default)]
    pub description: Option<String>,

    /// Registry name of the interpolation method.
    #[serde(default = "default_curve_interpolation")]
    pub interpolation: String,

    /// Day count used to turn dates into curve times.
    #[serde(default)]
    pub day_count: DayCountConvention,

    /// Whether evaluation outside the pillars extrapolates.
    #[serde(default)]
    pub allow_extrapolation: bool,

    /// Whether this configuration is read-only.
    #[serde(default)]
    pub read_only: bool,

    /// Configuration metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

fn default_curve_interpolation() -> String {
    "LinearRateInterpolation".to_string()
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self::discount()
    }
}

impl CurveConfig {
    /// Creates a new curve configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            interpolation: default_curve_interpolation(),
            day_count: DayCountConvention::default(),
            allow_extrapolation: false,
            read_only: false,
            metadata: HashMap::new(),
        }
    }

    /// Discount curve, linear in zero rates.
    pub fn discount() -> Self {
        Self {
            description: Some("Discount factors interpolated linearly in zero rate".to_string()),
            allow_extrapolation: true,
            read_only: true,
            ..Self::new("DISCOUNT")
        }
    }

    /// Discount curve, linear in log discount factors.
    pub fn log_linear_discount() -> Self {
        Self {
            description: Some("Discount factors interpolated log-linearly".to_string()),
            interpolation: "LogLinearInterpolation".to_string(),
            allow_extrapolation: true,
            read_only: true,
            ..Self::new("DISCOUNT.LOGLINEAR")
        }
    }

    /// Smooth curve of rates or spreads.
    pub fn hermite() -> Self {
        Self {
            description: Some("Cubic Hermite spline through the pillars".to_string()),
            interpolation: "CubicHermiteSplineInterpolation".to_string(),
            read_only: true,
            ..Self::new("RATE.HERMITE")
        }
    }

    /// Builder method to set the interpolation method.
    pub fn with_interpolation(mut self, name: impl Into<String>) -> Self {
        self.interpolation = name.into();
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

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Validate for CurveConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(ValidationError::new("name", "Name cannot be empty"));
        }

        check_interpolation("interpolation", &self.interpolation, &mut errors);

        errors
    }
}

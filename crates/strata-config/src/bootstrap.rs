//! Bootstrap solver configuration.

use serde::{Deserialize, Serialize};

use strata_core::daycounts::DayCountConvention;
use strata_math::solvers::SolverConfig;

use crate::error::{check_interpolation, Validate, ValidationError};

/// Settings shared by the credit-foncier and zero-curve bootstraps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Configuration name/identifier.
    pub name: String,

    /// Newton-Raphson convergence tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Newton-Raphson iteration cap.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Initial repayment guess as a fraction of the principal.
    #[serde(default = "default_initial_guess_fraction")]
    pub initial_guess_fraction: f64,

    /// Day count for period year fractions.
    #[serde(default)]
    pub day_count: DayCountConvention,

    /// Interpolation of the bootstrapped discount curve.
    #[serde(default = "default_curve_interpolation")]
    pub curve_interpolation: String,

    /// Whether this configuration is read-only.
    #[serde(default)]
    pub read_only: bool,
}

fn default_tolerance() -> f64 {
    1e-10
}

fn default_max_iterations() -> u32 {
    10
}

fn default_initial_guess_fraction() -> f64 {
    0.5
}

fn default_curve_interpolation() -> String {
    "LinearRateInterpolation".to_string()
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self::new("DEFAULT")
    }
}

impl BootstrapConfig {
    /// Creates a bootstrap configuration with standard solver settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            initial_guess_fraction: default_initial_guess_fraction(),
            day_count: DayCountConvention::default(),
            curve_interpolation: default_curve_interpolation(),
            read_only: false,
        }
    }

    /// Standard settings, registered read-only.
    pub fn standard() -> Self {
        Self {
            read_only: true,
            ..Self::new("STANDARD")
        }
    }

    /// Builder method to set the solver tolerance and iteration cap.
    pub fn with_solver(mut self, tolerance: f64, max_iterations: u32) -> Self {
        self.tolerance = tolerance;
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method to set day count.
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Root-finder settings.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }
}

impl Validate for BootstrapConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(ValidationError::new("name", "Name cannot be empty"));
        }

        if self.tolerance <= 0.0 || self.tolerance > 1e-4 {
            errors.push(ValidationError::with_rule(
                "tolerance",
                "Tolerance must be between 0 and 1e-4",
                "valid_tolerance",
            ));
        }

        if self.max_iterations == 0 || self.max_iterations > 10_000 {
            errors.push(ValidationError::with_rule(
                "max_iterations",
                "Max iterations must be between 1 and 10000",
                "valid_iterations",
            ));
        }

        if !(self.initial_guess_fraction > 0.0) {
            errors.push(ValidationError::new(
                "initial_guess_fraction",
                "Initial guess fraction must be positive",
            ));
        }

        check_interpolation("curve_interpolation", &self.curve_interpolation, &mut errors);

        errors
    }
}

//! Smile model calibration settings.

use serde::{Deserialize, Serialize};

use strata_math::interpolation::{SabrCalibrator, WingParameters};
use strata_math::optimization::OptimizationConfig;

use crate::error::{Validate, ValidationError};

/// SABR calibration settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SabrConfig {
    /// Fixed CEV exponent.
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// RMS volatility error accepted by the first fit.
    #[serde(default = "default_sabr_tolerance")]
    pub tolerance: f64,

    /// RMS volatility error above which calibration fails.
    #[serde(default = "default_sabr_max_error")]
    pub max_error: f64,

    /// Halton points drawn when the first fit misses `tolerance`.
    #[serde(default = "default_halton_points")]
    pub halton_points: usize,

    /// Best Halton points re-optimized.
    #[serde(default = "default_restarts")]
    pub restarts: usize,

    /// Simplex iteration cap per run.
    #[serde(default = "default_sabr_iterations")]
    pub max_iterations: u32,

    /// Whether strikes are quoted relative to the forward.
    #[serde(default = "default_true")]
    pub relative_strikes: bool,
}

fn default_beta() -> f64 {
    0.85
}

fn default_sabr_tolerance() -> f64 {
    1e-4
}

fn default_sabr_max_error() -> f64 {
    5e-3
}

fn default_halton_points() -> usize {
    1_500
}

fn default_restarts() -> usize {
    5
}

fn default_sabr_iterations() -> u32 {
    1_000
}

fn default_true() -> bool {
    true
}

impl Default for SabrConfig {
    fn default() -> Self {
        Self {
            beta: default_beta(),
            tolerance: default_sabr_tolerance(),
            max_error: default_sabr_max_error(),
            halton_points: default_halton_points(),
            restarts: default_restarts(),
            max_iterations: default_sabr_iterations(),
            relative_strikes: true,
        }
    }
}

impl SabrConfig {
    /// Calibrator carrying these settings.
    pub fn calibrator(&self) -> SabrCalibrator {
        SabrCalibrator {
            beta: self.beta,
            tolerance: self.tolerance,
            max_error: self.max_error,
            halton_points: self.halton_points,
            restarts: self.restarts,
            optimization: OptimizationConfig::default().with_max_iterations(self.max_iterations),
        }
    }
}

impl Validate for SabrConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.beta) {
            errors.push(ValidationError::with_rule(
                "beta",
                "Beta must be between 0 and 1",
                "unit_interval",
            ));
        }

        if !(self.tolerance > 0.0) || self.tolerance > self.max_error {
            errors.push(ValidationError::with_rule(
                "tolerance",
                "Tolerance must be positive and no larger than max_error",
                "valid_tolerance",
            ));
        }

        if self.max_iterations == 0 {
            errors.push(ValidationError::with_rule(
                "max_iterations",
                "Max iterations must be positive",
                "valid_iterations",
            ));
        }

        if self.restarts > self.halton_points {
            errors.push(ValidationError::new(
                "restarts",
                "Restarts cannot exceed the number of Halton points",
            ));
        }

        errors
    }
}

/// Wing model shape settings.
///
/// The fitted quantities (ATM vol, slope, curvatures) come from market
/// data; these are the fixed shape parameters they are fitted under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WingConfig {
    /// Log-moneyness where the put wing starts.
    #[serde(default = "default_down_cutoff")]
    pub down_cutoff: f64,

    /// Log-moneyness where the call wing starts.
    #[serde(default = "default_up_cutoff")]
    pub up_cutoff: f64,

    /// Down smoothing range as a fraction of the cutoff.
    #[serde(default = "default_smoothing")]
    pub down_smoothing: f64,

    /// Up smoothing range as a fraction of the cutoff.
    #[serde(default = "default_smoothing")]
    pub up_smoothing: f64,

    /// Skew swimmingness rate in percent.
    #[serde(default = "default_ssr")]
    pub ssr: f64,

    /// Volatility change rate.
    #[serde(default)]
    pub vcr: f64,

    /// Slope change rate.
    #[serde(default)]
    pub scr: f64,
}

fn default_down_cutoff() -> f64 {
    -0.5
}

fn default_up_cutoff() -> f64 {
    0.5
}

fn default_smoothing() -> f64 {
    0.5
}

fn default_ssr() -> f64 {
    100.0
}

impl Default for WingConfig {
    fn default() -> Self {
        Self {
            down_cutoff: default_down_cutoff(),
            up_cutoff: default_up_cutoff(),
            down_smoothing: default_smoothing(),
            up_smoothing: default_smoothing(),
            ssr: default_ssr(),
            vcr: 0.0,
            scr: 0.0,
        }
    }
}

impl WingConfig {
    /// Unfitted wing parameters centred on the given forwards.
    pub fn parameters(&self, reference_forward: f64, forward: f64) -> WingParameters {
        WingParameters {
            down_cutoff: self.down_cutoff,
            up_cutoff: self.up_cutoff,
            down_smoothing: self.down_smoothing,
            up_smoothing: self.up_smoothing,
            ssr: self.ssr,
            vcr: self.vcr,
            scr: self.scr,
            reference_forward,
            forward,
            ..WingParameters::default()
        }
    }
}

impl Validate for WingConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.down_cutoff >= 0.0 {
            errors.push(ValidationError::with_rule(
                "down_cutoff",
                "Down cutoff must be negative",
                "negative_cutoff",
            ));
        }

        if self.up_cutoff <= 0.0 {
            errors.push(ValidationError::with_rule(
                "up_cutoff",
                "Up cutoff must be positive",
                "positive_cutoff",
            ));
        }

        if self.down_smoothing <= 0.0 || self.up_smoothing <= 0.0 {
            errors.push(ValidationError::with_rule(
                "smoothing",
                "Smoothing ranges must be positive",
                "positive_smoothing",
            ));
        }

        if !(0.0..=100.0).contains(&self.ssr) {
            errors.push(ValidationError::with_rule(
                "ssr",
                "Skew swimmingness rate must be between 0 and 100",
                "percent",
            ));
        }

        errors
    }
}

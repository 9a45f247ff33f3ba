//! Error types for surface, curve and bootstrap operations.

use strata_config::ConfigError;
use strata_core::StrataError;
use strata_math::MathError;
use thiserror::Error;

/// A specialized Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Error types for surface, curve and bootstrap operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// The same composite key appears twice in the input.
    #[error("Duplicate surface key: {key}")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// A key has no entry in the surface index.
    #[error("Surface key not found: {key}")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },

    /// An expiry or tenor could not be read as a calendar period.
    #[error("Invalid period '{input}': {reason}")]
    InvalidPeriod {
        /// The offending text.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Surface or curve input is malformed.
    #[error("Invalid data: {reason}")]
    InvalidData {
        /// Description of the problem.
        reason: String,
    },

    /// A bootstrap could not solve for one of its unknowns.
    #[error("Bootstrap failed for {instrument}: {reason}")]
    BootstrapFailed {
        /// Instrument or schedule being solved.
        instrument: String,
        /// Underlying failure.
        reason: String,
    },

    /// No curve is registered under the identifier.
    #[error("Curve not found: {id}")]
    CurveNotFound {
        /// The requested identifier.
        id: String,
    },

    /// No volatility surface is registered under the identifier.
    #[error("Surface not found: {id}")]
    SurfaceNotFound {
        /// The requested identifier.
        id: String,
    },

    /// Configuration was rejected.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Validation or lookup failure.
        reason: String,
    },

    /// Numerical failure in interpolation, calibration or root finding.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Date, period or schedule failure.
    #[error(transparent)]
    Core(#[from] StrataError),
}

impl SurfaceError {
    /// Creates a duplicate key error.
    #[must_use]
    pub fn duplicate_key(key: impl std::fmt::Display) -> Self {
        Self::DuplicateKey {
            key: key.to_string(),
        }
    }

    /// Creates a key not found error.
    #[must_use]
    pub fn key_not_found(key: impl std::fmt::Display) -> Self {
        Self::KeyNotFound {
            key: key.to_string(),
        }
    }

    /// Creates an invalid data error.
    #[must_use]
    pub fn invalid_data(reason: impl Into<String>) -> Self {
        Self::InvalidData {
            reason: reason.into(),
        }
    }

    /// Creates a bootstrap failure.
    #[must_use]
    pub fn bootstrap_failed(instrument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BootstrapFailed {
            instrument: instrument.into(),
            reason: reason.into(),
        }
    }

    /// Creates a curve not found error.
    #[must_use]
    pub fn curve_not_found(id: impl Into<String>) -> Self {
        Self::CurveNotFound { id: id.into() }
    }

    /// Creates a surface not found error.
    #[must_use]
    pub fn surface_not_found(id: impl Into<String>) -> Self {
        Self::SurfaceNotFound { id: id.into() }
    }
}

impl From<ConfigError> for SurfaceError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let math: SurfaceError = MathError::ExtrapolationNotAllowed {
            x: 4.0,
            min: 1.0,
            max: 3.0,
        }
        .into();
        assert!(math.to_string().contains("does not support extrapolation"));

        let core: SurfaceError = StrataError::invalid_period("3Q", "unknown unit").into();
        assert_eq!(core.to_string(), "Invalid period '3Q': unknown unit");
    }

    #[test]
    fn test_helpers() {
        assert_eq!(
            SurfaceError::duplicate_key("1Y/100").to_string(),
            "Duplicate surface key: 1Y/100"
        );
        assert_eq!(
            SurfaceError::bootstrap_failed("5Y swap", "no root").to_string(),
            "Bootstrap failed for 5Y swap: no root"
        );
        assert_eq!(
            SurfaceError::surface_not_found("EQ.VOL").to_string(),
            "Surface not found: EQ.VOL"
        );
    }
}

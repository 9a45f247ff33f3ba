//! Error types for calendar and schedule operations.

use thiserror::Error;

/// A specialized Result type for Strata core operations.
pub type StrataResult<T> = Result<T, StrataError>;

/// Errors raised by dates, periods, day counts and schedules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrataError {
    /// Invalid calendar date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A period string or value could not be interpreted.
    #[error("Invalid period '{input}': {reason}")]
    InvalidPeriod {
        /// The offending text or value.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Unknown roll convention.
    #[error("Invalid roll convention: {input}")]
    InvalidRollConvention {
        /// The offending text.
        input: String,
    },

    /// Unknown day count convention.
    #[error("Unknown day count convention: {input}")]
    UnknownDayCount {
        /// The offending text.
        input: String,
    },

    /// Schedule generation failed.
    #[error("Schedule error: {reason}")]
    Schedule {
        /// Description of the failure.
        reason: String,
    },
}

impl StrataError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates a schedule error.
    #[must_use]
    pub fn schedule(reason: impl Into<String>) -> Self {
        Self::Schedule {
            reason: reason.into(),
        }
    }
}

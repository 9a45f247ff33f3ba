//! Day count conventions.
//!
//! A day count turns a pair of dates into an elapsed year fraction. Curve
//! and surface builders use it to place dated market points on a time axis,
//! and the amortization bootstrap uses it for per-period accrual.
//!
//! | Convention | Year fraction |
//! |------------|---------------|
//! | [`Act360`] | actual days / 360 |
//! | [`Act365Fixed`] | actual days / 365 |
//! | [`ActActIsda`] | days in leap years / 366 + other days / 365 |
//! | [`Thirty360`] | 30/360 bond basis |
//!
//! ```rust
//! use strata_core::daycounts::DayCountConvention;
//! use strata_core::types::Date;
//! use rust_decimal_macros::dec;
//!
//! let dc: DayCountConvention = "ACT/365".parse().unwrap();
//! let start = Date::from_ymd(2023, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 1, 1).unwrap();
//! assert_eq!(dc.year_fraction(start, end), dec!(1));
//! ```

mod actual;
mod thirty360;

pub use actual::{Act360, Act365Fixed, ActActIsda};
pub use thirty360::Thirty360;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StrataError;
use crate::types::Date;

/// A day count convention.
pub trait DayCount: Send + Sync {
    /// Market name of the convention (e.g. `"ACT/360"`).
    fn name(&self) -> &'static str;

    /// Year fraction between two dates; negative when `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Day count between two dates under the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Runtime selector for the supported day counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayCountConvention {
    /// Actual/360.
    Act360,
    /// Actual/365 Fixed.
    #[default]
    Act365Fixed,
    /// Actual/Actual ISDA.
    ActActIsda,
    /// 30/360 bond basis.
    Thirty360,
}

impl DayCountConvention {
    /// Returns a boxed implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::Thirty360 => Box::new(Thirty360),
        }
    }

    /// Market name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Year fraction without boxing.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
            DayCountConvention::ActActIsda => ActActIsda.year_fraction(start, end),
            DayCountConvention::Thirty360 => Thirty360.year_fraction(start, end),
        }
    }

    /// All supported conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
            DayCountConvention::Thirty360,
        ]
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = StrataError;

    /// Accepts market names and the dotted FpML spellings
    /// (`"ACT/365.FIXED"`, `"ACT/ACT.ISDA"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('.', " ");
        match normalized.as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACTUAL/365 FIXED"
            | "ACT365" => Ok(DayCountConvention::Act365Fixed),
            "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTUAL/ACTUAL ISDA" => {
                Ok(DayCountConvention::ActActIsda)
            }
            "30/360" | "30/360 US" | "BOND" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(StrataError::UnknownDayCount {
                input: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for DayCountConvention {
    type Error = StrataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayCountConvention> for String {
    fn from(dc: DayCountConvention) -> Self {
        dc.name().to_string()
    }
}

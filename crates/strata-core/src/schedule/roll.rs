//! Roll conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{StrataError, StrataResult};
use crate::types::Date;

/// Rule fixing the day-of-month of generated roll dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RollConvention {
    /// Roll on the given day (1-30), clamped to the month length.
    Day(u32),
    /// Roll on the last day of the month.
    EndOfMonth,
    /// Keep whatever day the period arithmetic produced.
    #[default]
    None,
}

impl RollConvention {
    /// Creates a day-of-month roll.
    pub fn day(day: u32) -> StrataResult<Self> {
        if (1..=30).contains(&day) {
            Ok(RollConvention::Day(day))
        } else {
            Err(StrataError::InvalidRollConvention {
                input: day.to_string(),
            })
        }
    }

    /// Applies the convention to an unadjusted date.
    pub fn apply(&self, date: Date) -> StrataResult<Date> {
        match self {
            RollConvention::Day(day) => date.with_day_clamped(*day),
            RollConvention::EndOfMonth => Ok(date.end_of_month()),
            RollConvention::None => Ok(date),
        }
    }

    /// Infers the convention implied by an anchor date.
    ///
    /// Month-end anchors roll end-of-month, day 31 is treated the same way,
    /// everything else rolls on the anchor's day.
    #[must_use]
    pub fn from_anchor(date: Date) -> Self {
        if date.is_end_of_month() || date.day() == 31 {
            RollConvention::EndOfMonth
        } else {
            RollConvention::Day(date.day())
        }
    }
}

impl fmt::Display for RollConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollConvention::Day(day) => write!(f, "{day}"),
            RollConvention::EndOfMonth => f.write_str("EOM"),
            RollConvention::None => f.write_str("NONE"),
        }
    }
}

impl FromStr for RollConvention {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_uppercase();
        match text.as_str() {
            "EOM" => Ok(RollConvention::EndOfMonth),
            "NONE" => Ok(RollConvention::None),
            _ => text
                .parse::<u32>()
                .ok()
                .and_then(|day| RollConvention::day(day).ok())
                .ok_or_else(|| StrataError::InvalidRollConvention {
                    input: s.to_string(),
                }),
        }
    }
}

impl TryFrom<String> for RollConvention {
    type Error = StrataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RollConvention> for String {
    fn from(roll: RollConvention) -> Self {
        roll.to_string()
    }
}

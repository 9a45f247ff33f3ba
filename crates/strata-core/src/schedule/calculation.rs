//! Calculation periods with accrual fractions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::daycounts::DayCountConvention;
use crate::error::{StrataError, StrataResult};
use crate::types::Date;

/// One accrual period of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationPeriod {
    /// Accrual start (inclusive).
    pub start: Date,
    /// Accrual end (exclusive).
    pub end: Date,
    /// Year fraction of the period under the schedule's day count.
    pub year_fraction: Decimal,
}

impl CalculationPeriod {
    /// Calendar days in the period.
    #[must_use]
    pub fn days(&self) -> i64 {
        self.start.days_between(&self.end)
    }
}

/// Splits a strictly increasing date list into consecutive periods.
pub fn calculation_periods(
    dates: &[Date],
    day_count: DayCountConvention,
) -> StrataResult<Vec<CalculationPeriod>> {
    if dates.len() < 2 {
        return Err(StrataError::schedule(format!(
            "need at least two dates to form a period, got {}",
            dates.len()
        )));
    }
    dates
        .windows(2)
        .map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            if end <= start {
                return Err(StrataError::schedule(format!(
                    "dates must be strictly increasing: {start} then {end}"
                )));
            }
            Ok(CalculationPeriod {
                start,
                end,
                year_fraction: day_count.year_fraction(start, end),
            })
        })
        .collect()
}

//! Actual-days conventions.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::date::is_leap_year;
use crate::types::Date;

/// Actual/360.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(start.days_between(&end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/365 Fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(start.days_between(&end)) / Decimal::from(365)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/Actual ISDA: days falling in leap years count 1/366, others 1/365.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl ActActIsda {
    fn forward_fraction(start: Date, end: Date) -> Decimal {
        let mut total = Decimal::ZERO;
        let mut year = start.year();
        let mut from = start;
        while year <= end.year() {
            let next_year = Date::from_ymd(year + 1, 1, 1).unwrap_or(end);
            let to = if next_year < end { next_year } else { end };
            let basis = if is_leap_year(year) { 366 } else { 365 };
            total += Decimal::from(from.days_between(&to)) / Decimal::from(basis);
            from = to;
            year += 1;
        }
        total
    }
}

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if end < start {
            -Self::forward_fraction(end, start)
        } else {
            Self::forward_fraction(start, end)
        }
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

//! Calendar date used by schedules, curves and surfaces.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use crate::error::{StrataError, StrataResult};

/// An unadjusted calendar date.
///
/// Newtype over `chrono::NaiveDate`. Month arithmetic clamps the day to
/// the length of the target month, so 31 January plus one month is the last
/// day of February.
///
/// # Example
///
/// ```rust
/// use strata_core::types::Date;
///
/// let date = Date::from_ymd(2024, 1, 31).unwrap();
/// let next = date.add_months(1).unwrap();
/// assert_eq!(next, Date::from_ymd(2024, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a date from year, month and day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> StrataResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| StrataError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses an ISO 8601 date (`YYYY-MM-DD`).
    pub fn parse(s: &str) -> StrataResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| StrataError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Number of days in this date's month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Adds calendar days.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds calendar days, failing past the supported date range.
    pub fn checked_add_days(&self, days: i64) -> StrataResult<Self> {
        chrono::Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Date)
            .ok_or_else(|| StrataError::invalid_date(format!("{self} plus {days} days is out of range")))
    }

    /// Adds calendar months, clamping the day to the target month.
    pub fn add_months(&self, months: i32) -> StrataResult<Self> {
        let total = (self.year() * 12 + self.month() as i32 - 1)
            .checked_add(months)
            .ok_or_else(|| StrataError::invalid_date(format!("{self} plus {months} months overflows")))?;
        let year = total.div_euclid(12);
        let month = (total.rem_euclid(12) + 1) as u32;
        let day = self.day().min(days_in_month(year, month));
        Self::from_ymd(year, month, day)
    }

    /// Adds calendar years, clamping 29 February in non-leap years.
    pub fn add_years(&self, years: i32) -> StrataResult<Self> {
        let months = years
            .checked_mul(12)
            .ok_or_else(|| StrataError::invalid_date(format!("{self} plus {years} years overflows")))?;
        self.add_months(months)
    }

    /// Returns the same year and month with the day replaced.
    ///
    /// Days past the end of the month are clamped to the month end.
    pub fn with_day_clamped(&self, day: u32) -> StrataResult<Self> {
        if day == 0 {
            return Err(StrataError::invalid_date("day of month must be at least 1"));
        }
        Self::from_ymd(self.year(), self.month(), day.min(self.days_in_month()))
    }

    /// Signed number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Last calendar day of this date's month.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        let last = self.days_in_month();
        Date(self.0.with_day(last).unwrap_or(self.0))
    }

    /// True when the date is the last day of its month.
    #[must_use]
    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    /// True when both dates fall in the same calendar month.
    #[must_use]
    pub fn same_month(&self, other: &Date) -> bool {
        self.year() == other.year() && self.month() == other.month()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    /// Days from `other` to `self`.
    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

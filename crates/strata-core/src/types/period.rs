//! Calendar periods such as `"3M"` or `"10Y"`.
//!
//! A period is a multiplier and a unit. Periods of different units are
//! compared by elapsed time (see [`Period::cmp_interval`]), which is why
//! `Period` deliberately does not implement `Ord`: `12M` and `1Y` are
//! different values that describe the same interval.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{StrataError, StrataResult};
use crate::types::Date;

/// Largest multiplier accepted when parsing a period.
pub const MAX_MULTIPLIER: u32 = 100_000;

/// Unit of a calendar [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodUnit {
    /// Calendar days.
    Day,
    /// Weeks of seven days.
    Week,
    /// Calendar months.
    Month,
    /// Calendar years.
    Year,
}

impl PeriodUnit {
    /// Single-letter code used in period strings.
    #[must_use]
    pub fn code(&self) -> char {
        match self {
            PeriodUnit::Day => 'D',
            PeriodUnit::Week => 'W',
            PeriodUnit::Month => 'M',
            PeriodUnit::Year => 'Y',
        }
    }

    fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'D' => Some(PeriodUnit::Day),
            'W' => Some(PeriodUnit::Week),
            'M' => Some(PeriodUnit::Month),
            'Y' => Some(PeriodUnit::Year),
            _ => None,
        }
    }

    /// True for units that are counted in days (D, W).
    #[must_use]
    pub fn is_day_based(&self) -> bool {
        matches!(self, PeriodUnit::Day | PeriodUnit::Week)
    }
}

/// A calendar period: `multiplier` × `unit`.
///
/// # Example
///
/// ```rust
/// use strata_core::types::{Period, PeriodUnit};
/// use std::cmp::Ordering;
///
/// let three_months: Period = "3M".parse().unwrap();
/// assert_eq!(three_months.unit(), PeriodUnit::Month);
/// assert_eq!(three_months.cmp_interval(&"90D".parse().unwrap()), Ordering::Greater);
/// assert_eq!("12M".parse::<Period>().unwrap().cmp_interval(&"1Y".parse().unwrap()), Ordering::Equal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    multiplier: i32,
    unit: PeriodUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub const fn new(multiplier: i32, unit: PeriodUnit) -> Self {
        Self { multiplier, unit }
    }

    /// `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, PeriodUnit::Day)
    }

    /// `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, PeriodUnit::Week)
    }

    /// `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, PeriodUnit::Month)
    }

    /// `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, PeriodUnit::Year)
    }

    /// The multiplier.
    #[must_use]
    pub fn multiplier(&self) -> i32 {
        self.multiplier
    }

    /// The unit.
    #[must_use]
    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    /// Elapsed time in years: D/365, W·7/365, M/12, Y.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        let m = f64::from(self.multiplier);
        match self.unit {
            PeriodUnit::Day => m / 365.0,
            PeriodUnit::Week => m * 7.0 / 365.0,
            PeriodUnit::Month => m / 12.0,
            PeriodUnit::Year => m,
        }
    }

    /// Length in months for month and year periods, `None` on overflow.
    #[must_use]
    pub fn in_months(&self) -> Option<i32> {
        match self.unit {
            PeriodUnit::Month => Some(self.multiplier),
            PeriodUnit::Year => self.multiplier.checked_mul(12),
            PeriodUnit::Day | PeriodUnit::Week => None,
        }
    }

    /// Length in days for day and week periods, `None` on overflow.
    #[must_use]
    pub fn in_days(&self) -> Option<i32> {
        match self.unit {
            PeriodUnit::Day => Some(self.multiplier),
            PeriodUnit::Week => self.multiplier.checked_mul(7),
            PeriodUnit::Month | PeriodUnit::Year => None,
        }
    }

    /// Orders two periods by elapsed time.
    ///
    /// Periods sharing a unit family (D/W or M/Y) compare exactly; mixed
    /// families compare by [`year_fraction`](Self::year_fraction).
    #[must_use]
    pub fn cmp_interval(&self, other: &Period) -> Ordering {
        if let (Some(a), Some(b)) = (self.in_months(), other.in_months()) {
            return a.cmp(&b);
        }
        if let (Some(a), Some(b)) = (self.in_days(), other.in_days()) {
            return a.cmp(&b);
        }
        self.year_fraction().total_cmp(&other.year_fraction())
    }

    /// True when `self` is a strictly shorter interval than `other`.
    #[must_use]
    pub fn is_shorter_than(&self, other: &Period) -> bool {
        self.cmp_interval(other) == Ordering::Less
    }

    /// True when `self` is a strictly longer interval than `other`.
    #[must_use]
    pub fn is_longer_than(&self, other: &Period) -> bool {
        self.cmp_interval(other) == Ordering::Greater
    }

    /// Number of whole `step` periods contained in `self`.
    ///
    /// Both periods must belong to the same unit family and the ratio must
    /// be a positive whole number.
    pub fn whole_multiple_of(&self, step: &Period) -> StrataResult<i32> {
        let (num, den) = match (self.in_months(), step.in_months(), self.in_days(), step.in_days())
        {
            (Some(a), Some(b), _, _) | (_, _, Some(a), Some(b)) => (a, b),
            _ => {
                return Err(StrataError::invalid_period(
                    step.to_string(),
                    format!("cannot divide {self} into {step} periods"),
                ))
            }
        };
        if den <= 0 {
            return Err(StrataError::invalid_period(
                step.to_string(),
                "step period must be positive",
            ));
        }
        if num % den != 0 || num / den <= 0 {
            return Err(StrataError::invalid_period(
                step.to_string(),
                format!("{step} does not roll to the interval {self}"),
            ));
        }
        Ok(num / den)
    }

    /// Returns the period scaled by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: i32) -> Self {
        Self::new(self.multiplier.saturating_mul(factor), self.unit)
    }

    /// Returns the negated period.
    #[must_use]
    pub fn negated(&self) -> Self {
        self.scaled(-1)
    }

    /// Adds this period to `date`.
    pub fn add_to(&self, date: Date) -> StrataResult<Date> {
        match self.unit {
            PeriodUnit::Day => date.checked_add_days(i64::from(self.multiplier)),
            PeriodUnit::Week => date.checked_add_days(i64::from(self.multiplier) * 7),
            PeriodUnit::Month => date.add_months(self.multiplier),
            PeriodUnit::Year => date.add_years(self.multiplier),
        }
    }

    /// Subtracts this period from `date`.
    pub fn subtract_from(&self, date: Date) -> StrataResult<Date> {
        self.negated().add_to(date)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.multiplier, self.unit.code())
    }
}

impl FromStr for Period {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let mut chars = text.chars();
        let code = chars
            .next_back()
            .ok_or_else(|| StrataError::invalid_period(s, "empty period"))?;
        let unit = PeriodUnit::from_code(code)
            .ok_or_else(|| StrataError::invalid_period(s, format!("unknown unit '{code}'")))?;
        let digits = chars.as_str().trim();
        let multiplier = digits
            .parse::<i32>()
            .map_err(|_| StrataError::invalid_period(s, "multiplier is not an integer"))?;
        if multiplier.unsigned_abs() > MAX_MULTIPLIER {
            return Err(StrataError::invalid_period(
                s,
                format!("multiplier exceeds {MAX_MULTIPLIER}"),
            ));
        }
        Ok(Self::new(multiplier, unit))
    }
}

impl TryFrom<String> for Period {
    type Error = StrataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn p(s: &str) -> Period {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(p("3M"), Period::months(3));
        assert_eq!(p(" 10y "), Period::years(10));
        assert_eq!(p("1W"), Period::weeks(1));
        assert_eq!(p("0D"), Period::days(0));
        assert!("".parse::<Period>().is_err());
        assert!("M".parse::<Period>().is_err());
        assert!("3Q".parse::<Period>().is_err());
        assert!("1.5Y".parse::<Period>().is_err());
    }

    #[test]
    fn test_year_fraction() {
        assert_relative_eq!(p("6M").year_fraction(), 0.5);
        assert_relative_eq!(p("2Y").year_fraction(), 2.0);
        assert_relative_eq!(p("73D").year_fraction(), 0.2);
        assert_relative_eq!(p("1W").year_fraction(), 7.0 / 365.0);
    }

    #[test]
    fn test_interval_comparison() {
        assert_eq!(p("12M").cmp_interval(&p("1Y")), Ordering::Equal);
        assert_eq!(p("2W").cmp_interval(&p("14D")), Ordering::Equal);
        assert!(p("1M").is_longer_than(&p("4W")));
        assert!(p("1M").is_shorter_than(&p("35D")));
        assert!(p("6M").is_shorter_than(&p("1Y")));
    }

    #[test]
    fn test_whole_multiple() {
        assert_eq!(p("1Y").whole_multiple_of(&p("3M")).unwrap(), 4);
        assert_eq!(p("2W").whole_multiple_of(&p("7D")).unwrap(), 2);
        assert!(p("1Y").whole_multiple_of(&p("5M")).is_err());
        assert!(p("1Y").whole_multiple_of(&p("1W")).is_err());
        assert!(p("1Y").whole_multiple_of(&p("0M")).is_err());
    }

    #[test]
    fn test_date_arithmetic() {
        let date = Date::from_ymd(2024, 1, 31).unwrap();
        assert_eq!(p("1M").add_to(date).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(p("2W").add_to(date).unwrap(), Date::from_ymd(2024, 2, 14).unwrap());
        assert_eq!(p("1Y").subtract_from(date).unwrap(), Date::from_ymd(2023, 1, 31).unwrap());
    }

    #[test]
    fn test_huge_multipliers_do_not_overflow() {
        assert!("300000000Y".parse::<Period>().is_err());
        assert!(format!("{MAX_MULTIPLIER}D").parse::<Period>().is_ok());

        let huge = Period::years(300_000_000);
        assert_eq!(huge.in_months(), None);
        assert_eq!(huge.cmp_interval(&Period::months(1)), Ordering::Greater);
        assert_eq!(Period::months(1).cmp_interval(&huge), Ordering::Less);
        assert_eq!(Period::weeks(i32::MAX).in_days(), None);
        assert_eq!(Period::weeks(i32::MAX).cmp_interval(&Period::days(1)), Ordering::Greater);

        let date = Date::from_ymd(2024, 1, 31).unwrap();
        assert!(huge.add_to(date).is_err());
        assert!(Period::years(i32::MAX).add_to(date).is_err());
        assert!(Period::weeks(i32::MAX).add_to(date).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&p("18M")).unwrap();
        assert_eq!(json, "\"18M\"");
        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p("18M"));
        assert!(serde_json::from_str::<Period>("\"X\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_display_parse(multiplier in -500i32..500, unit in 0usize..4) {
            let unit = [PeriodUnit::Day, PeriodUnit::Week, PeriodUnit::Month, PeriodUnit::Year][unit];
            let period = Period::new(multiplier, unit);
            prop_assert_eq!(period.to_string().parse::<Period>().unwrap(), period);
        }

        #[test]
        fn prop_month_year_order_matches_year_fraction(a in 0i32..600, b in 0i32..50) {
            let months = Period::months(a);
            let years = Period::years(b);
            let expected = months.year_fraction().partial_cmp(&years.year_fraction()).unwrap();
            prop_assert_eq!(months.cmp_interval(&years), expected);
        }
    }
}

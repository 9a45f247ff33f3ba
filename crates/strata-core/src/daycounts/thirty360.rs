//! 30/360 bond basis.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// 30/360 bond basis (ISDA 4.16(f)).
///
/// `D1 = 31` becomes 30; `D2 = 31` becomes 30 only when `D1` is 30 or 31.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360;

impl DayCount for Thirty360 {
    fn name(&self) -> &'static str {
        "30/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let d1 = start.day().min(30);
        let d2 = if end.day() == 31 && d1 == 30 { 30 } else { end.day() };
        let years = i64::from(end.year() - start.year());
        let months = i64::from(end.month()) - i64::from(start.month());
        360 * years + 30 * months + i64::from(d2) - i64::from(d1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_regular_half_year() {
        assert_eq!(Thirty360.day_count(d(2024, 1, 15), d(2024, 7, 15)), 180);
        assert_eq!(Thirty360.year_fraction(d(2024, 1, 15), d(2024, 7, 15)), dec!(0.5));
    }

    #[test]
    fn test_month_end_rules() {
        assert_eq!(Thirty360.day_count(d(2024, 1, 31), d(2024, 3, 31)), 60);
        assert_eq!(Thirty360.day_count(d(2024, 1, 30), d(2024, 3, 31)), 60);
        assert_eq!(Thirty360.day_count(d(2024, 1, 29), d(2024, 3, 31)), 62);
    }
}

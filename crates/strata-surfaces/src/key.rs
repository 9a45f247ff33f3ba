//! Composite surface keys.
//!
//! A key locates one quote of a volatility surface: an expiry period, an
//! optional tenor period (swaption-style cubes) and a strike. Keys order
//! lexicographically by expiry, tenor and strike, with periods compared by
//! elapsed time so that `"12M"` and `"1Y"` denote the same expiry.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use strata_core::Period;

use crate::error::{SurfaceError, SurfaceResult};

/// Parses a period, mapping failures to [`SurfaceError::InvalidPeriod`].
pub(crate) fn parse_period(text: &str) -> SurfaceResult<Period> {
    text.parse::<Period>().map_err(|e| SurfaceError::InvalidPeriod {
        input: text.to_string(),
        reason: e.to_string(),
    })
}

/// Expiry, optional tenor and strike of one surface quote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurfaceKey {
    /// Time to expiry.
    pub expiry: Period,
    /// Underlying tenor; `None` on a plain expiry by strike surface.
    pub tenor: Option<Period>,
    /// Strike.
    pub strike: Decimal,
}

impl SurfaceKey {
    /// Key of an expiry by strike surface.
    #[must_use]
    pub fn new(expiry: Period, strike: Decimal) -> Self {
        Self {
            expiry,
            tenor: None,
            strike,
        }
    }

    /// Key carrying a tenor.
    #[must_use]
    pub fn with_tenor(expiry: Period, tenor: Period, strike: Decimal) -> Self {
        Self {
            expiry,
            tenor: Some(tenor),
            strike,
        }
    }

    /// Parses the period fields of a key.
    ///
    /// A missing or blank tenor means the surface has no tenor dimension;
    /// tenor text that does not parse is an error.
    ///
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use strata_surfaces::SurfaceKey;
    ///
    /// let key = SurfaceKey::parse("3M", Some(""), dec!(100)).unwrap();
    /// assert!(key.tenor.is_none());
    /// assert!(SurfaceKey::parse("3M", Some("5X"), dec!(100)).is_err());
    /// ```
    pub fn parse(expiry: &str, tenor: Option<&str>, strike: Decimal) -> SurfaceResult<Self> {
        let tenor = match tenor.map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(parse_period(text)?),
        };
        Ok(Self {
            expiry: parse_period(expiry)?,
            tenor,
            strike,
        })
    }

    /// Orders the expiry and tenor only, ignoring the strike.
    pub(crate) fn cmp_row(&self, other: &Self) -> Ordering {
        self.expiry
            .cmp_interval(&other.expiry)
            .then_with(|| match (&self.tenor, &other.tenor) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp_interval(b),
            })
    }
}

impl PartialEq for SurfaceKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SurfaceKey {}

impl PartialOrd for SurfaceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SurfaceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_row(other).then_with(|| self.strike.cmp(&other.strike))
    }
}

impl fmt::Display for SurfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tenor {
            Some(tenor) => write!(f, "{}/{}/{}", self.expiry, tenor, self.strike),
            None => write!(f, "{}/{}", self.expiry, self.strike),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn p(s: &str) -> Period {
        s.parse().unwrap()
    }

    #[test]
    fn test_expiry_then_tenor_then_strike() {
        let a = SurfaceKey::with_tenor(p("1M"), p("10Y"), dec!(200));
        let b = SurfaceKey::with_tenor(p("1Y"), p("1Y"), dec!(50));
        let c = SurfaceKey::with_tenor(p("1Y"), p("2Y"), dec!(10));
        let d = SurfaceKey::with_tenor(p("1Y"), p("2Y"), dec!(20));
        let mut keys = vec![d, c, b, a];
        keys.sort();
        assert_eq!(keys, vec![a, b, c, d]);
    }

    #[test]
    fn test_interval_equality() {
        assert_eq!(SurfaceKey::new(p("12M"), dec!(1.0)), SurfaceKey::new(p("1Y"), dec!(1.00)));
        assert!(SurfaceKey::new(p("7D"), dec!(1)) == SurfaceKey::new(p("1W"), dec!(1)));
        assert!(SurfaceKey::new(p("5W"), dec!(1)) > SurfaceKey::new(p("1M"), dec!(1)));
    }

    #[test]
    fn test_no_tenor_sorts_first() {
        let plain = SurfaceKey::new(p("1Y"), dec!(100));
        let cube = SurfaceKey::with_tenor(p("1Y"), p("1M"), dec!(0));
        assert!(plain < cube);
    }

    #[test]
    fn test_parse_and_display() {
        let key = SurfaceKey::parse(" 6m ", Some("5Y"), dec!(0.25)).unwrap();
        assert_eq!(key.to_string(), "6M/5Y/0.25");
        assert_eq!(SurfaceKey::parse("1Y", None, dec!(100)).unwrap().to_string(), "1Y/100");
        assert!(matches!(
            SurfaceKey::parse("soon", None, dec!(1)),
            Err(SurfaceError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_oversized_periods_order_without_overflow() {
        assert!(matches!(
            SurfaceKey::parse("300000000Y", None, dec!(100)),
            Err(SurfaceError::InvalidPeriod { .. })
        ));

        let far = SurfaceKey::new(Period::years(300_000_000), dec!(100));
        let near = SurfaceKey::new(p("1M"), dec!(100));
        assert!(near < far);
        let index = crate::SurfaceIndex::build([far, near]).unwrap();
        assert_eq!(index.index_of(&near), Some(1));
    }

    proptest! {
        #[test]
        fn prop_order_is_lexicographic(
            e1 in 1i32..60, e2 in 1i32..60,
            t1 in 1i32..30, t2 in 1i32..30,
            k1 in 1i64..500, k2 in 1i64..500,
        ) {
            let a = SurfaceKey::with_tenor(Period::months(e1), Period::years(t1), Decimal::from(k1));
            let b = SurfaceKey::with_tenor(Period::months(e2), Period::years(t2), Decimal::from(k2));
            let expected = e1.cmp(&e2).then(t1.cmp(&t2)).then(k1.cmp(&k2));
            prop_assert_eq!(a.cmp(&b), expected);
        }
    }
}

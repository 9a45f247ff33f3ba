//! Evenly spaced strike grids.

use rust_decimal::Decimal;

use crate::error::{StrataError, StrataResult};

/// `count` strikes starting at `start`, `step` apart.
///
/// ```rust
/// use rust_decimal_macros::dec;
/// use strata_core::schedule::strike_schedule;
///
/// let strikes = strike_schedule(dec!(90), dec!(5), 3).unwrap();
/// assert_eq!(strikes, vec![dec!(90), dec!(95), dec!(100)]);
/// ```
pub fn strike_schedule(start: Decimal, step: Decimal, count: usize) -> StrataResult<Vec<Decimal>> {
    if step <= Decimal::ZERO {
        return Err(StrataError::schedule(format!("strike step {step} must be positive")));
    }
    let mut strikes = Vec::with_capacity(count);
    let mut strike = start;
    for _ in 0..count {
        strikes.push(strike);
        strike = strike
            .checked_add(step)
            .ok_or_else(|| StrataError::schedule("strike grid overflows"))?;
    }
    Ok(strikes)
}

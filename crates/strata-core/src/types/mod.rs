//! Calendar value types.

pub(crate) mod date;
mod period;

pub use date::Date;
pub use period::{Period, PeriodUnit, MAX_MULTIPLIER};

//! Unadjusted schedule generation.
//!
//! Everything here works on unadjusted dates; holiday calendars and
//! business-day rolling are applied by callers, if at all.

mod calculation;
mod generator;
mod meta;
mod roll;
mod strikes;

pub use calculation::{calculation_periods, CalculationPeriod};
pub use generator::{
    coupon_dates_from_maturity, generate_dates, remove_duplicates, roll_dates,
    unadjusted_schedule, GenerationDirection, StubPolicy,
};
pub use meta::{meta_schedule, meta_schedule_between, MetaScheduleItem};
pub use roll::RollConvention;
pub use strikes::strike_schedule;

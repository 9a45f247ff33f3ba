//! # Strata Core
//!
//! Calendar building blocks for the Strata pricing-structure library.
//!
//! This crate provides the date arithmetic that feeds curve and surface
//! builders:
//!
//! - **Types**: [`Date`] and the calendar [`Period`] (`"3M"`, `"10Y"`, ...)
//! - **Day Count Conventions**: year fractions under a named convention
//! - **Schedules**: unadjusted roll-date generation, meta schedules,
//!   calculation periods and strike grids
//!
//! Business-day adjustment is out of scope; every schedule produced here is
//! unadjusted.
//!
//! ## Example
//!
//! ```rust
//! use strata_core::prelude::*;
//!
//! let effective = Date::from_ymd(2024, 1, 15).unwrap();
//! let dates = unadjusted_schedule(effective, "1Y".parse().unwrap(), "3M".parse().unwrap()).unwrap();
//! assert_eq!(dates.len(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod daycounts;
pub mod error;
pub mod schedule;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{StrataError, StrataResult};
    pub use crate::schedule::{
        calculation_periods, coupon_dates_from_maturity, generate_dates, meta_schedule,
        meta_schedule_between, remove_duplicates, roll_dates, strike_schedule,
        unadjusted_schedule, CalculationPeriod, GenerationDirection, MetaScheduleItem,
        RollConvention, StubPolicy,
    };
    pub use crate::types::{Date, Period, PeriodUnit};
}

pub use daycounts::{DayCount, DayCountConvention};
pub use error::{StrataError, StrataResult};
pub use types::{Date, Period, PeriodUnit};

//! Unadjusted roll-date generation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::RollConvention;
use crate::error::{StrataError, StrataResult};
use crate::types::{Date, Period};

/// Upper bound on generated periods; guards against zero-length steps.
const MAX_PERIODS: i32 = 10_000;

/// Which end of the schedule regular periods are anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GenerationDirection {
    /// Roll forward from the effective date; any stub is at the back.
    #[default]
    Forward,
    /// Roll backward from the termination date; any stub is at the front.
    Backward,
}

/// Treatment of an irregular period left over by roll generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StubPolicy {
    /// Keep the stub as its own short period.
    #[default]
    Short,
    /// Merge the stub into the adjacent regular period.
    Long,
}

/// Dates from `effective` every `period` up to `effective + interval`.
///
/// Both ends are included. `interval` must be a whole multiple of `period`.
///
/// ```rust
/// use strata_core::schedule::unadjusted_schedule;
/// use strata_core::types::{Date, Period};
///
/// let start = Date::from_ymd(2024, 1, 31).unwrap();
/// let dates = unadjusted_schedule(start, Period::years(1), Period::months(6)).unwrap();
/// assert_eq!(dates[1], Date::from_ymd(2024, 7, 31).unwrap());
/// assert_eq!(dates.len(), 3);
/// ```
pub fn unadjusted_schedule(
    effective: Date,
    interval_to_termination: Period,
    period: Period,
) -> StrataResult<Vec<Date>> {
    let count = interval_to_termination.whole_multiple_of(&period)?;
    let termination = interval_to_termination.add_to(effective)?;
    let mut dates = Vec::with_capacity(count as usize + 1);
    for k in 0..count {
        dates.push(period.scaled(k).add_to(effective)?);
    }
    dates.push(termination);
    Ok(dates)
}

/// Generates unadjusted roll dates between `effective` and `termination`.
///
/// Regular dates are computed from the anchor end (`effective` when rolling
/// forward, `termination` when rolling backward) as `anchor ± k·period` and
/// then passed through `roll`, so month-end clamping never drifts. When the
/// last regular date does not land on the far end a stub remains; `stub`
/// decides whether it is kept short or merged into its neighbour.
pub fn generate_dates(
    effective: Date,
    termination: Date,
    period: Period,
    roll: RollConvention,
    direction: GenerationDirection,
    stub: StubPolicy,
) -> StrataResult<Vec<Date>> {
    if termination <= effective {
        return Err(StrataError::schedule(format!(
            "termination {termination} must be after effective {effective}"
        )));
    }
    if period.multiplier() <= 0 {
        return Err(StrataError::schedule(format!("period {period} must be positive")));
    }

    let (mut dates, has_stub) = match direction {
        GenerationDirection::Forward => roll_towards(effective, termination, period, roll, 1)?,
        GenerationDirection::Backward => {
            let (mut backward, has_stub) = roll_towards(termination, effective, period, roll, -1)?;
            backward.reverse();
            (backward, has_stub)
        }
    };

    if has_stub && stub == StubPolicy::Long && dates.len() > 2 {
        let merged = match direction {
            GenerationDirection::Forward => dates.len() - 2,
            GenerationDirection::Backward => 1,
        };
        let removed = dates.remove(merged);
        log::debug!("merged stub period by removing roll date {removed}");
    }

    Ok(dates)
}

/// Rolls from `anchor` towards `far`, then appends `far`.
///
/// Returns the dates and whether the final period is irregular.
fn roll_towards(
    anchor: Date,
    far: Date,
    period: Period,
    roll: RollConvention,
    sign: i32,
) -> StrataResult<(Vec<Date>, bool)> {
    let mut dates = vec![anchor];
    for k in 1..=MAX_PERIODS {
        let candidate = roll.apply(period.scaled(sign * k).add_to(anchor)?)?;
        let reached = if sign > 0 { candidate >= far } else { candidate <= far };
        if reached {
            dates.push(far);
            return Ok((dates, candidate != far));
        }
        let last = dates[dates.len() - 1];
        let advances = if sign > 0 { candidate > last } else { candidate < last };
        if advances {
            dates.push(candidate);
        }
    }
    Err(StrataError::schedule(format!(
        "more than {MAX_PERIODS} periods of {period} between {anchor} and {far}"
    )))
}

/// Coupon dates rolled backward from `maturity`, short stub at the front.
pub fn coupon_dates_from_maturity(
    effective: Date,
    maturity: Date,
    period: Period,
    roll: RollConvention,
) -> StrataResult<Vec<Date>> {
    generate_dates(
        effective,
        maturity,
        period,
        roll,
        GenerationDirection::Backward,
        StubPolicy::Short,
    )
}

/// `count + 1` roll dates starting at `start`, one `period` apart.
pub fn roll_dates(
    start: Date,
    count: usize,
    period: Period,
    roll: RollConvention,
) -> StrataResult<Vec<Date>> {
    if period.multiplier() <= 0 {
        return Err(StrataError::schedule(format!("period {period} must be positive")));
    }
    let count = i32::try_from(count)
        .map_err(|_| StrataError::schedule(format!("too many roll dates: {count}")))?;
    let mut dates = Vec::with_capacity(count as usize + 1);
    dates.push(start);
    for k in 1..=count {
        dates.push(roll.apply(period.scaled(k).add_to(start)?)?);
    }
    Ok(dates)
}

/// Removes repeated dates, keeping the first occurrence of each.
#[must_use]
pub fn remove_duplicates(dates: &[Date]) -> Vec<Date> {
    let mut seen = HashSet::with_capacity(dates.len());
    dates.iter().copied().filter(|d| seen.insert(*d)).collect()
}

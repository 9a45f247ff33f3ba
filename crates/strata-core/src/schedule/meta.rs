//! Meta schedules: chained month-based roll blocks.
//!
//! A meta schedule is a list of `(roll frequency, interval, roll convention)`
//! triplets such as `[("1M", "6M", "EOM"), ("3M", "2Y", "15")]`: roll monthly
//! for six months, then quarterly for two years. Offsets accumulate from the
//! start date, so each block begins where the previous one ended.

use serde::{Deserialize, Serialize};

use super::{remove_duplicates, GenerationDirection, RollConvention};
use crate::error::{StrataError, StrataResult};
use crate::types::{Date, Period, PeriodUnit};

/// One block of a meta schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaScheduleItem {
    /// Distance between rolls; must be expressed in months.
    pub roll_frequency: Period,
    /// Length of the block; a whole multiple of `roll_frequency`.
    pub interval: Period,
    /// Day-of-month rule for the block's roll dates.
    pub roll_convention: RollConvention,
}

impl MetaScheduleItem {
    /// Creates a block.
    #[must_use]
    pub fn new(roll_frequency: Period, interval: Period, roll_convention: RollConvention) -> Self {
        Self {
            roll_frequency,
            interval,
            roll_convention,
        }
    }

    /// Parses a block from its three textual fields.
    pub fn parse(roll_frequency: &str, interval: &str, roll_convention: &str) -> StrataResult<Self> {
        Ok(Self::new(
            roll_frequency.parse()?,
            interval.parse()?,
            roll_convention.parse()?,
        ))
    }

    /// Number of rolls and months between rolls.
    fn rolls(&self) -> StrataResult<(i32, i32)> {
        if self.roll_frequency.unit() != PeriodUnit::Month {
            return Err(StrataError::invalid_period(
                self.roll_frequency.to_string(),
                "meta schedule roll frequencies must be expressed in months",
            ));
        }
        let count = self.interval.whole_multiple_of(&self.roll_frequency)?;
        Ok((count, self.roll_frequency.multiplier()))
    }
}

/// Roll dates of a meta schedule, excluding `start`.
///
/// ```rust
/// use strata_core::schedule::{meta_schedule, MetaScheduleItem};
/// use strata_core::types::Date;
///
/// let start = Date::from_ymd(2024, 1, 31).unwrap();
/// let items = [
///     MetaScheduleItem::parse("1M", "2M", "EOM").unwrap(),
///     MetaScheduleItem::parse("3M", "6M", "NONE").unwrap(),
/// ];
/// let dates = meta_schedule(start, &items).unwrap();
/// assert_eq!(dates.len(), 4);
/// assert_eq!(dates[1], Date::from_ymd(2024, 3, 31).unwrap());
/// ```
pub fn meta_schedule(start: Date, items: &[MetaScheduleItem]) -> StrataResult<Vec<Date>> {
    let mut dates = Vec::new();
    let mut offset = 0;
    for item in items {
        let (count, months) = item.rolls()?;
        for _ in 0..count {
            offset += months;
            dates.push(item.roll_convention.apply(start.add_months(offset)?)?);
        }
    }
    Ok(remove_duplicates(&dates))
}

/// Meta schedule between two dates, both included.
///
/// Rolling forward anchors the blocks at `start` in order; rolling backward
/// anchors them at `end` with the block order reversed. Roll dates falling
/// outside `(start, end)` are rejected.
pub fn meta_schedule_between(
    start: Date,
    end: Date,
    items: &[MetaScheduleItem],
    direction: GenerationDirection,
) -> StrataResult<Vec<Date>> {
    if end <= start {
        return Err(StrataError::schedule(format!(
            "meta schedule end {end} must be after start {start}"
        )));
    }

    let mut rolls = Vec::new();
    let mut offset = 0;
    match direction {
        GenerationDirection::Forward => {
            for item in items {
                let (count, months) = item.rolls()?;
                for _ in 0..count {
                    offset += months;
                    rolls.push(item.roll_convention.apply(start.add_months(offset)?)?);
                }
            }
        }
        GenerationDirection::Backward => {
            for item in items.iter().rev() {
                let (count, months) = item.rolls()?;
                for _ in 0..count {
                    offset += months;
                    rolls.push(item.roll_convention.apply(end.add_months(-offset)?)?);
                }
            }
            rolls.reverse();
        }
    }

    if let Some(outside) = rolls.iter().find(|d| **d < start || **d > end) {
        return Err(StrataError::schedule(format!(
            "meta schedule roll {outside} falls outside [{start}, {end}]"
        )));
    }

    let mut dates = Vec::with_capacity(rolls.len() + 2);
    dates.push(start);
    dates.extend(rolls);
    dates.push(end);
    Ok(remove_duplicates(&dates))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_meta_schedule_offsets_accumulate() {
        let items = [
            MetaScheduleItem::parse("1M", "3M", "NONE").unwrap(),
            MetaScheduleItem::parse("6M", "1Y", "15").unwrap(),
        ];
        let dates = meta_schedule(d(2024, 1, 10), &items).unwrap();
        assert_eq!(
            dates,
            vec![d(2024, 2, 10), d(2024, 3, 10), d(2024, 4, 10), d(2024, 10, 15), d(2025, 4, 15)]
        );
    }

    #[test]
    fn test_meta_schedule_rejects_non_month_frequency() {
        let items = [MetaScheduleItem::parse("1Y", "2Y", "NONE").unwrap()];
        assert!(meta_schedule(d(2024, 1, 10), &items).is_err());

        let items = [MetaScheduleItem::parse("7M", "1Y", "NONE").unwrap()];
        assert!(meta_schedule(d(2024, 1, 10), &items).is_err());
    }

    #[test]
    fn test_between_forward_and_backward() {
        let items = [MetaScheduleItem::parse("3M", "6M", "NONE").unwrap()];
        let forward =
            meta_schedule_between(d(2024, 1, 10), d(2024, 9, 1), &items, GenerationDirection::Forward)
                .unwrap();
        assert_eq!(forward, vec![d(2024, 1, 10), d(2024, 4, 10), d(2024, 7, 10), d(2024, 9, 1)]);

        let backward =
            meta_schedule_between(d(2024, 1, 10), d(2024, 9, 1), &items, GenerationDirection::Backward)
                .unwrap();
        assert_eq!(backward, vec![d(2024, 1, 10), d(2024, 3, 1), d(2024, 6, 1), d(2024, 9, 1)]);
    }

    #[test]
    fn test_between_deduplicates_end() {
        let items = [MetaScheduleItem::parse("6M", "1Y", "NONE").unwrap()];
        let dates =
            meta_schedule_between(d(2024, 1, 10), d(2025, 1, 10), &items, GenerationDirection::Forward)
                .unwrap();
        assert_eq!(dates, vec![d(2024, 1, 10), d(2024, 7, 10), d(2025, 1, 10)]);
    }

    #[test]
    fn test_between_rejects_overrun() {
        let items = [MetaScheduleItem::parse("6M", "2Y", "NONE").unwrap()];
        assert!(meta_schedule_between(
            d(2024, 1, 10),
            d(2025, 1, 10),
            &items,
            GenerationDirection::Forward
        )
        .is_err());
    }
}

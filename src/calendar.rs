//! Day-offset to date mapping.
//!
//! The CPM passes work in abstract day offsets; this module turns offsets
//! into concrete dates for reports. Lag semantics in the source data are
//! unconfirmed (calendar vs. working days), so the unit is configurable and
//! defaults to calendar days.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LagUnit {
    #[default]
    Calendar,
    /// Monday-Friday; offsets skip weekends.
    Working,
}

fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Date reached by advancing `offset` days from `start` in the given unit.
///
/// For working days, `start` itself counts as day 0 when it is a working
/// day; a weekend start rolls forward to Monday first. Offsets are
/// non-negative (schedule offsets are clamped at project start).
pub fn date_at_offset(start: NaiveDate, offset: i64, unit: LagUnit) -> NaiveDate {
    match unit {
        LagUnit::Calendar => start + Duration::days(offset),
        LagUnit::Working => {
            let mut date = start;
            while !is_working_day(date) {
                date += Duration::days(1);
            }
            let mut remaining = offset;
            while remaining > 0 {
                date += Duration::days(1);
                if is_working_day(date) {
                    remaining -= 1;
                }
            }
            date
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_offset_is_plain_addition() {
        // 2025-06-06 is a Friday; calendar days walk straight through the
        // weekend.
        assert_eq!(
            date_at_offset(date(2025, 6, 6), 3, LagUnit::Calendar),
            date(2025, 6, 9)
        );
    }

    #[test]
    fn test_working_offset_skips_weekend() {
        // Friday + 1 working day = Monday.
        assert_eq!(
            date_at_offset(date(2025, 6, 6), 1, LagUnit::Working),
            date(2025, 6, 9)
        );
        // Friday + 3 working days = Wednesday.
        assert_eq!(
            date_at_offset(date(2025, 6, 6), 3, LagUnit::Working),
            date(2025, 6, 11)
        );
    }

    #[test]
    fn test_working_offset_zero_rolls_weekend_start_forward() {
        // Saturday start counts from the following Monday.
        assert_eq!(
            date_at_offset(date(2025, 6, 7), 0, LagUnit::Working),
            date(2025, 6, 9)
        );
    }

    #[test]
    fn test_zero_offset_on_weekday_is_identity() {
        for unit in [LagUnit::Calendar, LagUnit::Working] {
            assert_eq!(date_at_offset(date(2025, 6, 4), 0, unit), date(2025, 6, 4));
        }
    }
}

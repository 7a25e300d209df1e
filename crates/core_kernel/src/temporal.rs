//! Calendar arithmetic for warranty windows
//!
//! Warranty terms are expressed in whole calendar months and evaluated against
//! wall-clock instants. Dates are calendar dates in UTC; an expiry date is
//! reached at 00:00 UTC on that day.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

/// Milliseconds in one day
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Adding {months} months to {date} is out of range")]
    OutOfRange {
        date: String,
        months: u32,
    },
}

/// Adds whole calendar months to a date.
///
/// Day-of-month is preserved; when the target month is shorter the result is
/// clamped to its last day (2024-01-31 + 1 month = 2024-02-29).
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, TemporalError> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| TemporalError::OutOfRange {
            date: date.to_string(),
            months,
        })
}

/// Returns the instant at which the given UTC calendar day begins
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Whole days from `now` until `target`, rounded up.
///
/// Any positive remainder counts as a full day; a target in the past yields
/// zero or a negative number.
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (target - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        whole
    } else {
        whole + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_months_keeps_day_of_month() {
        assert_eq!(add_months(date(2023, 1, 15), 24).unwrap(), date(2025, 1, 15));
        assert_eq!(add_months(date(2023, 11, 30), 3).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_start_of_day_is_midnight_utc() {
        let instant = start_of_day(date(2025, 1, 15));
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_days_until_rounds_up_partial_days() {
        let target = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 12, 20, 9, 30, 0).unwrap();
        assert_eq!(days_until(target, now), 26);
    }

    #[test]
    fn test_days_until_past_target() {
        let target = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 1).unwrap();
        assert_eq!(days_until(target, now), 0);

        let later = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(days_until(target, later), -17);
    }
}

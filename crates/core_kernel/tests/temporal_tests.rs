//! Tests for calendar-month arithmetic and day counting

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::temporal::{add_months, days_until, start_of_day, TemporalError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod add_months_tests {
    use super::*;

    #[test]
    fn test_whole_years() {
        assert_eq!(add_months(date(2023, 1, 15), 12).unwrap(), date(2024, 1, 15));
        assert_eq!(add_months(date(2023, 1, 15), 24).unwrap(), date(2025, 1, 15));
    }

    #[test]
    fn test_crosses_year_boundary() {
        assert_eq!(add_months(date(2024, 11, 10), 3).unwrap(), date(2025, 2, 10));
    }

    #[test]
    fn test_clamps_to_end_of_shorter_month() {
        assert_eq!(add_months(date(2024, 1, 31), 1).unwrap(), date(2024, 2, 29));
        assert_eq!(add_months(date(2023, 1, 31), 1).unwrap(), date(2023, 2, 28));
        assert_eq!(add_months(date(2024, 3, 31), 1).unwrap(), date(2024, 4, 30));
    }

    #[test]
    fn test_out_of_range() {
        let result = add_months(NaiveDate::MAX, 1);
        assert!(matches!(result, Err(TemporalError::OutOfRange { .. })));
    }
}

mod days_until_tests {
    use super::*;

    #[test]
    fn test_exact_days() {
        let target = start_of_day(date(2025, 1, 15));
        assert_eq!(days_until(target, start_of_day(date(2024, 12, 20))), 26);
        assert_eq!(days_until(target, target), 0);
    }

    #[test]
    fn test_one_millisecond_before_counts_as_a_day() {
        let target = start_of_day(date(2025, 1, 15));
        let now = target - Duration::milliseconds(1);
        assert_eq!(days_until(target, now), 1);
    }

    #[test]
    fn test_late_in_the_day() {
        let target = start_of_day(date(2025, 1, 15));
        let now = Utc.with_ymd_and_hms(2024, 12, 20, 23, 59, 59).unwrap();
        assert_eq!(days_until(target, now), 26);
    }
}

proptest! {
    #[test]
    fn add_months_lands_in_the_target_month(
        year in 1990i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        months in 1u32..=240,
    ) {
        let start = date(year, month, day);
        let end = add_months(start, months).unwrap();

        let start_index = start.year() * 12 + start.month0() as i32;
        let end_index = end.year() * 12 + end.month0() as i32;
        prop_assert_eq!(end_index - start_index, months as i32);
        prop_assert_eq!(end.day(), day);
    }

    #[test]
    fn days_until_is_monotonic(
        offset_a in -10_000_000i64..10_000_000,
        offset_b in -10_000_000i64..10_000_000,
    ) {
        let target = start_of_day(date(2025, 1, 15));
        let (early, late) = if offset_a <= offset_b { (offset_a, offset_b) } else { (offset_b, offset_a) };
        let now_early = target + Duration::seconds(early);
        let now_late = target + Duration::seconds(late);
        prop_assert!(days_until(target, now_early) >= days_until(target, now_late));
    }
}

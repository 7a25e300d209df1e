//! Property-Based Test Generators
//!
//! Proptest strategies for warranty dates, claim statuses and serial numbers.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use domain_claims::{ClaimStatus, IssueType};
use proptest::prelude::*;

/// Purchase dates between 2000-01-01 and roughly 2040
pub fn purchase_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..14_600).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset)
    })
}

/// Month-end purchase dates, where clamping matters
pub fn month_end_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2040, 1u32..=12).prop_map(|(year, month)| {
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap() - Duration::days(1)
    })
}

/// Warranty terms from one month to ten years
pub fn warranty_months_strategy() -> impl Strategy<Value = u32> {
    1u32..=120
}

/// Instants between 2000 and roughly 2045, at second precision
pub fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..2_366_841_600).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop::sample::select(ClaimStatus::ALL.to_vec())
}

pub fn issue_type_strategy() -> impl Strategy<Value = IssueType> {
    prop_oneof![
        Just(IssueType::Hardware),
        Just(IssueType::Software),
        Just(IssueType::Connectivity),
        Just(IssueType::Power),
        Just(IssueType::Display),
        Just(IssueType::Audio),
        Just(IssueType::Other),
    ]
}

/// Serial numbers shaped like `PREFIX-1234-5678`
pub fn serial_number_strategy() -> impl Strategy<Value = String> {
    ("[A-Z]{2,4}[0-9]?", 1000u32..9999, 1000u32..9999)
        .prop_map(|(prefix, a, b)| format!("{}-{}-{}", prefix, a, b))
}

/// Claim descriptions that pass validation
pub fn claim_description_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{10,200}".prop_filter("must be 10+ chars after trimming", |s| s.trim().len() >= 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    proptest! {
        #[test]
        fn month_end_dates_are_month_ends(date in month_end_date_strategy()) {
            prop_assert_eq!((date + Duration::days(1)).day(), 1);
        }

        #[test]
        fn serials_have_a_prefix(serial in serial_number_strategy()) {
            let prefix = serial.split('-').next().unwrap();
            prop_assert!(prefix.len() >= 2);
        }
    }
}

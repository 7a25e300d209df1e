//! Custom Test Assertions
//!
//! Assertion helpers for claims and warranty views with more useful failure
//! messages than a bare `assert_eq!`.

use chrono::NaiveDate;
use domain_claims::{ClaimStatus, TimelineEntry, TimelineKind};
use domain_warranty::{RegistrationStatus, RegistrationView};

/// Asserts the kinds of a timeline, in order
pub fn assert_timeline_kinds(timeline: &[TimelineEntry], expected: &[TimelineKind]) {
    let actual: Vec<TimelineKind> = timeline.iter().map(|e| e.kind).collect();
    assert_eq!(
        actual, expected,
        "Timeline kinds differ: actual={:?}, expected={:?}",
        actual, expected
    );
}

/// Asserts that timeline entries are in non-decreasing creation order
pub fn assert_timeline_ordered(timeline: &[TimelineEntry]) {
    for pair in timeline.windows(2) {
        assert!(
            pair[0].created_at <= pair[1].created_at,
            "Timeline out of order: {} after {}",
            pair[0].created_at,
            pair[1].created_at
        );
    }
}

/// Asserts the description of the last status change entry
pub fn assert_last_status_change(timeline: &[TimelineEntry], status: ClaimStatus) {
    let last = timeline
        .iter()
        .rev()
        .find(|e| e.kind == TimelineKind::StatusChange)
        .unwrap_or_else(|| panic!("No status change in timeline of {} entries", timeline.len()));
    assert_eq!(last.description, format!("Claim status changed to {}", status));
}

/// Asserts a view's resolved standing
pub fn assert_standing(view: &RegistrationView, status: RegistrationStatus, days_left: i64) {
    assert_eq!(
        (view.standing.status, view.standing.days_left),
        (status, days_left),
        "Unexpected standing for serial {}",
        view.registration.serial_number
    );
}

/// Asserts a view's expiry date
pub fn assert_expiry(view: &RegistrationView, expected: NaiveDate) {
    assert_eq!(
        view.registration.expiry_date, expected,
        "Unexpected expiry for serial {}",
        view.registration.serial_number
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use core_kernel::ClaimId;
    use domain_claims::Sender;

    #[test]
    fn test_timeline_helpers() {
        let id = ClaimId::new();
        let now = Utc::now();
        let timeline = vec![
            TimelineEntry::created(id, now),
            TimelineEntry::status_change(id, ClaimStatus::InProgress, now + Duration::seconds(1)),
            TimelineEntry::message(id, Sender::Business, "On it", now + Duration::seconds(2)),
        ];

        assert_timeline_kinds(
            &timeline,
            &[TimelineKind::Created, TimelineKind::StatusChange, TimelineKind::Message],
        );
        assert_timeline_ordered(&timeline);
        assert_last_status_change(&timeline, ClaimStatus::InProgress);
    }

    #[test]
    #[should_panic(expected = "Timeline out of order")]
    fn test_unordered_timeline_panics() {
        let id = ClaimId::new();
        let now = Utc::now();
        let timeline = vec![
            TimelineEntry::created(id, now),
            TimelineEntry::message(id, Sender::Customer, "Hello", now - Duration::seconds(5)),
        ];
        assert_timeline_ordered(&timeline);
    }
}

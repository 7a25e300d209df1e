//! Registration status resolver
//!
//! Status is never stored. It is derived from the expiry date and the current
//! instant every time a registration is read:
//!
//! ```text
//! days_left = ceil((expiry_date - now) / 1 day)
//!
//! days_left <= 0        -> expired
//! 0 < days_left <= 30   -> expiring
//! days_left > 30        -> active
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::temporal::{self, TemporalError};

/// Days before expiry during which a warranty is reported as expiring
pub const EXPIRING_WINDOW_DAYS: i64 = 30;

/// Derived warranty status of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Active,
    Expiring,
    Expired,
}

impl RegistrationStatus {
    /// Classifies a (possibly negative) day count
    pub fn from_days_left(days_left: i64) -> Self {
        if days_left <= 0 {
            RegistrationStatus::Expired
        } else if days_left <= EXPIRING_WINDOW_DAYS {
            RegistrationStatus::Expiring
        } else {
            RegistrationStatus::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Active => "active",
            RegistrationStatus::Expiring => "expiring",
            RegistrationStatus::Expired => "expired",
        }
    }

    /// Claims and extensions are only possible while the warranty runs
    pub fn is_covered(&self) -> bool {
        !matches!(self, RegistrationStatus::Expired)
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a warranty at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyStanding {
    pub status: RegistrationStatus,
    /// Days remaining, never negative
    pub days_left: i64,
}

/// Derives the expiry date from the purchase date and warranty term
pub fn expiry_date(purchase_date: NaiveDate, warranty_months: u32) -> Result<NaiveDate, TemporalError> {
    temporal::add_months(purchase_date, warranty_months)
}

/// Resolves the standing of a warranty that ends on `expiry_date`
pub fn resolve(expiry_date: NaiveDate, now: DateTime<Utc>) -> WarrantyStanding {
    let days_left = temporal::days_until(temporal::start_of_day(expiry_date), now);
    WarrantyStanding {
        status: RegistrationStatus::from_days_left(days_left),
        days_left: days_left.max(0),
    }
}

/// Resolves the standing straight from purchase data
pub fn resolve_from_purchase(
    purchase_date: NaiveDate,
    warranty_months: u32,
    now: DateTime<Utc>,
) -> Result<WarrantyStanding, TemporalError> {
    Ok(resolve(expiry_date(purchase_date, warranty_months)?, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_worked_example() {
        let purchase = date(2023, 1, 15);
        assert_eq!(expiry_date(purchase, 24).unwrap(), date(2025, 1, 15));

        let december = Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap();
        let standing = resolve_from_purchase(purchase, 24, december).unwrap();
        assert_eq!(standing.days_left, 26);
        assert_eq!(standing.status, RegistrationStatus::Expiring);

        let february = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let standing = resolve_from_purchase(purchase, 24, february).unwrap();
        assert_eq!(standing.status, RegistrationStatus::Expired);
        assert_eq!(standing.days_left, 0);
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(RegistrationStatus::from_days_left(-5), RegistrationStatus::Expired);
        assert_eq!(RegistrationStatus::from_days_left(0), RegistrationStatus::Expired);
        assert_eq!(RegistrationStatus::from_days_left(1), RegistrationStatus::Expiring);
        assert_eq!(RegistrationStatus::from_days_left(30), RegistrationStatus::Expiring);
        assert_eq!(RegistrationStatus::from_days_left(31), RegistrationStatus::Active);
    }

    #[test]
    fn test_expires_at_midnight_on_expiry_date() {
        let expiry = date(2025, 1, 15);
        let just_before = Utc.with_ymd_and_hms(2025, 1, 14, 23, 59, 59).unwrap();
        let at_midnight = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();

        assert_eq!(resolve(expiry, just_before).status, RegistrationStatus::Expiring);
        assert_eq!(resolve(expiry, at_midnight).status, RegistrationStatus::Expired);
    }
}

//! Warranty validity gate
//!
//! A claim may only be filed against an existing registration whose expiry
//! date has not passed.

use chrono::{DateTime, Utc};

use domain_warranty::ProductRegistration;

use crate::error::ClaimError;

/// Checks that `registration` exists and covers `now`
pub fn check_coverage(
    registration: Option<ProductRegistration>,
    now: DateTime<Utc>,
) -> Result<ProductRegistration, ClaimError> {
    let registration = registration.ok_or(ClaimError::RegistrationNotFound)?;
    if !registration.is_covered_at(now) {
        return Err(ClaimError::WarrantyExpired);
    }
    Ok(registration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use core_kernel::{CustomerId, ProductId, RegistrationId};

    fn registration(expiry: NaiveDate) -> ProductRegistration {
        ProductRegistration {
            id: RegistrationId::new(),
            product_id: ProductId::new(),
            customer_id: CustomerId::new(),
            serial_number: "GATE-0001".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            expiry_date: expiry,
            retailer: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_registration() {
        let result = check_coverage(None, Utc::now());
        assert!(matches!(result, Err(ClaimError::RegistrationNotFound)));
    }

    #[test]
    fn test_expired_registration() {
        let expiry = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let result = check_coverage(Some(registration(expiry)), now);
        assert!(matches!(result, Err(ClaimError::WarrantyExpired)));
    }

    #[test]
    fn test_covered_until_expiry_midnight() {
        let expiry = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let now = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert!(check_coverage(Some(registration(expiry)), now).is_ok());
    }
}

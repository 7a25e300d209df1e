//! Product registrations
//!
//! A registration binds one purchased unit (by serial number) to a customer
//! and fixes its warranty window at registration time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{CustomerId, FieldErrors, ProductId, RegistrationId};

use crate::error::WarrantyError;
use crate::product::Product;
use crate::status::{self, WarrantyStanding};

/// Input for registering a purchased product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRegistration {
    #[validate(length(min = 5, message = "Serial number must be at least 5 characters"))]
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub retailer: Option<String>,
}

impl NewRegistration {
    /// Strips surrounding whitespace; empty retailers become `None`
    pub fn trimmed(self) -> Self {
        Self {
            serial_number: self.serial_number.trim().to_string(),
            purchase_date: self.purchase_date,
            retailer: self
                .retailer
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        }
    }

    /// Runs field validation plus the purchase-date check against `today`
    pub fn check(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        if self.purchase_date > today {
            errors.add("purchase_date", "Purchase date cannot be in the future");
        }
        errors.into_result()
    }
}

/// A customer's registered product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRegistration {
    pub id: RegistrationId,
    pub product_id: ProductId,
    pub customer_id: CustomerId,
    /// Globally unique serial number of the unit
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    /// purchase_date + product.warranty_months, moved forward by extensions
    pub expiry_date: NaiveDate,
    pub retailer: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProductRegistration {
    /// Registers `product` to `customer_id`, deriving the expiry date
    pub fn register(
        product: &Product,
        customer_id: CustomerId,
        input: NewRegistration,
        now: DateTime<Utc>,
    ) -> Result<Self, WarrantyError> {
        let input = input.trimmed();
        input.check(now.date_naive()).map_err(WarrantyError::Validation)?;

        let expiry_date = status::expiry_date(input.purchase_date, product.warranty_months)?;

        Ok(Self {
            id: RegistrationId::new_v7(),
            product_id: product.id,
            customer_id,
            serial_number: input.serial_number,
            purchase_date: input.purchase_date,
            expiry_date,
            retailer: input.retailer,
            created_at: now,
        })
    }

    /// Current standing of this registration's warranty
    pub fn standing(&self, now: DateTime<Utc>) -> WarrantyStanding {
        status::resolve(self.expiry_date, now)
    }

    /// True while `expiry_date >= now`; the gate applied before filing a claim
    pub fn is_covered_at(&self, now: DateTime<Utc>) -> bool {
        core_kernel::temporal::start_of_day(self.expiry_date) >= now
    }

    pub fn is_owned_by(&self, customer_id: CustomerId) -> bool {
        self.customer_id == customer_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_kernel::BusinessId;

    use crate::product::{NewProduct, ProductCategory};

    fn product(months: u32) -> Product {
        Product::create(
            BusinessId::new(),
            NewProduct {
                name: "SmartFridge".to_string(),
                description: "Two door refrigerator with ice maker".to_string(),
                category: ProductCategory::Appliances,
                warranty_months: months,
                serial_format: "SFR-####".to_string(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn input(serial: &str, purchase: NaiveDate) -> NewRegistration {
        NewRegistration {
            serial_number: serial.to_string(),
            purchase_date: purchase,
            retailer: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_register_derives_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let purchase = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();

        let registration =
            ProductRegistration::register(&product(24), CustomerId::new(), input("SFR-00001", purchase), now)
                .unwrap();

        assert_eq!(registration.expiry_date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(registration.retailer, None);
        assert!(registration.is_covered_at(now));
    }

    #[test]
    fn test_register_rejects_short_serial_and_future_purchase() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let future = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        let result =
            ProductRegistration::register(&product(12), CustomerId::new(), input("SFR", future), now);

        match result {
            Err(WarrantyError::Validation(errors)) => {
                assert!(errors.get("serial_number").is_some());
                assert!(errors.get("purchase_date").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_padded_serial_is_too_short() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let purchase = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();

        let result =
            ProductRegistration::register(&product(12), CustomerId::new(), input("   AB   ", purchase), now);

        match result {
            Err(WarrantyError::Validation(errors)) => assert!(errors.get("serial_number").is_some()),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_coverage_gate_on_expiry_day() {
        let purchase = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let registered_at = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        let registration =
            ProductRegistration::register(&product(1), CustomerId::new(), input("SFR-00002", purchase), registered_at)
                .unwrap();

        let expiry_midnight = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
        assert!(registration.is_covered_at(expiry_midnight));
        assert!(!registration.is_covered_at(expiry_midnight + chrono::Duration::seconds(1)));
    }
}

//! Pre-built Test Fixtures
//!
//! Consistent, predictable data for unit and integration tests. The dates
//! follow the reference scenario: a laptop with a 24 month warranty bought on
//! 2023-01-15, expiring 2025-01-15.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Sentence;
use fake::Fake;

use core_kernel::{Actor, BusinessId, CustomerId, UserId};
use domain_claims::{ContactPreference, IssueType, NewClaim};
use domain_warranty::{NewProduct, NewRegistration, ProductCategory};

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Purchase date of the reference laptop
    pub fn purchase_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()
    }

    /// Expiry of the reference laptop's 24 month warranty
    pub fn expiry_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    /// Well inside the warranty window
    pub fn while_active() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// 26 days before expiry
    pub fn while_expiring() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap()
    }

    /// After expiry
    pub fn after_expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
    }
}

/// Fixture for acting users
pub struct ActorFixtures;

impl ActorFixtures {
    pub fn business() -> Actor {
        Actor::business(UserId::new(), BusinessId::new())
    }

    pub fn business_of(business_id: BusinessId) -> Actor {
        Actor::business(UserId::new(), business_id)
    }

    pub fn customer() -> Actor {
        Actor::customer(UserId::new(), CustomerId::new())
    }

    pub fn customer_of(customer_id: CustomerId) -> Actor {
        Actor::customer(UserId::new(), customer_id)
    }
}

/// Fixture for request inputs
pub struct InputFixtures;

impl InputFixtures {
    /// Serial format of the reference laptop
    pub const LAPTOP_SERIAL_FORMAT: &'static str = "LPX1-####-####";

    /// Serial number of the reference laptop
    pub const LAPTOP_SERIAL: &'static str = "LPX1-7845-9371";

    /// The reference laptop with a 24 month warranty
    pub fn laptop() -> NewProduct {
        NewProduct {
            name: "UltraBook Pro".to_string(),
            description: "14 inch laptop with aluminium chassis".to_string(),
            category: ProductCategory::Electronics,
            warranty_months: 24,
            serial_format: Self::LAPTOP_SERIAL_FORMAT.to_string(),
        }
    }

    /// A product with randomized text fields
    pub fn random_product(serial_prefix: &str, warranty_months: u32) -> NewProduct {
        let company: String = CompanyName().fake();
        let description: String = Sentence(4..8).fake();
        NewProduct {
            name: format!("{} Device", company),
            description,
            category: ProductCategory::Other,
            warranty_months,
            serial_format: format!("{}-####", serial_prefix),
        }
    }

    /// Registration of the reference laptop
    pub fn laptop_registration() -> NewRegistration {
        NewRegistration {
            serial_number: Self::LAPTOP_SERIAL.to_string(),
            purchase_date: TemporalFixtures::purchase_date(),
            retailer: Some("Best Electronics".to_string()),
        }
    }

    /// A valid claim for the given product
    pub fn display_claim(product_id: core_kernel::ProductId) -> NewClaim {
        NewClaim {
            product_id,
            issue_type: IssueType::Display,
            description: "Screen flickers after waking from sleep".to_string(),
            contact_preference: ContactPreference::Email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_warranty::status;

    #[test]
    fn test_reference_dates_are_consistent() {
        let expiry = status::expiry_date(TemporalFixtures::purchase_date(), 24).unwrap();
        assert_eq!(expiry, TemporalFixtures::expiry_date());
    }

    #[test]
    fn test_random_product_keeps_prefix() {
        let product = InputFixtures::random_product("ZX9", 6);
        assert_eq!(product.serial_format, "ZX9-####");
        assert!(product.name.len() >= 2);
    }
}

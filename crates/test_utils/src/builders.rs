//! Test Data Builders
//!
//! Builder patterns for constructing domain models with sensible defaults.
//! Tests set only the fields they care about.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{BusinessId, ClaimId, CustomerId, ProductId, RegistrationId};
use domain_claims::{ClaimStatus, ContactPreference, IssueType, WarrantyClaim};
use domain_warranty::{status, Product, ProductCategory, ProductRegistration};

use crate::fixtures::{InputFixtures, TemporalFixtures};

/// Builder for catalog products
pub struct TestProductBuilder {
    id: ProductId,
    business_id: BusinessId,
    name: String,
    category: ProductCategory,
    warranty_months: u32,
    serial_format: String,
}

impl Default for TestProductBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProductBuilder {
    /// Defaults to the reference laptop
    pub fn new() -> Self {
        Self {
            id: ProductId::new(),
            business_id: BusinessId::new(),
            name: "UltraBook Pro".to_string(),
            category: ProductCategory::Electronics,
            warranty_months: 24,
            serial_format: InputFixtures::LAPTOP_SERIAL_FORMAT.to_string(),
        }
    }

    pub fn with_business(mut self, business_id: BusinessId) -> Self {
        self.business_id = business_id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_warranty_months(mut self, months: u32) -> Self {
        self.warranty_months = months;
        self
    }

    pub fn with_serial_format(mut self, format: impl Into<String>) -> Self {
        self.serial_format = format.into();
        self
    }

    pub fn build(self) -> Product {
        let now = Utc::now();
        Product {
            id: self.id,
            business_id: self.business_id,
            description: format!("{} used in tests", self.name),
            name: self.name,
            category: self.category,
            warranty_months: self.warranty_months,
            serial_format: self.serial_format,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Builder for registrations.
///
/// The expiry date is derived from the purchase date and the product term
/// unless set explicitly.
pub struct TestRegistrationBuilder {
    product: Product,
    customer_id: CustomerId,
    serial_number: String,
    purchase_date: NaiveDate,
    expiry_date: Option<NaiveDate>,
    retailer: Option<String>,
}

impl TestRegistrationBuilder {
    pub fn new(product: &Product) -> Self {
        Self {
            product: product.clone(),
            customer_id: CustomerId::new(),
            serial_number: InputFixtures::LAPTOP_SERIAL.to_string(),
            purchase_date: TemporalFixtures::purchase_date(),
            expiry_date: None,
            retailer: None,
        }
    }

    pub fn for_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = customer_id;
        self
    }

    pub fn with_serial(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = serial_number.into();
        self
    }

    pub fn purchased_on(mut self, date: NaiveDate) -> Self {
        self.purchase_date = date;
        self
    }

    pub fn expiring_on(mut self, date: NaiveDate) -> Self {
        self.expiry_date = Some(date);
        self
    }

    pub fn with_retailer(mut self, retailer: impl Into<String>) -> Self {
        self.retailer = Some(retailer.into());
        self
    }

    pub fn build(self) -> ProductRegistration {
        let expiry_date = self.expiry_date.unwrap_or_else(|| {
            status::expiry_date(self.purchase_date, self.product.warranty_months)
                .expect("test purchase date out of range")
        });

        ProductRegistration {
            id: RegistrationId::new(),
            product_id: self.product.id,
            customer_id: self.customer_id,
            serial_number: self.serial_number,
            purchase_date: self.purchase_date,
            expiry_date,
            retailer: self.retailer,
            created_at: Utc::now(),
        }
    }
}

/// Builder for claims in an arbitrary status
pub struct TestClaimBuilder {
    registration: ProductRegistration,
    issue_type: IssueType,
    description: String,
    status: ClaimStatus,
    created_at: DateTime<Utc>,
}

impl TestClaimBuilder {
    pub fn new(registration: &ProductRegistration) -> Self {
        Self {
            registration: registration.clone(),
            issue_type: IssueType::Hardware,
            description: "Device does not power on".to_string(),
            status: ClaimStatus::Pending,
            created_at: TemporalFixtures::while_active(),
        }
    }

    pub fn with_issue(mut self, issue_type: IssueType) -> Self {
        self.issue_type = issue_type;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn in_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn build(self) -> WarrantyClaim {
        WarrantyClaim {
            id: ClaimId::new(),
            product_id: self.registration.product_id,
            customer_id: self.registration.customer_id,
            registration_id: self.registration.id,
            issue_type: self.issue_type,
            description: self.description,
            contact_preference: ContactPreference::Email,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

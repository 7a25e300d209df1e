//! Product, warranty and extension DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ExtensionId, ProductId, RegistrationId};
use domain_warranty::{
    ExtensionPlan, ExtensionReceipt, Product, ProductCategory, RegistrationStatus,
    RegistrationView, WarrantyListing, WarrantySummary,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub warranty_months: u32,
    pub serial_format: String,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            category: p.category,
            warranty_months: p.warranty_months,
            serial_format: p.serial_format,
            created_at: p.created_at,
        }
    }
}

/// Product fields embedded in warranty and claim responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub category: ProductCategory,
}

impl From<&Product> for ProductSummary {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            category: p.category,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WarrantyResponse {
    pub id: RegistrationId,
    pub product: ProductSummary,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub retailer: Option<String>,
    pub status: RegistrationStatus,
    pub days_left: i64,
}

impl From<RegistrationView> for WarrantyResponse {
    fn from(view: RegistrationView) -> Self {
        let product = ProductSummary::from(&view.product);
        let r = view.registration;
        Self {
            id: r.id,
            product,
            serial_number: r.serial_number,
            purchase_date: r.purchase_date,
            expiry_date: r.expiry_date,
            retailer: r.retailer,
            status: view.standing.status,
            days_left: view.standing.days_left,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WarrantyListResponse {
    pub warranties: Vec<WarrantyResponse>,
    pub summary: SummaryResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total: usize,
    pub active: usize,
    pub expiring: usize,
    pub expired: usize,
}

impl From<WarrantySummary> for SummaryResponse {
    fn from(s: WarrantySummary) -> Self {
        Self {
            total: s.total,
            active: s.active,
            expiring: s.expiring,
            expired: s.expired,
        }
    }
}

impl From<WarrantyListing> for WarrantyListResponse {
    fn from(listing: WarrantyListing) -> Self {
        Self {
            warranties: listing.warranties.into_iter().map(Into::into).collect(),
            summary: listing.summary.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtendWarrantyRequest {
    pub plan: ExtensionPlan,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: ExtensionPlan,
    pub name: String,
    pub months: u32,
    pub price: Decimal,
    pub currency: String,
    pub coverage: Vec<String>,
}

impl From<ExtensionPlan> for PlanResponse {
    fn from(plan: ExtensionPlan) -> Self {
        let price = plan.price();
        Self {
            plan,
            name: plan.name().to_string(),
            months: plan.months(),
            price: price.amount(),
            currency: price.currency().code().to_string(),
            coverage: plan.coverage().iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtensionResponse {
    pub id: ExtensionId,
    pub plan: ExtensionPlan,
    pub price: Decimal,
    pub currency: String,
    pub previous_expiry: NaiveDate,
    pub new_expiry: NaiveDate,
    pub purchased_at: DateTime<Utc>,
    pub warranty: WarrantyResponse,
}

impl From<ExtensionReceipt> for ExtensionResponse {
    fn from(receipt: ExtensionReceipt) -> Self {
        let e = receipt.extension;
        Self {
            id: e.id,
            plan: e.plan,
            price: e.price.amount(),
            currency: e.price.currency().code().to_string(),
            previous_expiry: e.previous_expiry,
            new_expiry: e.new_expiry,
            purchased_at: e.purchased_at,
            warranty: receipt.warranty.into(),
        }
    }
}

//! Warranty Domain
//!
//! Products and their warranty terms, customer registrations of purchased
//! units, the registration status resolver, and paid extensions.
//!
//! # Registration status
//!
//! ```text
//! purchase_date + warranty_months = expiry_date
//!
//!   active ──(30 days before expiry)──> expiring ──(expiry date)──> expired
//! ```
//!
//! Status is derived on every read from the expiry date and the current
//! instant; it is never stored.

pub mod product;
pub mod registration;
pub mod status;
pub mod extension;
pub mod view;
pub mod ports;
pub mod service;
pub mod error;

pub use product::{NewProduct, Product, ProductCategory};
pub use registration::{NewRegistration, ProductRegistration};
pub use status::{RegistrationStatus, WarrantyStanding, EXPIRING_WINDOW_DAYS};
pub use extension::{ExtensionPlan, WarrantyExtension};
pub use view::{RegistrationView, WarrantyListing, WarrantySummary};
pub use ports::WarrantyPort;
pub use service::{ExtensionReceipt, WarrantyService};
pub use error::WarrantyError;

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockWarrantyPort;

//! Read models for warranty listings

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::product::Product;
use crate::registration::ProductRegistration;
use crate::status::{RegistrationStatus, WarrantyStanding};

/// A registration joined with its product and resolved standing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationView {
    pub registration: ProductRegistration,
    pub product: Product,
    pub standing: WarrantyStanding,
}

impl RegistrationView {
    pub fn new(registration: ProductRegistration, product: Product, now: DateTime<Utc>) -> Self {
        let standing = registration.standing(now);
        Self {
            registration,
            product,
            standing,
        }
    }
}

/// Count of registrations per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarrantySummary {
    pub total: usize,
    pub active: usize,
    pub expiring: usize,
    pub expired: usize,
}

impl WarrantySummary {
    pub fn from_views(views: &[RegistrationView]) -> Self {
        views.iter().fold(Self::default(), |mut summary, view| {
            summary.total += 1;
            match view.standing.status {
                RegistrationStatus::Active => summary.active += 1,
                RegistrationStatus::Expiring => summary.expiring += 1,
                RegistrationStatus::Expired => summary.expired += 1,
            }
            summary
        })
    }
}

/// A listing of warranties with its summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarrantyListing {
    pub warranties: Vec<RegistrationView>,
    pub summary: WarrantySummary,
}

impl From<Vec<RegistrationView>> for WarrantyListing {
    fn from(warranties: Vec<RegistrationView>) -> Self {
        let summary = WarrantySummary::from_views(&warranties);
        Self { warranties, summary }
    }
}

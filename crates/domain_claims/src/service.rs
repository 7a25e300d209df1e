//! Claim application service
//!
//! Orchestrates the validity gate, the claim state machine and the timeline
//! over `WarrantyPort` and `ClaimsPort`. Every operation takes the acting user
//! explicitly; authorization failures are reported as a bare `Unauthorized`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};
use validator::Validate;

use core_kernel::{Actor, BusinessId, ClaimId, CustomerId, PortError, ProductId};
use domain_warranty::{Product, ProductRegistration, WarrantyPort};

use crate::claim::{ClaimStatus, NewClaim, WarrantyClaim};
use crate::error::ClaimError;
use crate::gate;
use crate::ports::ClaimsPort;
use crate::timeline::{NewMessage, TimelineEntry};

/// A claim with everything needed to display it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimDetail {
    pub claim: WarrantyClaim,
    pub product: Product,
    pub registration: ProductRegistration,
    /// Oldest entry first
    pub timeline: Vec<TimelineEntry>,
}

/// Service for filing, progressing and discussing claims
#[derive(Clone)]
pub struct ClaimService {
    warranty: Arc<dyn WarrantyPort>,
    claims: Arc<dyn ClaimsPort>,
}

impl ClaimService {
    pub fn new(warranty: Arc<dyn WarrantyPort>, claims: Arc<dyn ClaimsPort>) -> Self {
        Self { warranty, claims }
    }

    fn require_business(actor: &Actor) -> Result<BusinessId, ClaimError> {
        actor.business_id().ok_or_else(|| {
            warn!(user_id = %actor.user_id(), "claim operation requires a business actor");
            ClaimError::Unauthorized
        })
    }

    fn require_customer(actor: &Actor) -> Result<CustomerId, ClaimError> {
        actor.customer_id().ok_or_else(|| {
            warn!(user_id = %actor.user_id(), "claim operation requires a customer actor");
            ClaimError::Unauthorized
        })
    }

    /// The filing customer or the business owning the product
    fn require_party(actor: &Actor, claim: &WarrantyClaim, product: &Product) -> Result<(), ClaimError> {
        let allowed = match actor {
            Actor::Customer { customer_id, .. } => claim.is_filed_by(*customer_id),
            Actor::Business { business_id, .. } => product.is_owned_by(*business_id),
        };
        if !allowed {
            warn!(user_id = %actor.user_id(), claim_id = %claim.id, "claim access by unrelated actor");
            return Err(ClaimError::Unauthorized);
        }
        Ok(())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Files a new claim for a product the acting customer has registered.
    ///
    /// The claim starts `pending` and is written together with its
    /// `created` timeline entry. Fails if the customer has no registration
    /// for the product or its warranty has expired.
    #[instrument(skip(self, input), fields(user_id = %actor.user_id(), product_id = %input.product_id))]
    pub async fn create_claim(
        &self,
        actor: &Actor,
        input: NewClaim,
        now: DateTime<Utc>,
    ) -> Result<ClaimDetail, ClaimError> {
        let customer_id = Self::require_customer(actor)?;
        let input = input.trimmed();
        input.validate().map_err(|e| ClaimError::Validation(e.into()))?;

        let registration = self
            .warranty
            .find_registration(customer_id, input.product_id)
            .await?;
        let registration = gate::check_coverage(registration, now)?;
        let product = self.load_product(registration.product_id).await?;

        let (claim, created) = WarrantyClaim::file(&registration, input, now)?;
        self.claims.insert_claim(&claim, &created).await?;

        info!(
            claim_id = %claim.id,
            registration_id = %registration.id,
            issue_type = %claim.issue_type,
            "claim filed"
        );

        Ok(ClaimDetail {
            claim,
            product,
            registration,
            timeline: vec![created],
        })
    }

    /// Moves a claim to `status` on behalf of the business owning its product.
    ///
    /// The status write and its `status-change` entry are one unit, and only
    /// succeed if nobody changed the status since it was read.
    #[instrument(skip(self), fields(user_id = %actor.user_id(), claim_id = %claim_id, status = %status))]
    pub async fn update_claim_status(
        &self,
        actor: &Actor,
        claim_id: ClaimId,
        status: ClaimStatus,
        now: DateTime<Utc>,
    ) -> Result<ClaimDetail, ClaimError> {
        let business_id = Self::require_business(actor)?;
        let mut claim = self.load_claim(claim_id).await?;
        let product = self.load_product(claim.product_id).await?;
        if !product.is_owned_by(business_id) {
            warn!(%business_id, %claim_id, "status change by non-owning business");
            return Err(ClaimError::Unauthorized);
        }

        let expected = claim.status;
        let entry = claim.transition(status, now)?;
        self.claims
            .apply_status_change(&claim, expected, &entry)
            .await
            .map_err(|e| match e {
                PortError::Conflict { .. } => ClaimError::ConcurrentModification,
                other => ClaimError::Port(other),
            })?;

        info!(from = %expected, to = %status, "claim status changed");

        self.detail(claim, product).await
    }

    /// Posts a message on a claim as the filing customer or owning business
    #[instrument(skip(self, input), fields(user_id = %actor.user_id(), claim_id = %claim_id))]
    pub async fn add_message(
        &self,
        actor: &Actor,
        claim_id: ClaimId,
        input: NewMessage,
        now: DateTime<Utc>,
    ) -> Result<TimelineEntry, ClaimError> {
        let claim = self.load_claim(claim_id).await?;
        let product = self.load_product(claim.product_id).await?;
        Self::require_party(actor, &claim, &product)?;

        let trimmed = NewMessage {
            content: input.content.trim().to_string(),
        };
        trimmed.validate().map_err(|e| ClaimError::Validation(e.into()))?;

        let entry = TimelineEntry::message(claim.id, actor.role().into(), &trimmed.content, now);
        self.claims.append_timeline(&entry).await?;
        info!(entry_id = %entry.id, "claim message added");

        Ok(entry)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The acting customer's claims, newest first
    #[instrument(skip(self), fields(user_id = %actor.user_id()))]
    pub async fn customer_claims(&self, actor: &Actor) -> Result<Vec<ClaimDetail>, ClaimError> {
        let customer_id = Self::require_customer(actor)?;
        let claims = self.claims.list_customer_claims(customer_id).await?;

        let mut products: HashMap<ProductId, Product> = HashMap::new();
        let mut details = Vec::with_capacity(claims.len());
        for claim in claims {
            let product = match products.get(&claim.product_id) {
                Some(product) => product.clone(),
                None => {
                    let product = self.load_product(claim.product_id).await?;
                    products.insert(product.id, product.clone());
                    product
                }
            };
            details.push(self.detail(claim, product).await?);
        }
        Ok(details)
    }

    /// Claims against the acting business's products, newest first
    #[instrument(skip(self), fields(user_id = %actor.user_id()))]
    pub async fn business_claims(&self, actor: &Actor) -> Result<Vec<ClaimDetail>, ClaimError> {
        let business_id = Self::require_business(actor)?;
        let products: HashMap<ProductId, Product> = self
            .warranty
            .list_products(business_id)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<ProductId> = products.keys().copied().collect();
        let claims = self.claims.list_product_claims(&ids).await?;

        let mut details = Vec::with_capacity(claims.len());
        for claim in claims {
            if let Some(product) = products.get(&claim.product_id) {
                details.push(self.detail(claim, product.clone()).await?);
            }
        }
        Ok(details)
    }

    /// A single claim, visible to the filing customer and the owning business
    #[instrument(skip(self), fields(user_id = %actor.user_id(), claim_id = %claim_id))]
    pub async fn get_claim(&self, actor: &Actor, claim_id: ClaimId) -> Result<ClaimDetail, ClaimError> {
        let claim = self.load_claim(claim_id).await?;
        let product = self.load_product(claim.product_id).await?;
        Self::require_party(actor, &claim, &product)?;
        self.detail(claim, product).await
    }

    // ========================================================================
    // Loading
    // ========================================================================

    async fn load_claim(&self, id: ClaimId) -> Result<WarrantyClaim, ClaimError> {
        self.claims.get_claim(id).await.map_err(|e| match e {
            PortError::NotFound { id, .. } => ClaimError::ClaimNotFound(id),
            other => ClaimError::Port(other),
        })
    }

    async fn load_product(&self, id: ProductId) -> Result<Product, ClaimError> {
        self.warranty.get_product(id).await.map_err(|e| match e {
            PortError::NotFound { id, .. } => ClaimError::ProductNotFound(id),
            other => ClaimError::Port(other),
        })
    }

    async fn detail(&self, claim: WarrantyClaim, product: Product) -> Result<ClaimDetail, ClaimError> {
        let registration = self
            .warranty
            .get_registration(claim.registration_id)
            .await
            .map_err(|e| match e {
                PortError::NotFound { .. } => ClaimError::RegistrationNotFound,
                other => ClaimError::Port(other),
            })?;
        let timeline = self.claims.timeline(claim.id).await?;

        Ok(ClaimDetail {
            claim,
            product,
            registration,
            timeline,
        })
    }
}

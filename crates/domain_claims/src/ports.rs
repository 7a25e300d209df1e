//! Claims Domain Ports
//!
//! `ClaimsPort` stores claims and their timelines. Writes that touch both a
//! claim row and a timeline row are single port calls so adapters can run
//! them in one transaction.

use async_trait::async_trait;

use core_kernel::{ClaimId, CustomerId, DomainPort, HealthCheckable, PortError, ProductId};

use crate::claim::{ClaimStatus, WarrantyClaim};
use crate::timeline::TimelineEntry;

/// Storage operations for claims and timeline entries
#[async_trait]
pub trait ClaimsPort: DomainPort + HealthCheckable {
    /// Stores a new claim together with its `created` entry
    async fn insert_claim(&self, claim: &WarrantyClaim, created: &TimelineEntry) -> Result<(), PortError>;

    /// Retrieves a claim by ID, or `PortError::NotFound`
    async fn get_claim(&self, id: ClaimId) -> Result<WarrantyClaim, PortError>;

    /// Lists a customer's claims, newest first
    async fn list_customer_claims(&self, customer_id: CustomerId) -> Result<Vec<WarrantyClaim>, PortError>;

    /// Lists claims against any of the given products, newest first
    async fn list_product_claims(&self, product_ids: &[ProductId]) -> Result<Vec<WarrantyClaim>, PortError>;

    /// A claim's timeline, oldest entry first
    async fn timeline(&self, claim_id: ClaimId) -> Result<Vec<TimelineEntry>, PortError>;

    /// Writes `claim.status` and appends `entry` as one unit.
    ///
    /// The write only happens while the stored status still equals
    /// `expected`; otherwise `PortError::Conflict` is returned and nothing is
    /// written.
    async fn apply_status_change(
        &self,
        claim: &WarrantyClaim,
        expected: ClaimStatus,
        entry: &TimelineEntry,
    ) -> Result<(), PortError>;

    /// Appends a message entry to an existing claim
    async fn append_timeline(&self, entry: &TimelineEntry) -> Result<(), PortError>;
}

/// Mock implementation of ClaimsPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    #[derive(Debug, Default)]
    struct Store {
        claims: HashMap<ClaimId, WarrantyClaim>,
        timelines: HashMap<ClaimId, Vec<TimelineEntry>>,
    }

    /// In-memory mock implementation of ClaimsPort
    #[derive(Debug, Default, Clone)]
    pub struct MockClaimsPort {
        store: Arc<RwLock<Store>>,
    }

    impl MockClaimsPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Timeline entries held across every claim
        pub async fn timeline_entry_count(&self) -> usize {
            self.store.read().await.timelines.values().map(Vec::len).sum()
        }

        /// Overwrites a stored claim's status without touching the timeline
        pub async fn force_status(&self, id: ClaimId, status: ClaimStatus) {
            if let Some(claim) = self.store.write().await.claims.get_mut(&id) {
                claim.status = status;
            }
        }
    }

    fn newest_first(mut claims: Vec<WarrantyClaim>) -> Vec<WarrantyClaim> {
        claims.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        claims
    }

    impl DomainPort for MockClaimsPort {}

    #[async_trait]
    impl HealthCheckable for MockClaimsPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-claims-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ClaimsPort for MockClaimsPort {
        async fn insert_claim(&self, claim: &WarrantyClaim, created: &TimelineEntry) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            if store.claims.contains_key(&claim.id) {
                return Err(PortError::conflict(format!("Claim {} already exists", claim.id)));
            }
            store.claims.insert(claim.id, claim.clone());
            store.timelines.insert(claim.id, vec![created.clone()]);
            Ok(())
        }

        async fn get_claim(&self, id: ClaimId) -> Result<WarrantyClaim, PortError> {
            self.store
                .read()
                .await
                .claims
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("WarrantyClaim", id))
        }

        async fn list_customer_claims(&self, customer_id: CustomerId) -> Result<Vec<WarrantyClaim>, PortError> {
            let store = self.store.read().await;
            Ok(newest_first(
                store
                    .claims
                    .values()
                    .filter(|c| c.customer_id == customer_id)
                    .cloned()
                    .collect(),
            ))
        }

        async fn list_product_claims(&self, product_ids: &[ProductId]) -> Result<Vec<WarrantyClaim>, PortError> {
            let store = self.store.read().await;
            Ok(newest_first(
                store
                    .claims
                    .values()
                    .filter(|c| product_ids.contains(&c.product_id))
                    .cloned()
                    .collect(),
            ))
        }

        async fn timeline(&self, claim_id: ClaimId) -> Result<Vec<TimelineEntry>, PortError> {
            Ok(self
                .store
                .read()
                .await
                .timelines
                .get(&claim_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn apply_status_change(
            &self,
            claim: &WarrantyClaim,
            expected: ClaimStatus,
            entry: &TimelineEntry,
        ) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            let stored = store
                .claims
                .get_mut(&claim.id)
                .ok_or_else(|| PortError::not_found("WarrantyClaim", claim.id))?;
            if stored.status != expected {
                return Err(PortError::conflict(format!(
                    "Claim {} is no longer {}",
                    claim.id, expected
                )));
            }
            stored.status = claim.status;
            stored.updated_at = claim.updated_at;
            store.timelines.entry(claim.id).or_default().push(entry.clone());
            Ok(())
        }

        async fn append_timeline(&self, entry: &TimelineEntry) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            if !store.claims.contains_key(&entry.claim_id) {
                return Err(PortError::not_found("WarrantyClaim", entry.claim_id));
            }
            store.timelines.entry(entry.claim_id).or_default().push(entry.clone());
            Ok(())
        }
    }
}

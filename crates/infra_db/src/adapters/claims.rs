//! PostgreSQL Claims Adapter
//!
//! Implements `ClaimsPort` over `ClaimsRepository`. Claim creation and status
//! changes are single repository calls that run in one transaction together
//! with their timeline entry.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    ClaimId, CustomerId, DomainPort, HealthCheckResult, HealthCheckable, PortError, ProductId,
    RegistrationId, TimelineEntryId,
};
use domain_claims::{
    ClaimStatus, ClaimsPort, ContactPreference, IssueType, Sender, TimelineEntry, TimelineKind,
    WarrantyClaim,
};

use crate::adapters::db_to_port_error;
use crate::repositories::claims::{
    ClaimRow, ClaimStatus as DbClaimStatus, ContactPreference as DbContactPreference,
    IssueType as DbIssueType, MessageSender as DbMessageSender, TimelineKind as DbTimelineKind,
    TimelineRow,
};
use crate::repositories::ClaimsRepository;

/// PostgreSQL-backed implementation of the ClaimsPort trait
#[derive(Debug, Clone)]
pub struct PostgresClaimsAdapter {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimsAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresClaimsAdapter {}

#[async_trait]
impl HealthCheckable for PostgresClaimsAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-claims-adapter").await
    }
}

#[async_trait]
impl ClaimsPort for PostgresClaimsAdapter {
    #[instrument(skip(self, claim, created), fields(claim_id = %claim.id))]
    async fn insert_claim(&self, claim: &WarrantyClaim, created: &TimelineEntry) -> Result<(), PortError> {
        debug!("Inserting claim with created entry");
        self.repository
            .create_with_entry(&claim_to_row(claim), &entry_to_row(created))
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get_claim(&self, id: ClaimId) -> Result<WarrantyClaim, PortError> {
        let row = self.repository.get_by_id(id.into()).await.map_err(db_to_port_error)?;
        Ok(row_to_claim(row))
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    async fn list_customer_claims(&self, customer_id: CustomerId) -> Result<Vec<WarrantyClaim>, PortError> {
        Ok(self
            .repository
            .find_by_customer(customer_id.into())
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(row_to_claim)
            .collect())
    }

    #[instrument(skip(self, product_ids), fields(count = product_ids.len()))]
    async fn list_product_claims(&self, product_ids: &[ProductId]) -> Result<Vec<WarrantyClaim>, PortError> {
        let ids: Vec<Uuid> = product_ids.iter().map(|id| Uuid::from(*id)).collect();
        Ok(self
            .repository
            .find_by_products(&ids)
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(row_to_claim)
            .collect())
    }

    #[instrument(skip(self), fields(claim_id = %claim_id))]
    async fn timeline(&self, claim_id: ClaimId) -> Result<Vec<TimelineEntry>, PortError> {
        Ok(self
            .repository
            .timeline(claim_id.into())
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(row_to_entry)
            .collect())
    }

    #[instrument(skip(self, claim, entry), fields(claim_id = %claim.id, from = %expected, to = %claim.status))]
    async fn apply_status_change(
        &self,
        claim: &WarrantyClaim,
        expected: ClaimStatus,
        entry: &TimelineEntry,
    ) -> Result<(), PortError> {
        self.repository
            .update_status(
                claim.id.into(),
                status_to_db(expected),
                status_to_db(claim.status),
                claim.updated_at,
                &entry_to_row(entry),
            )
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, entry), fields(claim_id = %entry.claim_id, kind = %entry.kind))]
    async fn append_timeline(&self, entry: &TimelineEntry) -> Result<(), PortError> {
        self.repository
            .append_entry(&entry_to_row(entry))
            .await
            .map_err(db_to_port_error)
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn status_to_db(status: ClaimStatus) -> DbClaimStatus {
    match status {
        ClaimStatus::Pending => DbClaimStatus::Pending,
        ClaimStatus::InProgress => DbClaimStatus::InProgress,
        ClaimStatus::Resolved => DbClaimStatus::Resolved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
    }
}

fn db_to_status(status: DbClaimStatus) -> ClaimStatus {
    match status {
        DbClaimStatus::Pending => ClaimStatus::Pending,
        DbClaimStatus::InProgress => ClaimStatus::InProgress,
        DbClaimStatus::Resolved => ClaimStatus::Resolved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
    }
}

fn claim_to_row(claim: &WarrantyClaim) -> ClaimRow {
    ClaimRow {
        claim_id: claim.id.into(),
        product_id: claim.product_id.into(),
        customer_id: claim.customer_id.into(),
        registration_id: claim.registration_id.into(),
        issue_type: match claim.issue_type {
            IssueType::Hardware => DbIssueType::Hardware,
            IssueType::Software => DbIssueType::Software,
            IssueType::Connectivity => DbIssueType::Connectivity,
            IssueType::Power => DbIssueType::Power,
            IssueType::Display => DbIssueType::Display,
            IssueType::Audio => DbIssueType::Audio,
            IssueType::Other => DbIssueType::Other,
        },
        description: claim.description.clone(),
        contact_preference: match claim.contact_preference {
            ContactPreference::Email => DbContactPreference::Email,
            ContactPreference::Phone => DbContactPreference::Phone,
            ContactPreference::Sms => DbContactPreference::Sms,
        },
        status: status_to_db(claim.status),
        created_at: claim.created_at,
        updated_at: claim.updated_at,
    }
}

fn row_to_claim(row: ClaimRow) -> WarrantyClaim {
    WarrantyClaim {
        id: ClaimId::from(row.claim_id),
        product_id: ProductId::from(row.product_id),
        customer_id: CustomerId::from(row.customer_id),
        registration_id: RegistrationId::from(row.registration_id),
        issue_type: match row.issue_type {
            DbIssueType::Hardware => IssueType::Hardware,
            DbIssueType::Software => IssueType::Software,
            DbIssueType::Connectivity => IssueType::Connectivity,
            DbIssueType::Power => IssueType::Power,
            DbIssueType::Display => IssueType::Display,
            DbIssueType::Audio => IssueType::Audio,
            DbIssueType::Other => IssueType::Other,
        },
        description: row.description,
        contact_preference: match row.contact_preference {
            DbContactPreference::Email => ContactPreference::Email,
            DbContactPreference::Phone => ContactPreference::Phone,
            DbContactPreference::Sms => ContactPreference::Sms,
        },
        status: db_to_status(row.status),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn entry_to_row(entry: &TimelineEntry) -> TimelineRow {
    TimelineRow {
        entry_id: entry.id.into(),
        claim_id: entry.claim_id.into(),
        kind: match entry.kind {
            TimelineKind::Created => DbTimelineKind::Created,
            TimelineKind::StatusChange => DbTimelineKind::StatusChange,
            TimelineKind::Message => DbTimelineKind::Message,
        },
        description: entry.description.clone(),
        sender: entry.sender.map(|s| match s {
            Sender::Customer => DbMessageSender::Customer,
            Sender::Business => DbMessageSender::Business,
        }),
        created_at: entry.created_at,
    }
}

fn row_to_entry(row: TimelineRow) -> TimelineEntry {
    TimelineEntry {
        id: TimelineEntryId::from(row.entry_id),
        claim_id: ClaimId::from(row.claim_id),
        kind: match row.kind {
            DbTimelineKind::Created => TimelineKind::Created,
            DbTimelineKind::StatusChange => TimelineKind::StatusChange,
            DbTimelineKind::Message => TimelineKind::Message,
        },
        description: row.description,
        sender: row.sender.map(|s| match s {
            DbMessageSender::Customer => Sender::Customer,
            DbMessageSender::Business => Sender::Business,
        }),
        created_at: row.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_status_mapping_is_bijective() {
        for status in ClaimStatus::ALL {
            assert_eq!(db_to_status(status_to_db(status)), status);
        }
    }

    #[test]
    fn test_message_entry_round_trip() {
        let entry = TimelineEntry::message(ClaimId::new(), Sender::Customer, "Still broken", Utc::now());
        let row = entry_to_row(&entry);
        assert_eq!(row.sender, Some(DbMessageSender::Customer));
        assert_eq!(row_to_entry(row), entry);
    }
}

//! Claims DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, RegistrationId, TimelineEntryId};
use domain_claims::{
    ClaimDetail, ClaimStatus, ContactPreference, IssueType, Sender, TimelineEntry, TimelineKind,
};

use crate::dto::warranty::ProductSummary;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ClaimStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimelineEntryResponse {
    pub id: TimelineEntryId,
    #[serde(rename = "type")]
    pub kind: TimelineKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Sender>,
    pub created_at: DateTime<Utc>,
}

impl From<TimelineEntry> for TimelineEntryResponse {
    fn from(e: TimelineEntry) -> Self {
        Self {
            id: e.id,
            kind: e.kind,
            description: e.description,
            sender: e.sender,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub id: ClaimId,
    pub status: ClaimStatus,
    /// Statuses the claim may move to next
    pub next_statuses: Vec<ClaimStatus>,
    pub issue_type: IssueType,
    pub description: String,
    pub contact_preference: ContactPreference,
    pub product: ProductSummary,
    pub registration_id: RegistrationId,
    pub serial_number: String,
    pub expiry_date: NaiveDate,
    pub timeline: Vec<TimelineEntryResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClaimDetail> for ClaimResponse {
    fn from(detail: ClaimDetail) -> Self {
        let claim = detail.claim;
        Self {
            id: claim.id,
            next_statuses: claim.status.next_statuses(),
            status: claim.status,
            issue_type: claim.issue_type,
            description: claim.description,
            contact_preference: claim.contact_preference,
            product: ProductSummary::from(&detail.product),
            registration_id: detail.registration.id,
            serial_number: detail.registration.serial_number,
            expiry_date: detail.registration.expiry_date,
            timeline: detail.timeline.into_iter().map(Into::into).collect(),
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}

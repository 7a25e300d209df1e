//! Warranty claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use core_kernel::{ClaimId, CustomerId, FieldErrors, ProductId, RegistrationId};
use domain_warranty::ProductRegistration;

use crate::error::ClaimError;
use crate::timeline::TimelineEntry;

/// Claim status
///
/// ```text
/// pending ──> in-progress ──> resolved
///    │             └────────> rejected
///    ├──────────────────────> resolved
///    └──────────────────────> rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimStatus {
    /// Filed, not yet looked at by the business
    Pending,
    /// Being worked on
    InProgress,
    Resolved,
    Rejected,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::Pending,
        ClaimStatus::InProgress,
        ClaimStatus::Resolved,
        ClaimStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::InProgress => "in-progress",
            ClaimStatus::Resolved => "resolved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (*self, target),
            (Pending, InProgress) |
            (Pending, Resolved) |
            (Pending, Rejected) |
            (InProgress, Resolved) |
            (InProgress, Rejected)
        )
    }

    /// Statuses reachable in one step
    pub fn next_statuses(&self) -> Vec<ClaimStatus> {
        Self::ALL
            .into_iter()
            .filter(|s| self.can_transition_to(*s))
            .collect()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Resolved | ClaimStatus::Rejected)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ClaimStatus::Pending),
            "in-progress" => Ok(ClaimStatus::InProgress),
            "resolved" => Ok(ClaimStatus::Resolved),
            "rejected" => Ok(ClaimStatus::Rejected),
            _ => Err(format!("Unknown claim status: {}", s)),
        }
    }
}

/// Kind of problem reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Hardware,
    Software,
    Connectivity,
    Power,
    Display,
    Audio,
    Other,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Hardware => "hardware",
            IssueType::Software => "software",
            IssueType::Connectivity => "connectivity",
            IssueType::Power => "power",
            IssueType::Display => "display",
            IssueType::Audio => "audio",
            IssueType::Other => "other",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hardware" => Ok(IssueType::Hardware),
            "software" => Ok(IssueType::Software),
            "connectivity" => Ok(IssueType::Connectivity),
            "power" => Ok(IssueType::Power),
            "display" => Ok(IssueType::Display),
            "audio" => Ok(IssueType::Audio),
            "other" => Ok(IssueType::Other),
            _ => Err(format!("Unknown issue type: {}", s)),
        }
    }
}

/// How the customer wants to be contacted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPreference {
    Email,
    Phone,
    Sms,
}

impl ContactPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactPreference::Email => "email",
            ContactPreference::Phone => "phone",
            ContactPreference::Sms => "sms",
        }
    }
}

impl fmt::Display for ContactPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(ContactPreference::Email),
            "phone" => Ok(ContactPreference::Phone),
            "sms" => Ok(ContactPreference::Sms),
            _ => Err(format!("Unknown contact preference: {}", s)),
        }
    }
}

/// Input for filing a claim
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewClaim {
    pub product_id: ProductId,
    pub issue_type: IssueType,
    #[validate(length(min = 10, message = "Please provide a detailed description (at least 10 characters)"))]
    pub description: String,
    pub contact_preference: ContactPreference,
}

impl NewClaim {
    pub fn trimmed(self) -> Self {
        Self {
            description: self.description.trim().to_string(),
            ..self
        }
    }
}

/// A warranty claim against a registered product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyClaim {
    pub id: ClaimId,
    pub product_id: ProductId,
    pub customer_id: CustomerId,
    pub registration_id: RegistrationId,
    pub issue_type: IssueType,
    pub description: String,
    pub contact_preference: ContactPreference,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WarrantyClaim {
    /// Files a pending claim against `registration`.
    ///
    /// Returns the claim together with its `created` timeline entry; both must
    /// be stored as one unit. Coverage is checked by the caller.
    pub fn file(
        registration: &ProductRegistration,
        input: NewClaim,
        now: DateTime<Utc>,
    ) -> Result<(Self, TimelineEntry), FieldErrors> {
        let input = input.trimmed();
        input.validate()?;

        let claim = Self {
            id: ClaimId::new_v7(),
            product_id: registration.product_id,
            customer_id: registration.customer_id,
            registration_id: registration.id,
            issue_type: input.issue_type,
            description: input.description,
            contact_preference: input.contact_preference,
            status: ClaimStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let entry = TimelineEntry::created(claim.id, now);

        Ok((claim, entry))
    }

    /// Moves the claim to `target` and returns the `status-change` entry
    /// recording it
    pub fn transition(&mut self, target: ClaimStatus, now: DateTime<Utc>) -> Result<TimelineEntry, ClaimError> {
        if !self.status.can_transition_to(target) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = now;
        Ok(TimelineEntry::status_change(self.id, target, now))
    }

    pub fn is_filed_by(&self, customer_id: CustomerId) -> bool {
        self.customer_id == customer_id
    }
}

//! Append-only claim timeline
//!
//! Every claim carries an ordered list of entries: exactly one `created`
//! entry, one `status-change` entry per status write, and any number of
//! `message` entries. Entries are never mutated or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use core_kernel::{ClaimId, Role, TimelineEntryId};

use crate::claim::ClaimStatus;

pub const CLAIM_SUBMITTED: &str = "Claim submitted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineKind {
    Created,
    StatusChange,
    Message,
}

impl TimelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineKind::Created => "created",
            TimelineKind::StatusChange => "status-change",
            TimelineKind::Message => "message",
        }
    }
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimelineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(TimelineKind::Created),
            "status-change" => Ok(TimelineKind::StatusChange),
            "message" => Ok(TimelineKind::Message),
            _ => Err(format!("Unknown timeline kind: {}", s)),
        }
    }
}

/// Author side of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Customer,
    Business,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Customer => "customer",
            Sender::Business => "business",
        }
    }
}

impl From<Role> for Sender {
    fn from(role: Role) -> Self {
        match role {
            Role::Customer => Sender::Customer,
            Role::Business => Sender::Business,
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Sender::Customer),
            "business" => Ok(Sender::Business),
            _ => Err(format!("Unknown sender: {}", s)),
        }
    }
}

/// Input for posting a message on a claim
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMessage {
    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters"))]
    pub content: String,
}

/// One row of a claim's timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: TimelineEntryId,
    pub claim_id: ClaimId,
    pub kind: TimelineKind,
    /// Description for system entries, body for messages
    pub description: String,
    /// Set on messages only
    pub sender: Option<Sender>,
    pub created_at: DateTime<Utc>,
}

impl TimelineEntry {
    fn new(
        claim_id: ClaimId,
        kind: TimelineKind,
        description: String,
        sender: Option<Sender>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TimelineEntryId::new_v7(),
            claim_id,
            kind,
            description,
            sender,
            created_at: now,
        }
    }

    pub fn created(claim_id: ClaimId, now: DateTime<Utc>) -> Self {
        Self::new(claim_id, TimelineKind::Created, CLAIM_SUBMITTED.to_string(), None, now)
    }

    pub fn status_change(claim_id: ClaimId, status: ClaimStatus, now: DateTime<Utc>) -> Self {
        Self::new(
            claim_id,
            TimelineKind::StatusChange,
            format!("Claim status changed to {}", status),
            None,
            now,
        )
    }

    pub fn message(claim_id: ClaimId, sender: Sender, content: &str, now: DateTime<Utc>) -> Self {
        Self::new(claim_id, TimelineKind::Message, content.trim().to_string(), Some(sender), now)
    }
}

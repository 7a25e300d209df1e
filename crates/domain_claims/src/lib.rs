//! Claims Domain
//!
//! Warranty claims from filing through resolution, with an append-only
//! timeline of status changes and messages.
//!
//! # Claim Lifecycle
//!
//! ```text
//! pending -> in-progress -> resolved / rejected
//! pending -> resolved / rejected
//! ```
//!
//! A claim can only be filed while the customer's registration for the
//! product is still under warranty (see [`gate`]). Only the business owning
//! the product moves a claim between statuses; each move appends exactly one
//! timeline entry in the same write.

pub mod claim;
pub mod timeline;
pub mod gate;
pub mod ports;
pub mod service;
pub mod error;

pub use claim::{ClaimStatus, ContactPreference, IssueType, NewClaim, WarrantyClaim};
pub use timeline::{NewMessage, Sender, TimelineEntry, TimelineKind};
pub use ports::ClaimsPort;
pub use service::{ClaimDetail, ClaimService};
pub use error::ClaimError;

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockClaimsPort;

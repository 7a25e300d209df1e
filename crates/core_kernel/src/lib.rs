//! Core Kernel - Foundational types for the warranty system
//!
//! This crate provides the building blocks used by every domain crate:
//! - Strongly-typed identifiers
//! - Calendar-month arithmetic for warranty windows
//! - Money with precise decimal arithmetic
//! - The authenticated actor context passed into every operation
//! - Port error and health-check types shared by adapters
//! - Field-level validation errors

pub mod identifiers;
pub mod temporal;
pub mod money;
pub mod actor;
pub mod ports;
pub mod validation;

pub use identifiers::{
    ProductId, RegistrationId, ExtensionId, ClaimId, TimelineEntryId,
    UserId, BusinessId, CustomerId,
};
pub use temporal::TemporalError;
pub use money::{Money, Currency};
pub use actor::{Actor, Role};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
pub use validation::FieldErrors;

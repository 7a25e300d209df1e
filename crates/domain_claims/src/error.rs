//! Claims domain errors

use thiserror::Error;

use core_kernel::{FieldErrors, PortError};

use crate::claim::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Wrong role or not a party to the claim; carries no detail
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Product registration not found")]
    RegistrationNotFound,

    #[error("Warranty for this product has expired")]
    WarrantyExpired,

    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: ClaimStatus, to: ClaimStatus },

    #[error("Claim was modified by another request")]
    ConcurrentModification,

    #[error(transparent)]
    Port(#[from] PortError),
}

impl From<FieldErrors> for ClaimError {
    fn from(errors: FieldErrors) -> Self {
        ClaimError::Validation(errors)
    }
}

//! Warranty domain errors

use thiserror::Error;

use core_kernel::{FieldErrors, PortError, TemporalError};

/// Errors that can occur in the warranty domain
#[derive(Debug, Error)]
pub enum WarrantyError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Wrong role or not the owner; deliberately carries no detail
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Product not found with this serial number")]
    SerialNotRecognized,

    #[error("This product is already registered")]
    DuplicateSerial,

    #[error("Registration not found: {0}")]
    RegistrationNotFound(String),

    #[error("Warranty for this product has expired")]
    WarrantyExpired,

    #[error("Date error: {0}")]
    Temporal(#[from] TemporalError),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl From<FieldErrors> for WarrantyError {
    fn from(errors: FieldErrors) -> Self {
        WarrantyError::Validation(errors)
    }
}

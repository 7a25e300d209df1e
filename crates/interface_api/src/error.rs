//! API error handling
//!
//! Domain errors map onto HTTP statuses here. Authorization failures never
//! say why, and infrastructure failures are logged but not echoed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::{FieldErrors, PortError};
use domain_claims::ClaimError;
use domain_warranty::WarrantyError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// No valid bearer token
    #[error("Unauthorized")]
    Unauthenticated,

    /// Wrong role or not the owner
    #[error("Unauthorized")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable")]
    Unavailable,

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", msg, None)
            }
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
                None,
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "Unauthorized".to_string(),
                None,
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
                "Service temporarily unavailable".to_string(),
                None,
            ),
            ApiError::Internal(msg) => {
                error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Connection { .. } => {
                error!(error = %err, "storage unavailable");
                ApiError::Unavailable
            }
            PortError::NotFound { entity_type, .. } => {
                ApiError::NotFound(format!("{} not found", entity_type))
            }
            PortError::Conflict { message } => ApiError::Conflict(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<WarrantyError> for ApiError {
    fn from(err: WarrantyError) -> Self {
        match err {
            WarrantyError::Validation(errors) => ApiError::Validation(errors),
            WarrantyError::Unauthorized => ApiError::Forbidden,
            WarrantyError::ProductNotFound(_) => ApiError::NotFound("Product not found".to_string()),
            WarrantyError::RegistrationNotFound(_) => {
                ApiError::NotFound("Product registration not found".to_string())
            }
            e @ WarrantyError::SerialNotRecognized => ApiError::NotFound(e.to_string()),
            e @ WarrantyError::DuplicateSerial => ApiError::Conflict(e.to_string()),
            e @ WarrantyError::WarrantyExpired => ApiError::Unprocessable(e.to_string()),
            e @ WarrantyError::Temporal(_) => ApiError::Unprocessable(e.to_string()),
            WarrantyError::Port(e) => e.into(),
        }
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::Validation(errors) => ApiError::Validation(errors),
            ClaimError::Unauthorized => ApiError::Forbidden,
            ClaimError::ProductNotFound(_) => ApiError::NotFound("Product not found".to_string()),
            e @ ClaimError::RegistrationNotFound => ApiError::NotFound(e.to_string()),
            e @ ClaimError::WarrantyExpired => ApiError::Unprocessable(e.to_string()),
            ClaimError::ClaimNotFound(_) => ApiError::NotFound("Claim not found".to_string()),
            e @ ClaimError::InvalidStatusTransition { .. } => ApiError::Conflict(e.to_string()),
            e @ ClaimError::ConcurrentModification => ApiError::Conflict(e.to_string()),
            ClaimError::Port(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        ApiError::Unauthenticated
    }
}

//! Domain Adapters
//!
//! PostgreSQL implementations of the domain ports. Each adapter:
//! - Implements the domain's port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! Database errors are translated to `PortError` variants:
//! - `DatabaseError::NotFound` -> `PortError::NotFound`
//! - `DuplicateEntry` / `StaleWrite` -> `PortError::Conflict`
//! - connection failures -> `PortError::Connection`
//! - everything else -> `PortError::Internal`

pub mod warranty;
pub mod claims;

pub use warranty::PostgresWarrantyAdapter;
pub use claims::PostgresClaimsAdapter;

use std::time::Instant;

use chrono::Utc;
use sqlx::PgPool;

use core_kernel::{AdapterHealth, HealthCheckResult, PortError};

use crate::error::DatabaseError;

/// Converts a database error to a port error
pub(crate) fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound { entity, id } => PortError::not_found(entity, id),
        DatabaseError::DuplicateEntry(msg) | DatabaseError::StaleWrite(msg) => PortError::conflict(msg),
        DatabaseError::Unmappable(msg) => PortError::transformation(msg),
        e if e.is_connection_error() => PortError::Connection {
            message: e.to_string(),
            source: Some(Box::new(e)),
        },
        e => PortError::Internal {
            message: e.to_string(),
            source: Some(Box::new(e)),
        },
    }
}

/// Health probe shared by the adapters
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();
    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (status, message) = match result {
        Ok(_) => (AdapterHealth::Healthy, None),
        Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
    };

    HealthCheckResult {
        adapter_id: adapter_id.to_string(),
        status,
        latency_ms,
        message,
        checked_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_translation() {
        assert!(db_to_port_error(DatabaseError::not_found("Product", "x")).is_not_found());
        assert!(db_to_port_error(DatabaseError::DuplicateEntry("serial".into())).is_conflict());
        assert!(db_to_port_error(DatabaseError::StaleWrite("claim".into())).is_conflict());
        assert!(db_to_port_error(DatabaseError::PoolExhausted).is_transient());
        assert!(matches!(
            db_to_port_error(DatabaseError::QueryFailed("boom".into())),
            PortError::Internal { .. }
        ));
    }
}

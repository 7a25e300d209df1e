//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the warranty system using SQLx: connection
//! pooling, migrations, repositories over the raw tables, and adapters that
//! implement the domain ports.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::{PostgresClaimsAdapter, PostgresWarrantyAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/warranty")).await?;
//! run_migrations(&pool).await?;
//! let warranty = Arc::new(PostgresWarrantyAdapter::new(pool.clone()));
//! let claims = Arc::new(PostgresClaimsAdapter::new(pool));
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::{PostgresClaimsAdapter, PostgresWarrantyAdapter};

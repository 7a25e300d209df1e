//! Test Utilities Crate
//!
//! Shared test infrastructure for the warranty workspace.
//!
//! # Modules
//!
//! - `fixtures`: Fixed dates, actors and inputs used across suites
//! - `builders`: Builders for products, registrations and claims
//! - `database`: PostgreSQL testcontainer management
//! - `assertions`: Assertion helpers for standings and timelines
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;

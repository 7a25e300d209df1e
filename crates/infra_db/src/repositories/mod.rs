//! Repository implementations for domain entities
//!
//! Repositories encapsulate SQL and map between database rows and plain
//! column values. Multi-table writes open their own transaction. Queries are
//! checked at runtime (`query_as::<_, Row>`) so the crate builds without a
//! live database.

pub mod products;
pub mod registrations;
pub mod claims;

pub use products::ProductRepository;
pub use registrations::RegistrationRepository;
pub use claims::ClaimsRepository;

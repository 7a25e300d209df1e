//! Request and response bodies
//!
//! Create requests deserialize straight into the domain input types
//! (`NewProduct`, `NewRegistration`, `NewClaim`, `NewMessage`); the types here
//! cover the remaining requests and shape responses.

pub mod claims;
pub mod warranty;

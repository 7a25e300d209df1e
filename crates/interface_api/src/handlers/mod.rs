//! Request handlers
//!
//! Handlers take the [`Actor`](core_kernel::Actor) placed in the request by the
//! auth middleware, read the clock once, and delegate to the domain services.

pub mod claims;
pub mod health;
pub mod products;
pub mod warranties;

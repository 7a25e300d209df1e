//! Authenticated actor context
//!
//! Every lifecycle operation receives the acting user explicitly. An actor is
//! either a business (owner of products, arbiter of claim status) or a
//! customer (owner of registrations and the claims filed against them).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::identifiers::{BusinessId, CustomerId, UserId};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Business,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Business => "BUSINESS",
            Role::Customer => "CUSTOMER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUSINESS" => Ok(Role::Business),
            "CUSTOMER" => Ok(Role::Customer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// The authenticated user performing an operation, with their profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "UPPERCASE")]
pub enum Actor {
    Business {
        user_id: UserId,
        business_id: BusinessId,
    },
    Customer {
        user_id: UserId,
        customer_id: CustomerId,
    },
}

impl Actor {
    pub fn business(user_id: UserId, business_id: BusinessId) -> Self {
        Actor::Business { user_id, business_id }
    }

    pub fn customer(user_id: UserId, customer_id: CustomerId) -> Self {
        Actor::Customer { user_id, customer_id }
    }

    pub fn role(&self) -> Role {
        match self {
            Actor::Business { .. } => Role::Business,
            Actor::Customer { .. } => Role::Customer,
        }
    }

    pub fn user_id(&self) -> UserId {
        match self {
            Actor::Business { user_id, .. } | Actor::Customer { user_id, .. } => *user_id,
        }
    }

    /// Business profile, if this actor is a business
    pub fn business_id(&self) -> Option<BusinessId> {
        match self {
            Actor::Business { business_id, .. } => Some(*business_id),
            Actor::Customer { .. } => None,
        }
    }

    /// Customer profile, if this actor is a customer
    pub fn customer_id(&self) -> Option<CustomerId> {
        match self {
            Actor::Customer { customer_id, .. } => Some(*customer_id),
            Actor::Business { .. } => None,
        }
    }

    /// True if this actor is the given business
    pub fn is_business(&self, business_id: BusinessId) -> bool {
        self.business_id() == Some(business_id)
    }

    /// True if this actor is the given customer
    pub fn is_customer(&self, customer_id: CustomerId) -> bool {
        self.customer_id() == Some(customer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_actor_accessors() {
        let business_id = BusinessId::new();
        let actor = Actor::business(UserId::new(), business_id);

        assert_eq!(actor.role(), Role::Business);
        assert_eq!(actor.business_id(), Some(business_id));
        assert_eq!(actor.customer_id(), None);
        assert!(actor.is_business(business_id));
        assert!(!actor.is_business(BusinessId::new()));
    }

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!("customer".parse::<Role>().unwrap(), Role::Customer);
        assert_eq!(Role::Business.to_string(), "BUSINESS");
        assert!("ADMIN".parse::<Role>().is_err());
    }
}

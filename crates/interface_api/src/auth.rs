//! Bearer token authentication
//!
//! Tokens are HS256 JWTs naming the user, their role and the id of their
//! business or customer profile. A validated token becomes an [`Actor`].

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use core_kernel::{Actor, BusinessId, CustomerId, Role, UserId};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    pub role: Role,
    /// Business or customer profile of the user, depending on `role`
    pub profile_id: Uuid,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        let user_id = UserId::from(self.sub);
        match self.role {
            Role::Business => Actor::business(user_id, BusinessId::from(self.profile_id)),
            Role::Customer => Actor::customer(user_id, CustomerId::from(self.profile_id)),
        }
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
}

/// Issues a token for `actor`, valid for `expiration_secs`
pub fn create_token(actor: &Actor, secret: &str, expiration_secs: u64) -> Result<String, AuthError> {
    let now = Utc::now();
    let lifetime = i64::try_from(expiration_secs).map_err(|_| AuthError::InvalidToken)?;
    let exp = now + Duration::seconds(lifetime);

    let profile_id = match actor {
        Actor::Business { business_id, .. } => Uuid::from(*business_id),
        Actor::Customer { customer_id, .. } => Uuid::from(*customer_id),
    };
    let claims = Claims {
        sub: actor.user_id().into(),
        role: actor.role(),
        profile_id,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a token and returns its claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_restores_actor() {
        let actor = Actor::customer(UserId::new(), CustomerId::new());
        let token = create_token(&actor, SECRET, 60).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.role, Role::Customer);
        assert_eq!(claims.actor(), actor);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let actor = Actor::business(UserId::new(), BusinessId::new());
        let token = create_token(&actor, SECRET, 60).unwrap();

        assert!(matches!(
            validate_token(&token, "other-secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Business,
            profile_id: Uuid::new_v4(),
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(AuthError::TokenExpired)));
    }
}

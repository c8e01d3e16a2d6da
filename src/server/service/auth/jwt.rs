//! HS256 access tokens.

use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::{UserRole, UserTier};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::server::{
    error::{auth::AuthError, internal::InternalError},
    model::user::User,
};

/// Claims carried by an access token.
///
/// `role` and `tier` are informational for clients; the server always reloads the
/// user, so a tier change takes effect before the token expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a string
    pub sub: String,
    pub role: UserRole,
    pub tier: UserTier,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> Result<i32, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken(format!("non-numeric subject {}", self.sub)))
    }
}

/// Signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
}

impl JwtKeys {
    pub fn from_secret(secret: &str, access_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
        }
    }

    /// Lifetime of issued access tokens.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Signs an access token for `user` valid from `now`.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<String, InternalError> {
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            tier: user.tier,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(InternalError::TokenEncoding)
    }

    /// Checks signature and expiry of an access token.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: 7,
            email: "tipster@example.com".to_string(),
            name: "Tipster".to_string(),
            password_hash: String::new(),
            role: UserRole::Admin,
            tier: UserTier::Vip,
            email_verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::from_secret(secret, Duration::minutes(15))
    }

    #[test]
    fn issued_token_verifies_with_claims() {
        let keys = keys("secret");
        let now = Utc::now();
        let token = keys.issue(&user(), now).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.tier, UserTier::Vip);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = keys("secret").issue(&user(), Utc::now()).unwrap();
        let result = keys("another-secret").verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let keys = keys("secret");
        let token = keys.issue(&user(), Utc::now() - Duration::hours(2)).unwrap();
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_garbage() {
        assert!(keys("secret").verify("not.a.jwt").is_err());
    }
}

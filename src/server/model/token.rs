//! Email tokens and refresh tokens.
//!
//! Raw token values are only ever handed to the user; the database stores their SHA-256
//! hex digest.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::TokenKind;

/// Single-use token mailed to the user (verification or password reset).
#[derive(Debug, Clone, PartialEq)]
pub struct EmailToken {
    pub id: i32,
    pub user_id: i32,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl EmailToken {
    /// Unused and not expired at `now`.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }

    pub fn from_entity(entity: entity::user_token::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            kind: entity.kind,
            expires_at: entity.expires_at,
            used_at: entity.used_at,
        }
    }
}

/// Parameters for storing a new email token.
#[derive(Debug, Clone)]
pub struct CreateEmailTokenParam {
    pub user_id: i32,
    pub kind: TokenKind,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Persisted refresh token.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshToken {
    pub id: i32,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    /// Token issued when this one was rotated.
    pub replaced_by_id: Option<i32>,
}

impl RefreshToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn from_entity(entity: entity::refresh_token::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            expires_at: entity.expires_at,
            revoked_at: entity.revoked_at,
            replaced_by_id: entity.replaced_by_id,
        }
    }
}

//! User domain models and parameters.
//!
//! Provides the domain model for application accounts with role and tier tracking, and
//! parameter types used by registration and the manager endpoints.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{UserRole, UserTier};

use crate::model::{auth::RegisterDto, user::UserDto};

/// Account with credentials, permissions and paid tier.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    /// Lower-cased email address, unique across accounts.
    pub email: String,
    pub name: String,
    /// bcrypt hash of the password; never leaves the server.
    pub password_hash: String,
    pub role: UserRole,
    pub tier: UserTier,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether the user may see VIP signals. Admins always can.
    pub fn can_view_vip(&self) -> bool {
        self.is_admin() || self.tier == UserTier::Vip
    }

    /// Converts the user domain model to a DTO for API responses.
    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            tier: self.tier,
            email_verified: self.email_verified,
            created_at: self.created_at,
        }
    }

    /// Converts an entity model to a user domain model at the repository boundary.
    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            name: entity.name,
            password_hash: entity.password_hash,
            role: entity.role,
            tier: entity.tier,
            email_verified: entity.email_verified,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Raw registration input, validated by the auth service.
#[derive(Debug, Clone)]
pub struct RegisterParam {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl RegisterParam {
    pub fn from_dto(dto: RegisterDto) -> Self {
        Self {
            email: dto.email,
            name: dto.name,
            password: dto.password,
        }
    }
}

/// Parameters for creating an account during registration.
#[derive(Debug, Clone)]
pub struct CreateUserParam {
    /// Already normalised (trimmed, lower-cased) email.
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

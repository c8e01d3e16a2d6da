use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{UserRole, UserTier};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::subscription::SubscriptionDto;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    #[schema(value_type = String, example = "user")]
    pub role: UserRole,
    #[schema(value_type = String, example = "free")]
    pub tier: UserTier,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// The authenticated user's own profile.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct ProfileDto {
    pub user: UserDto,
    pub subscription: Option<SubscriptionDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct SetRoleDto {
    #[schema(value_type = String, example = "admin")]
    pub role: UserRole,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct GrantVipDto {
    pub days: i32,
}

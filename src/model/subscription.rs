use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::SubscriptionStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct SubscriptionDto {
    pub user_id: i32,
    pub plan_id: Option<i32>,
    #[schema(value_type = String, example = "active")]
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Whether the subscription currently grants VIP access
    pub active: bool,
}

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::SaleStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct SaleDto {
    pub id: i32,
    pub user_id: i32,
    pub plan_id: i32,
    pub reference: String,
    pub payment_id: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    #[schema(value_type = String, example = "paid")]
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CheckoutDto {
    pub plan_code: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct CheckoutResponseDto {
    pub sale_id: i32,
    pub reference: String,
    pub checkout_url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct StatusCountDto {
    #[schema(value_type = String, example = "paid")]
    pub status: SaleStatus,
    pub count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct RevenueDto {
    pub currency: String,
    pub amount_cents: i64,
}

/// Aggregated sale figures for the manager dashboard.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct SaleStatsDto {
    pub by_status: Vec<StatusCountDto>,
    pub revenue: Vec<RevenueDto>,
}

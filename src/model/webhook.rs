use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::WebhookStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct WebhookEventDto {
    pub id: i32,
    pub provider_event_id: String,
    pub event_type: String,
    pub action: Option<String>,
    pub resource_id: Option<String>,
    #[schema(value_type = String, example = "pending")]
    pub status: WebhookStatus,
    pub retry_count: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Outcome counters of one queue processing run.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, ToSchema)]
pub struct ProcessSummaryDto {
    pub processed: u32,
    pub ignored: u32,
    pub retried: u32,
    pub failed: u32,
}

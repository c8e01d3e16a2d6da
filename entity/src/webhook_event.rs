use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::WebhookStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "webhook_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub provider_event_id: String,
    pub event_type: String,
    pub action: Option<String>,
    pub resource_id: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    pub status: WebhookStatus,
    pub retry_count: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_error: Option<String>,
    pub created_at: DateTimeUtc,
    pub processed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

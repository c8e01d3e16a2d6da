//! Webhook event factory for seeding the notification queue.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::WebhookStatus;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating queued payment notifications.
pub struct WebhookEventFactory<'a> {
    db: &'a DatabaseConnection,
    provider_event_id: String,
    event_type: String,
    resource_id: Option<String>,
    status: WebhookStatus,
    retry_count: i32,
    created_at: DateTime<Utc>,
}

impl<'a> WebhookEventFactory<'a> {
    /// Creates a new WebhookEventFactory.
    ///
    /// Defaults:
    /// - provider_event_id: `"evt-{id}"`
    /// - event_type: `"payment"`
    /// - resource_id: `"pay-{id}"`
    /// - status: `WebhookStatus::Pending` with no retries
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            provider_event_id: format!("evt-{}", id),
            event_type: "payment".to_string(),
            resource_id: Some(format!("pay-{}", id)),
            status: WebhookStatus::Pending,
            retry_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn provider_event_id(mut self, provider_event_id: impl Into<String>) -> Self {
        self.provider_event_id = provider_event_id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn status(mut self, status: WebhookStatus) -> Self {
        self.status = status;
        self
    }

    pub fn retry_count(mut self, retry_count: i32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the webhook event into the database.
    pub async fn build(self) -> Result<entity::webhook_event::Model, DbErr> {
        let payload = serde_json::json!({
            "id": self.provider_event_id,
            "type": self.event_type,
            "data": { "id": self.resource_id },
        })
        .to_string();

        entity::webhook_event::ActiveModel {
            provider_event_id: ActiveValue::Set(self.provider_event_id),
            event_type: ActiveValue::Set(self.event_type),
            action: ActiveValue::Set(None),
            resource_id: ActiveValue::Set(self.resource_id),
            payload: ActiveValue::Set(payload),
            status: ActiveValue::Set(self.status),
            retry_count: ActiveValue::Set(self.retry_count),
            last_error: ActiveValue::Set(None),
            created_at: ActiveValue::Set(self.created_at),
            processed_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending `payment` notification for the given gateway payment id.
pub async fn create_webhook_event(
    db: &DatabaseConnection,
    payment_id: impl Into<String>,
) -> Result<entity::webhook_event::Model, DbErr> {
    WebhookEventFactory::new(db)
        .resource_id(payment_id)
        .build()
        .await
}

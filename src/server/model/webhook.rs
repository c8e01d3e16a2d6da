use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::WebhookStatus;
use serde::Deserialize;

use crate::{
    model::webhook::{ProcessSummaryDto, WebhookEventDto},
    server::util::parse::string_or_number,
};

/// A queued payment notification.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub id: i32,
    pub provider_event_id: String,
    pub event_type: String,
    pub action: Option<String>,
    /// Gateway id of the resource the notification is about (the payment id).
    pub resource_id: Option<String>,
    pub status: WebhookStatus,
    pub retry_count: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl WebhookEvent {
    pub fn into_dto(self) -> WebhookEventDto {
        WebhookEventDto {
            id: self.id,
            provider_event_id: self.provider_event_id,
            event_type: self.event_type,
            action: self.action,
            resource_id: self.resource_id,
            status: self.status,
            retry_count: self.retry_count,
            last_error: self.last_error,
            created_at: self.created_at,
            processed_at: self.processed_at,
        }
    }

    pub fn from_entity(entity: entity::webhook_event::Model) -> Self {
        Self {
            id: entity.id,
            provider_event_id: entity.provider_event_id,
            event_type: entity.event_type,
            action: entity.action,
            resource_id: entity.resource_id,
            status: entity.status,
            retry_count: entity.retry_count,
            last_error: entity.last_error,
            created_at: entity.created_at,
            processed_at: entity.processed_at,
        }
    }
}

/// Inbound notification body as posted by the gateway.
///
/// Ids arrive either as JSON numbers or strings depending on the gateway version,
/// so both are accepted.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PaymentNotification {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub data: Option<NotificationData>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NotificationData {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// Parameters for enqueueing a notification.
#[derive(Debug, Clone)]
pub struct NewWebhookEventParam {
    pub provider_event_id: String,
    pub event_type: String,
    pub action: Option<String>,
    pub resource_id: Option<String>,
    pub payload: String,
}

impl NewWebhookEventParam {
    pub fn from_notification(notification: PaymentNotification, payload: String) -> Self {
        Self {
            provider_event_id: notification.id,
            event_type: notification.event_type,
            action: notification.action,
            resource_id: notification.data.map(|data| data.id),
            payload,
        }
    }
}

/// Counters of one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub processed: u32,
    pub ignored: u32,
    pub retried: u32,
    pub failed: u32,
}

impl ProcessSummary {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn into_dto(self) -> ProcessSummaryDto {
        ProcessSummaryDto {
            processed: self.processed,
            ignored: self.ignored,
            retried: self.retried,
            failed: self.failed,
        }
    }
}

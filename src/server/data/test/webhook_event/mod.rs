use crate::server::{
    data::webhook_event::WebhookEventRepository,
    model::{pagination::PageParam, webhook::NewWebhookEventParam},
};
use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::WebhookStatus;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod get_pending_batch;
mod insert_if_new;
mod record_failure;

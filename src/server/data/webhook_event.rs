//! Repository for the webhook event queue.
//!
//! The `webhook_event` table doubles as a work queue: the receiver inserts `pending` rows
//! and the processor drains them oldest first, bumping `retry_count` on failures.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::WebhookStatus;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};

use crate::server::model::{
    pagination::{PageParam, Paginated},
    webhook::{NewWebhookEventParam, WebhookEvent},
};

pub struct WebhookEventRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> WebhookEventRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Enqueues a notification unless one with the same provider event id exists.
    ///
    /// # Returns
    /// - `Ok(Some(WebhookEvent))` - A new pending event was stored
    /// - `Ok(None)` - The notification is a duplicate and was not stored again
    /// - `Err(DbErr)` - Database error during lookup or insert
    pub async fn insert_if_new(
        &self,
        param: NewWebhookEventParam,
    ) -> Result<Option<WebhookEvent>, DbErr> {
        let existing = entity::prelude::WebhookEvent::find()
            .filter(entity::webhook_event::Column::ProviderEventId.eq(&param.provider_event_id))
            .one(self.db)
            .await?;
        if existing.is_some() {
            return Ok(None);
        }

        let inserted = entity::webhook_event::ActiveModel {
            provider_event_id: ActiveValue::Set(param.provider_event_id),
            event_type: ActiveValue::Set(param.event_type),
            action: ActiveValue::Set(param.action),
            resource_id: ActiveValue::Set(param.resource_id),
            payload: ActiveValue::Set(param.payload),
            status: ActiveValue::Set(WebhookStatus::Pending),
            retry_count: ActiveValue::Set(0),
            last_error: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            processed_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await;

        match inserted {
            Ok(entity) => Ok(Some(WebhookEvent::from_entity(entity))),
            // Lost the race against a concurrent delivery of the same notification
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn find_by_id(&self, event_id: i32) -> Result<Option<WebhookEvent>, DbErr> {
        let entity = entity::prelude::WebhookEvent::find_by_id(event_id)
            .one(self.db)
            .await?;

        Ok(entity.map(WebhookEvent::from_entity))
    }

    /// Gets the next batch of pending events that still have retries left, oldest first.
    ///
    /// # Arguments
    /// - `max_retries` - Events with `retry_count` at or above this are skipped
    /// - `limit` - Maximum number of events to return
    pub async fn get_pending_batch(
        &self,
        max_retries: i32,
        limit: u64,
    ) -> Result<Vec<WebhookEvent>, DbErr> {
        let entities = entity::prelude::WebhookEvent::find()
            .filter(entity::webhook_event::Column::Status.eq(WebhookStatus::Pending))
            .filter(entity::webhook_event::Column::RetryCount.lt(max_retries))
            .order_by_asc(entity::webhook_event::Column::CreatedAt)
            .order_by_asc(entity::webhook_event::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(WebhookEvent::from_entity).collect())
    }

    /// Closes a pending event with a terminal status (`processed` or `ignored`).
    ///
    /// # Returns
    /// - `Ok(true)` - The event was pending and is now closed
    /// - `Ok(false)` - The event is unknown or was already settled by another run
    pub async fn complete(
        &self,
        event_id: i32,
        status: WebhookStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::WebhookEvent::update_many()
            .filter(entity::webhook_event::Column::Id.eq(event_id))
            .filter(entity::webhook_event::Column::Status.eq(WebhookStatus::Pending))
            .col_expr(entity::webhook_event::Column::Status, Expr::value(status))
            .col_expr(entity::webhook_event::Column::ProcessedAt, Expr::value(now))
            .col_expr(
                entity::webhook_event::Column::LastError,
                Expr::value(Option::<String>::None),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Records a failed processing attempt of a pending event.
    ///
    /// The row is only touched while it is still pending and below `retry_count`, so an
    /// attempt is counted once and never reopens an event another run already closed.
    ///
    /// # Arguments
    /// - `retry_count` - New retry count of the event
    /// - `status` - `pending` to retry on the next run, `failed` once retries are exhausted
    /// - `error` - Description of the failure
    ///
    /// # Returns
    /// - `Ok(true)` - The failure was recorded
    /// - `Ok(false)` - The event was settled or counted by another run
    pub async fn record_failure(
        &self,
        event_id: i32,
        retry_count: i32,
        status: WebhookStatus,
        error: String,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::WebhookEvent::update_many()
            .filter(entity::webhook_event::Column::Id.eq(event_id))
            .filter(entity::webhook_event::Column::Status.eq(WebhookStatus::Pending))
            .filter(entity::webhook_event::Column::RetryCount.lt(retry_count))
            .col_expr(
                entity::webhook_event::Column::RetryCount,
                Expr::value(retry_count),
            )
            .col_expr(entity::webhook_event::Column::Status, Expr::value(status))
            .col_expr(entity::webhook_event::Column::LastError, Expr::value(error))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Puts a failed event back in the queue with a fresh retry budget.
    ///
    /// # Returns
    /// - `Ok(true)` - The event was failed and is pending again
    /// - `Ok(false)` - The event does not exist or is not failed
    pub async fn requeue_failed(&self, event_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::WebhookEvent::update_many()
            .filter(entity::webhook_event::Column::Id.eq(event_id))
            .filter(entity::webhook_event::Column::Status.eq(WebhookStatus::Failed))
            .col_expr(
                entity::webhook_event::Column::Status,
                Expr::value(WebhookStatus::Pending),
            )
            .col_expr(entity::webhook_event::Column::RetryCount, Expr::value(0))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets events newest first, optionally restricted to one status.
    pub async fn get_paginated(
        &self,
        status: Option<WebhookStatus>,
        page: PageParam,
    ) -> Result<Paginated<WebhookEvent>, DbErr> {
        let mut query = entity::prelude::WebhookEvent::find();
        if let Some(status) = status {
            query = query.filter(entity::webhook_event::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(entity::webhook_event::Column::CreatedAt)
            .order_by_desc(entity::webhook_event::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page.page).await?;
        let events = entities.into_iter().map(WebhookEvent::from_entity).collect();

        Ok(Paginated::new(events, total, page))
    }
}

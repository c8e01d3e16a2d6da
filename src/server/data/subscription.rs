//! Subscription data repository.
//!
//! A user owns at most one subscription row (unique `user_id`); renewals and manual grants
//! rewrite that row in place.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::SubscriptionStatus;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::model::subscription::{Subscription, UpsertSubscriptionParam};

pub struct SubscriptionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SubscriptionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_user(&self, user_id: i32) -> Result<Option<Subscription>, DbErr> {
        let entity = entity::prelude::Subscription::find()
            .filter(entity::subscription::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        Ok(entity.map(Subscription::from_entity))
    }

    /// Inserts the user's subscription or overwrites the existing row.
    ///
    /// # Arguments
    /// - `param` - Complete new state of the subscription window
    ///
    /// # Returns
    /// - `Ok(Subscription)` - The stored subscription
    /// - `Err(DbErr)` - Database error during insert or update
    pub async fn upsert(&self, param: UpsertSubscriptionParam) -> Result<Subscription, DbErr> {
        let entity = entity::prelude::Subscription::insert(entity::subscription::ActiveModel {
            user_id: ActiveValue::Set(param.user_id),
            plan_id: ActiveValue::Set(param.plan_id),
            status: ActiveValue::Set(param.status),
            started_at: ActiveValue::Set(param.started_at),
            expires_at: ActiveValue::Set(param.expires_at),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(entity::subscription::Column::UserId)
                .update_columns([
                    entity::subscription::Column::PlanId,
                    entity::subscription::Column::Status,
                    entity::subscription::Column::StartedAt,
                    entity::subscription::Column::ExpiresAt,
                    entity::subscription::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        Ok(Subscription::from_entity(entity))
    }

    /// Sets the status of the user's subscription if it is currently `from`.
    ///
    /// # Returns
    /// - `Ok(true)` - The subscription transitioned
    /// - `Ok(false)` - No subscription or it was in another state
    pub async fn transition(
        &self,
        user_id: i32,
        from: SubscriptionStatus,
        to: SubscriptionStatus,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::Subscription::update_many()
            .filter(entity::subscription::Column::UserId.eq(user_id))
            .filter(entity::subscription::Column::Status.eq(from))
            .col_expr(entity::subscription::Column::Status, Expr::value(to))
            .col_expr(
                entity::subscription::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets active subscriptions whose window ended at or before `now`, oldest first.
    pub async fn get_active_due(&self, now: DateTime<Utc>) -> Result<Vec<Subscription>, DbErr> {
        let entities = entity::prelude::Subscription::find()
            .filter(entity::subscription::Column::Status.eq(SubscriptionStatus::Active))
            .filter(entity::subscription::Column::ExpiresAt.lte(now))
            .order_by_asc(entity::subscription::Column::ExpiresAt)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Subscription::from_entity).collect())
    }

    /// Expires one subscription if it is still active and due at `now`.
    ///
    /// Re-checks the window so a renewal committed after `get_active_due` ran is not
    /// expired by mistake.
    pub async fn expire_if_due(
        &self,
        subscription_id: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::Subscription::update_many()
            .filter(entity::subscription::Column::Id.eq(subscription_id))
            .filter(entity::subscription::Column::Status.eq(SubscriptionStatus::Active))
            .filter(entity::subscription::Column::ExpiresAt.lte(now))
            .col_expr(
                entity::subscription::Column::Status,
                Expr::value(SubscriptionStatus::Expired),
            )
            .col_expr(entity::subscription::Column::UpdatedAt, Expr::value(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

//! Subscription factory for creating test subscription windows.

use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::SubscriptionStatus;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating a user's subscription row.
pub struct SubscriptionFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i32,
    plan_id: Option<i32>,
    status: SubscriptionStatus,
    started_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl<'a> SubscriptionFactory<'a> {
    /// Creates a new SubscriptionFactory.
    ///
    /// Defaults:
    /// - status: `SubscriptionStatus::Active`
    /// - window: started now, expires in 30 days
    /// - plan_id: `None` (manual grant)
    pub fn new(db: &'a DatabaseConnection, user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            db,
            user_id,
            plan_id: None,
            status: SubscriptionStatus::Active,
            started_at: now,
            expires_at: now + Duration::days(30),
        }
    }

    pub fn plan_id(mut self, plan_id: i32) -> Self {
        self.plan_id = Some(plan_id);
        self
    }

    pub fn status(mut self, status: SubscriptionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Builds and inserts the subscription entity into the database.
    pub async fn build(self) -> Result<entity::subscription::Model, DbErr> {
        entity::subscription::ActiveModel {
            user_id: ActiveValue::Set(self.user_id),
            plan_id: ActiveValue::Set(self.plan_id),
            status: ActiveValue::Set(self.status),
            started_at: ActiveValue::Set(self.started_at),
            expires_at: ActiveValue::Set(self.expires_at),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active 30-day subscription for the given user.
pub async fn create_subscription(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<entity::subscription::Model, DbErr> {
    SubscriptionFactory::new(db, user_id).build().await
}

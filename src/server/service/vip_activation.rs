//! VIP state transitions shared by payments, manual grants and refunds.
//!
//! Every method runs against the connection it was built with, which is normally a
//! transaction owned by the caller, so the subscription row and the user's tier always
//! change together.

use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::{SubscriptionStatus, UserTier};
use sea_orm::ConnectionTrait;

use crate::server::{
    data::{subscription::SubscriptionRepository, user::UserRepository},
    error::AppError,
    model::{
        plan::Plan,
        subscription::{extend_window, Subscription, UpsertSubscriptionParam, MAX_VIP_DAYS},
    },
};

pub struct VipActivationService<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> VipActivationService<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Grants the VIP window bought with `plan`.
    ///
    /// # Arguments
    /// - `user_id` - Buyer
    /// - `plan` - Purchased plan; its duration extends the window
    /// - `now` - Activation time
    ///
    /// # Returns
    /// - `Ok(Subscription)` - The active subscription after extension
    /// - `Err(AppError)` - Database error
    pub async fn activate(
        &self,
        user_id: i32,
        plan: &Plan,
        now: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        self.extend(user_id, Some(plan.id), plan.duration(), now)
            .await
    }

    /// Manual grant of `days` VIP days by a manager, without a sale.
    ///
    /// Keeps the plan of a running subscription so the profile still shows it.
    pub async fn grant(
        &self,
        user_id: i32,
        days: i32,
        now: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        if days <= 0 || days > MAX_VIP_DAYS {
            return Err(AppError::BadRequest(format!(
                "Granted days must be between 1 and {}",
                MAX_VIP_DAYS
            )));
        }

        let plan_id = SubscriptionRepository::new(self.db)
            .find_by_user(user_id)
            .await?
            .filter(|subscription| subscription.is_active(now))
            .and_then(|subscription| subscription.plan_id);

        self.extend(user_id, plan_id, Duration::days(days as i64), now)
            .await
    }

    /// Cancels the user's active subscription and drops the tier to free.
    ///
    /// # Returns
    /// - `Ok(true)` - An active subscription was cancelled
    /// - `Ok(false)` - Nothing was active; the tier is still forced to free
    pub async fn deactivate(&self, user_id: i32) -> Result<bool, AppError> {
        let cancelled = SubscriptionRepository::new(self.db)
            .transition(
                user_id,
                SubscriptionStatus::Active,
                SubscriptionStatus::Cancelled,
            )
            .await?;

        UserRepository::new(self.db)
            .set_tier(user_id, UserTier::Free)
            .await?;

        Ok(cancelled)
    }

    async fn extend(
        &self,
        user_id: i32,
        plan_id: Option<i32>,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Subscription, AppError> {
        let subscription_repo = SubscriptionRepository::new(self.db);

        let current = subscription_repo.find_by_user(user_id).await?;
        let (started_at, expires_at) = extend_window(current.as_ref(), duration, now)
            .ok_or_else(|| {
                AppError::BadRequest("VIP access can not be extended that far".to_string())
            })?;

        let subscription = subscription_repo
            .upsert(UpsertSubscriptionParam {
                user_id,
                plan_id,
                status: SubscriptionStatus::Active,
                started_at,
                expires_at,
            })
            .await?;

        UserRepository::new(self.db)
            .set_tier(user_id, UserTier::Vip)
            .await?;

        tracing::info!(
            user_id,
            expires_at = %subscription.expires_at,
            "VIP access extended"
        );

        Ok(subscription)
    }
}

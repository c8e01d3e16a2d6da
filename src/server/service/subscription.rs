//! Subscription reads and lifecycle sweeps.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::UserTier;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{subscription::SubscriptionRepository, user::UserRepository},
    error::AppError,
    model::subscription::Subscription,
    service::vip_activation::VipActivationService,
};

pub struct SubscriptionService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SubscriptionService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the user's subscription row, whatever its status.
    pub async fn current(&self, user_id: i32) -> Result<Option<Subscription>, AppError> {
        Ok(SubscriptionRepository::new(self.db)
            .find_by_user(user_id)
            .await?)
    }

    /// Expires every active subscription whose window ended at or before `now`.
    ///
    /// Each subscription is expired in its own transaction together with the owner's
    /// downgrade to free, so one failing row does not block the rest.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of subscriptions expired by this run
    /// - `Err(AppError)` - Listing the due subscriptions failed
    pub async fn expire_due(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let due = SubscriptionRepository::new(self.db)
            .get_active_due(now)
            .await?;

        let mut expired = 0;
        for subscription in due {
            match self.expire_one(&subscription, now).await {
                Ok(true) => expired += 1,
                Ok(false) => {}
                Err(e) => tracing::error!(
                    subscription_id = subscription.id,
                    user_id = subscription.user_id,
                    "Failed to expire subscription: {}",
                    e
                ),
            }
        }

        if expired > 0 {
            tracing::info!(expired, "Expired subscriptions");
        }

        Ok(expired)
    }

    async fn expire_one(
        &self,
        subscription: &Subscription,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let txn = self.db.begin().await?;

        let expired = SubscriptionRepository::new(&txn)
            .expire_if_due(subscription.id, now)
            .await?;
        if expired {
            UserRepository::new(&txn)
                .set_tier(subscription.user_id, UserTier::Free)
                .await?;
        }

        txn.commit().await?;
        Ok(expired)
    }

    /// Cancels a user's active subscription on behalf of a manager.
    ///
    /// # Returns
    /// - `Ok(Subscription)` - The cancelled subscription
    /// - `Err(AppError::NotFound)` - The user has no active subscription
    pub async fn cancel(&self, user_id: i32) -> Result<Subscription, AppError> {
        let txn = self.db.begin().await?;

        if !VipActivationService::new(&txn).deactivate(user_id).await? {
            txn.rollback().await?;
            return Err(AppError::NotFound(
                "User has no active subscription".to_string(),
            ));
        }

        let subscription = SubscriptionRepository::new(&txn)
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

        txn.commit().await?;

        tracing::info!(user_id, "Subscription cancelled by manager");
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use entity::sea_orm_active_enums::SubscriptionStatus;
    use test_utils::{
        builder::TestBuilder,
        factory::{
            subscription::SubscriptionFactory,
            user::{create_user, UserFactory},
        },
    };

    /// Tests the expiry sweep.
    ///
    /// Expected: only the due subscription expires and its user is downgraded
    #[tokio::test]
    async fn expire_due_downgrades_users() -> Result<(), AppError> {
        let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let now = Utc::now();

        let lapsed = UserFactory::new(db).tier(UserTier::Vip).build().await?;
        let running = UserFactory::new(db).tier(UserTier::Vip).build().await?;
        SubscriptionFactory::new(db, lapsed.id)
            .expires_at(now - Duration::minutes(1))
            .build()
            .await?;
        SubscriptionFactory::new(db, running.id)
            .expires_at(now + Duration::days(1))
            .build()
            .await?;

        let service = SubscriptionService::new(db);
        assert_eq!(service.expire_due(now).await?, 1);
        assert_eq!(service.expire_due(now).await?, 0);

        let lapsed_sub = service.current(lapsed.id).await?.unwrap();
        assert_eq!(lapsed_sub.status, SubscriptionStatus::Expired);

        let users = UserRepository::new(db);
        assert_eq!(
            users.find_by_id(lapsed.id).await?.unwrap().tier,
            UserTier::Free
        );
        assert_eq!(
            users.find_by_id(running.id).await?.unwrap().tier,
            UserTier::Vip
        );

        Ok(())
    }

    /// Tests manager cancellation.
    ///
    /// Expected: cancelled subscription returned, then NotFound on a second attempt
    #[tokio::test]
    async fn cancel_requires_active_subscription() -> Result<(), AppError> {
        let test = TestBuilder::new().with_billing_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let user = create_user(db).await?;
        SubscriptionFactory::new(db, user.id).build().await?;

        let service = SubscriptionService::new(db);
        let cancelled = service.cancel(user.id).await?;
        assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);

        assert!(matches!(
            service.cancel(user.id).await,
            Err(AppError::NotFound(_))
        ));

        Ok(())
    }
}

//! Cron jobs for webhook reconciliation and subscription housekeeping.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    config::Config,
    data::{refresh_token::RefreshTokenRepository, user_token::UserTokenRepository},
    error::AppError,
    service::{
        payment::PaymentGateway, subscription::SubscriptionService, webhook::WebhookService,
    },
};

/// Starts the background scheduler.
///
/// Two jobs are registered:
/// - Webhook processing on `WEBHOOK_POLL_CRON` (every 30 seconds by default)
/// - Subscription expiry and token cleanup on `SUBSCRIPTION_SWEEP_CRON` (every 5 minutes
///   by default)
///
/// Job failures are logged and the next tick runs as usual.
///
/// # Arguments
/// - `db`: Database connection
/// - `gateway`: Payment provider used to confirm notifications
/// - `config`: Cron expressions for both jobs
pub async fn start_scheduler(
    db: DatabaseConnection,
    gateway: Arc<dyn PaymentGateway>,
    config: &Config,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let webhook_db = db.clone();
    let webhook_job = Job::new_async(config.webhook_poll_cron.as_str(), move |_uuid, _lock| {
        let db = webhook_db.clone();
        let gateway = gateway.clone();

        Box::pin(async move {
            if let Err(e) = WebhookService::new(&db, gateway.as_ref())
                .process_webhook_events()
                .await
            {
                tracing::error!("Error processing webhook events: {}", e);
            }
        })
    })?;

    let sweep_db = db;
    let sweep_job = Job::new_async(config.subscription_sweep_cron.as_str(), move |_uuid, _lock| {
        let db = sweep_db.clone();

        Box::pin(async move {
            if let Err(e) = sweep(&db, Utc::now()).await {
                tracing::error!("Error during subscription sweep: {}", e);
            }
        })
    })?;

    scheduler.add(webhook_job).await?;
    scheduler.add(sweep_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduler started");

    Ok(scheduler)
}

/// Expires lapsed subscriptions and deletes expired tokens.
///
/// # Returns
/// - `Ok(u64)` - Number of subscriptions expired
async fn sweep(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<u64, AppError> {
    let expired = SubscriptionService::new(db).expire_due(now).await?;

    // Token cleanup errors are only logged.
    match RefreshTokenRepository::new(db).delete_expired(now).await {
        Ok(deleted) if deleted > 0 => tracing::debug!(deleted, "Deleted expired refresh tokens"),
        Ok(_) => {}
        Err(e) => tracing::error!("Error deleting expired refresh tokens: {}", e),
    }
    match UserTokenRepository::new(db).delete_expired(now).await {
        Ok(deleted) if deleted > 0 => tracing::debug!(deleted, "Deleted expired email tokens"),
        Ok(_) => {}
        Err(e) => tracing::error!("Error deleting expired email tokens: {}", e),
    }

    Ok(expired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use entity::{
        prelude::{RefreshToken, UserToken},
        sea_orm_active_enums::UserTier,
    };
    use test_utils::{
        builder::TestBuilder,
        factory::{subscription::SubscriptionFactory, user::UserFactory},
    };

    /// Expected: the lapsed subscription is expired and the running one is kept
    #[tokio::test]
    async fn sweep_expires_lapsed_subscriptions() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_billing_tables()
            .with_table(UserToken)
            .with_table(RefreshToken)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let now = Utc::now();

        let lapsed = UserFactory::new(db).tier(UserTier::Vip).build().await?;
        let running = UserFactory::new(db).tier(UserTier::Vip).build().await?;
        SubscriptionFactory::new(db, lapsed.id)
            .expires_at(now - Duration::hours(2))
            .build()
            .await?;
        SubscriptionFactory::new(db, running.id)
            .expires_at(now + Duration::days(3))
            .build()
            .await?;

        assert_eq!(sweep(db, now).await?, 1);
        assert_eq!(sweep(db, now).await?, 0);

        Ok(())
    }

    /// Expected: invalid cron expressions are rejected before anything runs
    #[tokio::test]
    async fn rejects_invalid_cron_expression() {
        let test = TestBuilder::new().build().await.unwrap();
        let db = test.db.as_ref().unwrap().clone();
        let mut config = Config::for_tests();
        config.webhook_poll_cron = "not a cron".to_string();

        let gateway: Arc<dyn PaymentGateway> =
            Arc::new(crate::server::service::payment::fake::FakePaymentGateway::default());

        assert!(start_scheduler(db, gateway, &config).await.is_err());
    }
}

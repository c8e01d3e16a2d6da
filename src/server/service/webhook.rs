//! Payment notification intake and queue reconciliation.
//!
//! Notifications are stored first and processed later by the scheduler. Processing asks
//! the gateway for the authoritative payment state instead of trusting the notification
//! body, then settles the matching sale in one transaction with the event itself.

use chrono::Utc;
use entity::sea_orm_active_enums::WebhookStatus;
use hmac::{Hmac, Mac};
use sea_orm::{DatabaseConnection, TransactionTrait};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::server::{
    data::{sale::SaleRepository, webhook_event::WebhookEventRepository},
    error::{auth::AuthError, AppError},
    model::{
        pagination::{PageParam, Paginated},
        sale::Sale,
        webhook::{NewWebhookEventParam, PaymentNotification, ProcessSummary, WebhookEvent},
    },
    service::{
        payment::{GatewayPayment, PaymentGateway, PaymentOutcome},
        sale::SaleService,
    },
};

type HmacSha256 = Hmac<Sha256>;

/// Attempts per event before it is parked as `failed`.
pub const MAX_WEBHOOK_RETRIES: i32 = 5;
/// Events handled per processing run.
const BATCH_SIZE: u64 = 50;

/// Result of accepting a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiveOutcome {
    Queued(WebhookEvent),
    /// Same provider event id seen before; nothing stored
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventOutcome {
    Processed,
    Ignored,
    /// Another run settled the event first
    Skipped,
}

pub struct WebhookService<'a> {
    db: &'a DatabaseConnection,
    gateway: &'a dyn PaymentGateway,
}

impl<'a> WebhookService<'a> {
    pub fn new(db: &'a DatabaseConnection, gateway: &'a dyn PaymentGateway) -> Self {
        Self { db, gateway }
    }

    /// Authenticates and enqueues an inbound notification.
    ///
    /// # Arguments
    /// - `secret` - Shared signing secret; the signature is not checked when `None`
    /// - `signature` - Hex HMAC-SHA256 of the raw body from the `x-signature` header
    /// - `body` - Raw request body
    ///
    /// # Returns
    /// - `Ok(ReceiveOutcome)` - Stored, or acknowledged as a duplicate
    /// - `Err(AuthError::InvalidSignature)` - Missing or wrong signature
    /// - `Err(AppError::BadRequest)` - Body is not a notification
    pub async fn receive(
        &self,
        secret: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<ReceiveOutcome, AppError> {
        if let Some(secret) = secret {
            let valid = signature
                .map(|signature| verify_signature(secret, body, signature))
                .unwrap_or(false);
            if !valid {
                return Err(AuthError::InvalidSignature.into());
            }
        }

        let notification: PaymentNotification = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Malformed notification: {}", e)))?;
        let payload = String::from_utf8_lossy(body).into_owned();

        let stored = WebhookEventRepository::new(self.db)
            .insert_if_new(NewWebhookEventParam::from_notification(notification, payload))
            .await?;

        match stored {
            Some(event) => {
                tracing::debug!(
                    event_id = event.id,
                    provider_event_id = %event.provider_event_id,
                    "Webhook event queued"
                );
                Ok(ReceiveOutcome::Queued(event))
            }
            None => Ok(ReceiveOutcome::Duplicate),
        }
    }

    /// Processes one batch of pending events, oldest first.
    ///
    /// A failing event gets its retry count incremented and its error recorded; once it
    /// reaches `MAX_WEBHOOK_RETRIES` it is marked `failed` and left for a manager.
    ///
    /// # Returns
    /// - `Ok(ProcessSummary)` - Per-outcome counters of this run
    /// - `Err(AppError)` - The batch could not be loaded
    pub async fn process_webhook_events(&self) -> Result<ProcessSummary, AppError> {
        let repo = WebhookEventRepository::new(self.db);
        let events = repo
            .get_pending_batch(MAX_WEBHOOK_RETRIES, BATCH_SIZE)
            .await?;

        let mut summary = ProcessSummary::default();

        for event in events {
            match self.process_event(&event).await {
                Ok(EventOutcome::Processed) => summary.processed += 1,
                Ok(EventOutcome::Ignored) => summary.ignored += 1,
                Ok(EventOutcome::Skipped) => {
                    tracing::debug!(event_id = event.id, "Webhook event settled by another run");
                }
                Err(err) => {
                    let retry_count = event.retry_count + 1;
                    let exhausted = retry_count >= MAX_WEBHOOK_RETRIES;
                    let status = if exhausted {
                        WebhookStatus::Failed
                    } else {
                        WebhookStatus::Pending
                    };

                    match repo
                        .record_failure(event.id, retry_count, status, err.to_string())
                        .await
                    {
                        Ok(false) => {
                            tracing::debug!(
                                event_id = event.id,
                                "Webhook event settled by another run: {}",
                                err
                            );
                        }
                        Ok(true) if exhausted => {
                            summary.failed += 1;
                            tracing::error!(
                                event_id = event.id,
                                retry_count,
                                "Webhook event failed permanently: {}",
                                err
                            );
                        }
                        Ok(true) => {
                            summary.retried += 1;
                            tracing::warn!(
                                event_id = event.id,
                                retry_count,
                                "Webhook event processing failed, will retry: {}",
                                err
                            );
                        }
                        Err(e) => {
                            tracing::error!(
                                event_id = event.id,
                                "Failed to record webhook failure: {}",
                                e
                            );
                        }
                    }
                }
            }
        }

        if !summary.is_empty() {
            tracing::info!(
                processed = summary.processed,
                ignored = summary.ignored,
                retried = summary.retried,
                failed = summary.failed,
                "Webhook queue processed"
            );
        }

        Ok(summary)
    }

    async fn process_event(&self, event: &WebhookEvent) -> Result<EventOutcome, AppError> {
        let now = Utc::now();

        let payment_id = match (event.event_type.as_str(), event.resource_id.as_deref()) {
            ("payment", Some(payment_id)) => payment_id,
            _ => {
                tracing::debug!(
                    event_id = event.id,
                    event_type = %event.event_type,
                    "Ignoring webhook event"
                );
                let closed = WebhookEventRepository::new(self.db)
                    .complete(event.id, WebhookStatus::Ignored, now)
                    .await?;
                return Ok(if closed {
                    EventOutcome::Ignored
                } else {
                    EventOutcome::Skipped
                });
            }
        };

        let payment = self.gateway.get_payment(payment_id).await?;

        let reference = payment.external_reference.as_deref().ok_or_else(|| {
            AppError::NotFound(format!("Payment {} has no external reference", payment.id))
        })?;
        let sale = SaleRepository::new(self.db)
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No sale with reference {}", reference)))?;

        let outcome = payment.status.outcome();
        if outcome == PaymentOutcome::Paid {
            check_amount(&sale, &payment)?;
        }

        let txn = self.db.begin().await?;

        // Claim the event first; dropping the transaction rolls back on a lost race
        if !WebhookEventRepository::new(&txn)
            .complete(event.id, WebhookStatus::Processed, now)
            .await?
        {
            return Ok(EventOutcome::Skipped);
        }

        let changed = match outcome {
            PaymentOutcome::Paid => {
                let paid_at = payment.approved_at.unwrap_or(now);
                SaleService::mark_paid(&txn, &sale, &payment.id, paid_at).await?
            }
            PaymentOutcome::Failed => SaleService::mark_failed(&txn, &sale, &payment.id).await?,
            PaymentOutcome::Refunded => {
                SaleService::mark_refunded(&txn, &sale, &payment.id).await?
            }
            PaymentOutcome::Unsettled => false,
        };

        txn.commit().await?;

        tracing::debug!(
            event_id = event.id,
            sale_id = sale.id,
            status = ?payment.status,
            changed,
            "Webhook event processed"
        );

        Ok(EventOutcome::Processed)
    }

    pub async fn list(
        &self,
        status: Option<WebhookStatus>,
        page: PageParam,
    ) -> Result<Paginated<WebhookEvent>, AppError> {
        Ok(WebhookEventRepository::new(self.db)
            .get_paginated(status, page)
            .await?)
    }

    /// Puts a `failed` event back in the queue with a fresh retry budget.
    ///
    /// # Returns
    /// - `Ok(WebhookEvent)` - The event, pending again
    /// - `Err(AppError::NotFound)` - Unknown event
    /// - `Err(AppError::Conflict)` - The event is not failed
    pub async fn retry(&self, event_id: i32) -> Result<WebhookEvent, AppError> {
        let repo = WebhookEventRepository::new(self.db);

        if !repo.requeue_failed(event_id).await? {
            return match repo.find_by_id(event_id).await? {
                Some(_) => Err(AppError::Conflict(
                    "Only failed events can be retried".to_string(),
                )),
                None => Err(AppError::NotFound("Webhook event not found".to_string())),
            };
        }

        tracing::info!(event_id, "Webhook event requeued");

        repo.find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Webhook event not found".to_string()))
    }
}

/// Rejects an approved payment that does not cover the sale.
fn check_amount(sale: &Sale, payment: &GatewayPayment) -> Result<(), AppError> {
    if payment.amount_cents == sale.amount_cents && payment.currency == sale.currency {
        return Ok(());
    }

    tracing::warn!(
        sale_id = sale.id,
        payment_id = %payment.id,
        expected_cents = sale.amount_cents,
        expected_currency = %sale.currency,
        paid_cents = payment.amount_cents,
        paid_currency = %payment.currency,
        "Payment amount does not match sale"
    );

    Err(AppError::Conflict(format!(
        "Payment {} of {} {} does not match sale {} of {} {}",
        payment.id,
        payment.amount_cents,
        payment.currency,
        sale.id,
        sale.amount_cents,
        sale.currency
    )))
}

/// Checks a hex HMAC-SHA256 signature of `body` in constant time.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    let provided = signature.trim().to_ascii_lowercase();
    if expected.len() != provided.len() {
        return false;
    }

    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::sea_orm_active_enums::{SaleStatus, SubscriptionStatus, UserTier};
    use test_utils::{
        builder::TestBuilder,
        factory::{
            helpers::create_sale_with_dependencies, plan::PlanFactory, sale::create_sale,
            user::create_user, webhook_event::WebhookEventFactory,
        },
    };

    use crate::server::{
        data::{subscription::SubscriptionRepository, user::UserRepository},
        service::payment::fake::FakePaymentGateway,
    };

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    const BODY: &[u8] =
        br#"{"id": 777, "type": "payment", "action": "payment.updated", "data": {"id": "pay-1"}}"#;

    #[test]
    fn verifies_signatures() {
        let signature = sign("secret", BODY);

        assert!(verify_signature("secret", BODY, &signature));
        assert!(verify_signature("secret", BODY, &signature.to_uppercase()));
        assert!(!verify_signature("other", BODY, &signature));
        assert!(!verify_signature("secret", b"tampered", &signature));
        assert!(!verify_signature("secret", BODY, "abc"));
    }

    /// Tests intake with a signing secret configured.
    ///
    /// Expected: unsigned and mis-signed bodies rejected, signed body queued once
    #[tokio::test]
    async fn receive_checks_signature_and_deduplicates() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();
        let service = WebhookService::new(db, &gateway);

        assert!(matches!(
            service.receive(Some("secret"), None, BODY).await,
            Err(AppError::AuthErr(AuthError::InvalidSignature))
        ));
        assert!(matches!(
            service.receive(Some("secret"), Some("deadbeef"), BODY).await,
            Err(AppError::AuthErr(AuthError::InvalidSignature))
        ));

        let signature = sign("secret", BODY);
        let first = service.receive(Some("secret"), Some(&signature), BODY).await?;
        match first {
            ReceiveOutcome::Queued(event) => {
                assert_eq!(event.provider_event_id, "777");
                assert_eq!(event.resource_id.as_deref(), Some("pay-1"));
                assert_eq!(event.status, WebhookStatus::Pending);
            }
            ReceiveOutcome::Duplicate => panic!("first delivery reported as duplicate"),
        }

        let second = service.receive(Some("secret"), Some(&signature), BODY).await?;
        assert_eq!(second, ReceiveOutcome::Duplicate);

        Ok(())
    }

    /// Tests intake of a body that is not a notification.
    ///
    /// Expected: BadRequest
    #[tokio::test]
    async fn receive_rejects_malformed_body() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();

        let result = WebhookService::new(db, &gateway)
            .receive(None, None, b"{\"hello\": true}")
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        Ok(())
    }

    /// Tests processing an approved payment.
    ///
    /// Expected: sale paid, buyer VIP, event processed
    #[tokio::test]
    async fn approved_payment_activates_vip() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();

        let (user, _, sale) = create_sale_with_dependencies(db).await?;
        gateway.add_payment("pay-1", &sale.reference, "approved");
        let event = WebhookEventFactory::new(db).resource_id("pay-1").build().await?;

        let summary = WebhookService::new(db, &gateway)
            .process_webhook_events()
            .await?;
        assert_eq!(summary.processed, 1);

        let sale = SaleRepository::new(db).find_by_id(sale.id).await?.unwrap();
        assert_eq!(sale.status, SaleStatus::Paid);
        assert_eq!(sale.payment_id.as_deref(), Some("pay-1"));

        let user = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
        assert_eq!(user.tier, UserTier::Vip);

        let event = WebhookEventRepository::new(db)
            .find_by_id(event.id)
            .await?
            .unwrap();
        assert_eq!(event.status, WebhookStatus::Processed);
        assert!(event.processed_at.is_some());

        Ok(())
    }

    /// Tests an approved payment that is smaller than the sale.
    ///
    /// Expected: sale stays pending, buyer stays free, event retried with the mismatch
    /// recorded
    #[tokio::test]
    async fn underpaid_payment_is_not_accepted() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();

        let user = create_user(db).await?;
        let plan = PlanFactory::new(db).price_cents(99_900).build().await?;
        let sale = create_sale(db, user.id, &plan).await?;
        gateway.add_payment("pay-low", &sale.reference, "approved");
        let event = WebhookEventFactory::new(db).resource_id("pay-low").build().await?;

        let summary = WebhookService::new(db, &gateway)
            .process_webhook_events()
            .await?;
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.retried, 1);

        let sale = SaleRepository::new(db).find_by_id(sale.id).await?.unwrap();
        assert_eq!(sale.status, SaleStatus::Pending);

        let user = UserRepository::new(db).find_by_id(user.id).await?.unwrap();
        assert_eq!(user.tier, UserTier::Free);

        let event = WebhookEventRepository::new(db)
            .find_by_id(event.id)
            .await?
            .unwrap();
        assert_eq!(event.status, WebhookStatus::Pending);
        assert!(event.last_error.unwrap().contains("does not match"));

        Ok(())
    }

    /// Tests a refund and a chargeback arriving after the payments were approved.
    ///
    /// Expected: both sales refunded, both buyers back to free with their
    /// subscriptions cancelled
    #[tokio::test]
    async fn refund_and_chargeback_revoke_vip() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();
        let service = WebhookService::new(db, &gateway);

        let (refunded_user, _, refunded) = create_sale_with_dependencies(db).await?;
        let (charged_user, _, charged) = create_sale_with_dependencies(db).await?;
        gateway.add_payment("pay-a", &refunded.reference, "approved");
        gateway.add_payment("pay-b", &charged.reference, "approved");
        WebhookEventFactory::new(db).resource_id("pay-a").build().await?;
        WebhookEventFactory::new(db).resource_id("pay-b").build().await?;
        assert_eq!(service.process_webhook_events().await?.processed, 2);

        gateway.add_payment("pay-a", &refunded.reference, "refunded");
        gateway.add_payment("pay-b", &charged.reference, "charged_back");
        WebhookEventFactory::new(db).resource_id("pay-a").build().await?;
        WebhookEventFactory::new(db).resource_id("pay-b").build().await?;
        assert_eq!(service.process_webhook_events().await?.processed, 2);

        let sales = SaleRepository::new(db);
        let users = UserRepository::new(db);
        let subscriptions = SubscriptionRepository::new(db);
        let cases = [
            (refunded_user.id, refunded.id),
            (charged_user.id, charged.id),
        ];
        for (user_id, sale_id) in cases {
            let sale = sales.find_by_id(sale_id).await?.unwrap();
            assert_eq!(sale.status, SaleStatus::Refunded);

            let user = users.find_by_id(user_id).await?.unwrap();
            assert_eq!(user.tier, UserTier::Free);

            let subscription = subscriptions.find_by_user(user_id).await?.unwrap();
            assert_eq!(subscription.status, SubscriptionStatus::Cancelled);
        }

        Ok(())
    }

    /// Tests an event that another run closed after this run loaded it.
    ///
    /// Expected: the event is skipped and keeps its status
    #[tokio::test]
    async fn event_closed_by_another_run_is_skipped() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();

        let (_, _, sale) = create_sale_with_dependencies(db).await?;
        gateway.add_payment("pay-2", &sale.reference, "rejected");
        let event = WebhookEventFactory::new(db).resource_id("pay-2").build().await?;

        let repo = WebhookEventRepository::new(db);
        let loaded = repo.find_by_id(event.id).await?.unwrap();
        repo.complete(event.id, WebhookStatus::Ignored, Utc::now())
            .await?;

        let outcome = WebhookService::new(db, &gateway)
            .process_event(&loaded)
            .await?;
        assert_eq!(outcome, EventOutcome::Skipped);

        let sale = SaleRepository::new(db).find_by_id(sale.id).await?.unwrap();
        assert_eq!(sale.status, SaleStatus::Pending);
        assert_eq!(
            repo.find_by_id(event.id).await?.unwrap().status,
            WebhookStatus::Ignored
        );

        Ok(())
    }

    /// Tests processing a rejected payment and a still pending one.
    ///
    /// Expected: rejected sale failed, pending sale untouched, both events processed
    #[tokio::test]
    async fn rejected_and_pending_payments() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();

        let (_, _, rejected) = create_sale_with_dependencies(db).await?;
        let (_, _, waiting) = create_sale_with_dependencies(db).await?;
        gateway.add_payment("pay-r", &rejected.reference, "rejected");
        gateway.add_payment("pay-w", &waiting.reference, "in_process");
        WebhookEventFactory::new(db).resource_id("pay-r").build().await?;
        WebhookEventFactory::new(db).resource_id("pay-w").build().await?;

        let summary = WebhookService::new(db, &gateway)
            .process_webhook_events()
            .await?;
        assert_eq!(summary.processed, 2);

        let sales = SaleRepository::new(db);
        assert_eq!(
            sales.find_by_id(rejected.id).await?.unwrap().status,
            SaleStatus::Failed
        );
        assert_eq!(
            sales.find_by_id(waiting.id).await?.unwrap().status,
            SaleStatus::Pending
        );

        Ok(())
    }

    /// Tests that non-payment notifications are ignored without calling the gateway.
    ///
    /// Expected: event ignored
    #[tokio::test]
    async fn ignores_other_event_types() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();

        let event = WebhookEventFactory::new(db)
            .event_type("merchant_order")
            .build()
            .await?;

        let summary = WebhookService::new(db, &gateway)
            .process_webhook_events()
            .await?;
        assert_eq!(summary.ignored, 1);

        let event = WebhookEventRepository::new(db)
            .find_by_id(event.id)
            .await?
            .unwrap();
        assert_eq!(event.status, WebhookStatus::Ignored);

        Ok(())
    }

    /// Tests a failing event below and at the retry cap.
    ///
    /// Expected: first event retried with error recorded, second event failed
    #[tokio::test]
    async fn failures_are_retried_until_cap() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();

        let fresh = WebhookEventFactory::new(db)
            .resource_id("unknown-1")
            .build()
            .await?;
        let last_try = WebhookEventFactory::new(db)
            .resource_id("unknown-2")
            .retry_count(MAX_WEBHOOK_RETRIES - 1)
            .build()
            .await?;

        let summary = WebhookService::new(db, &gateway)
            .process_webhook_events()
            .await?;
        assert_eq!(summary.retried, 1);
        assert_eq!(summary.failed, 1);

        let repo = WebhookEventRepository::new(db);
        let fresh = repo.find_by_id(fresh.id).await?.unwrap();
        assert_eq!(fresh.status, WebhookStatus::Pending);
        assert_eq!(fresh.retry_count, 1);
        assert!(fresh.last_error.is_some());

        let last_try = repo.find_by_id(last_try.id).await?.unwrap();
        assert_eq!(last_try.status, WebhookStatus::Failed);
        assert_eq!(last_try.retry_count, MAX_WEBHOOK_RETRIES);

        Ok(())
    }

    /// Tests that a payment for an unknown sale is retried rather than dropped.
    ///
    /// Expected: event stays pending with retry count 1
    #[tokio::test]
    async fn unknown_sale_is_retryable() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();

        gateway.add_payment("pay-x", "no-such-reference", "approved");
        let event = WebhookEventFactory::new(db).resource_id("pay-x").build().await?;

        let summary = WebhookService::new(db, &gateway)
            .process_webhook_events()
            .await?;
        assert_eq!(summary.retried, 1);

        let event = WebhookEventRepository::new(db)
            .find_by_id(event.id)
            .await?
            .unwrap();
        assert_eq!(event.status, WebhookStatus::Pending);
        assert_eq!(event.retry_count, 1);

        Ok(())
    }

    /// Tests manual retry of events.
    ///
    /// Expected: failed event requeued with zero retries, pending event Conflict,
    /// unknown event NotFound
    #[tokio::test]
    async fn retry_requeues_failed_events() -> Result<(), AppError> {
        let test = TestBuilder::new().with_webhook_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let gateway = FakePaymentGateway::new();

        let failed = WebhookEventFactory::new(db)
            .status(WebhookStatus::Failed)
            .retry_count(MAX_WEBHOOK_RETRIES)
            .build()
            .await?;
        let pending = WebhookEventFactory::new(db).build().await?;

        let service = WebhookService::new(db, &gateway);
        let requeued = service.retry(failed.id).await?;
        assert_eq!(requeued.status, WebhookStatus::Pending);
        assert_eq!(requeued.retry_count, 0);

        assert!(matches!(
            service.retry(pending.id).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            service.retry(9999).await,
            Err(AppError::NotFound(_))
        ));

        Ok(())
    }
}

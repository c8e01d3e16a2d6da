use super::*;

fn notification(provider_event_id: &str) -> NewWebhookEventParam {
    NewWebhookEventParam {
        provider_event_id: provider_event_id.to_string(),
        event_type: "payment".to_string(),
        action: Some("payment.updated".to_string()),
        resource_id: Some("pay-1".to_string()),
        payload: "{}".to_string(),
    }
}

/// Tests enqueueing a new notification.
///
/// Expected: Ok(Some) with a pending event and zero retries
#[tokio::test]
async fn stores_new_notification_as_pending() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_webhook_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WebhookEventRepository::new(db);
    let event = repo.insert_if_new(notification("evt-1")).await?.unwrap();

    assert_eq!(event.status, WebhookStatus::Pending);
    assert_eq!(event.retry_count, 0);
    assert_eq!(event.resource_id.as_deref(), Some("pay-1"));

    Ok(())
}

/// Tests that a redelivered notification is not stored twice.
///
/// Expected: Ok(None) on the duplicate and a single row in the table
#[tokio::test]
async fn ignores_duplicate_provider_event_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_webhook_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WebhookEventRepository::new(db);
    repo.insert_if_new(notification("evt-1")).await?;
    let duplicate = repo.insert_if_new(notification("evt-1")).await?;

    assert!(duplicate.is_none());
    let page = repo
        .get_paginated(
            None,
            PageParam {
                page: 0,
                per_page: 10,
            },
        )
        .await?;
    assert_eq!(page.total, 1);

    Ok(())
}

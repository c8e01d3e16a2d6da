use super::*;

/// Tests recording failures and requeueing a failed event.
///
/// Expected: failure stored, requeue only succeeds for failed events and resets retries
#[tokio::test]
async fn records_failure_and_requeues() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_webhook_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let event = factory::create_webhook_event(db, "pay-7").await?;

    let repo = WebhookEventRepository::new(db);
    assert!(!repo.requeue_failed(event.id).await?);

    repo.record_failure(event.id, 5, WebhookStatus::Failed, "gateway down".to_string())
        .await?;
    let failed = repo.find_by_id(event.id).await?.unwrap();
    assert_eq!(failed.status, WebhookStatus::Failed);
    assert_eq!(failed.retry_count, 5);
    assert_eq!(failed.last_error.as_deref(), Some("gateway down"));

    assert!(repo.requeue_failed(event.id).await?);
    let requeued = repo.find_by_id(event.id).await?.unwrap();
    assert_eq!(requeued.status, WebhookStatus::Pending);
    assert_eq!(requeued.retry_count, 0);

    Ok(())
}

/// Tests closing an event.
///
/// Expected: status and processed_at set, last error cleared
#[tokio::test]
async fn completes_event() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_webhook_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let event = factory::create_webhook_event(db, "pay-8").await?;

    let repo = WebhookEventRepository::new(db);
    repo.record_failure(event.id, 1, WebhookStatus::Pending, "timeout".to_string())
        .await?;
    repo.complete(event.id, WebhookStatus::Ignored, Utc::now())
        .await?;

    let stored = repo.find_by_id(event.id).await?.unwrap();
    assert_eq!(stored.status, WebhookStatus::Ignored);
    assert!(stored.processed_at.is_some());
    assert!(stored.last_error.is_none());

    Ok(())
}

/// Tests two runs settling the same event.
///
/// Expected: an attempt is counted once, and a closed event is neither reopened by a
/// late failure nor closed a second time
#[tokio::test]
async fn settled_event_is_not_touched_again() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_webhook_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let event = factory::create_webhook_event(db, "pay-9").await?;

    let repo = WebhookEventRepository::new(db);
    assert!(
        repo.record_failure(event.id, 1, WebhookStatus::Pending, "timeout".to_string())
            .await?
    );
    assert!(
        !repo
            .record_failure(event.id, 1, WebhookStatus::Pending, "timeout".to_string())
            .await?
    );

    assert!(repo.complete(event.id, WebhookStatus::Processed, Utc::now()).await?);
    assert!(!repo.complete(event.id, WebhookStatus::Ignored, Utc::now()).await?);
    assert!(
        !repo
            .record_failure(event.id, 2, WebhookStatus::Pending, "late".to_string())
            .await?
    );

    let stored = repo.find_by_id(event.id).await?.unwrap();
    assert_eq!(stored.status, WebhookStatus::Processed);
    assert_eq!(stored.retry_count, 1);
    assert!(stored.last_error.is_none());

    Ok(())
}

use super::*;

/// Tests selecting the next batch from the queue.
///
/// Verifies that only pending events below the retry cap are returned, oldest first,
/// and that the limit is honoured.
///
/// Expected: the two oldest eligible events
#[tokio::test]
async fn returns_oldest_eligible_events() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_webhook_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let oldest = factory::webhook_event::WebhookEventFactory::new(db)
        .created_at(now - Duration::minutes(30))
        .build()
        .await?;
    let middle = factory::webhook_event::WebhookEventFactory::new(db)
        .created_at(now - Duration::minutes(20))
        .retry_count(4)
        .build()
        .await?;
    factory::webhook_event::WebhookEventFactory::new(db)
        .created_at(now - Duration::minutes(10))
        .build()
        .await?;
    factory::webhook_event::WebhookEventFactory::new(db)
        .created_at(now - Duration::hours(1))
        .retry_count(5)
        .build()
        .await?;
    factory::webhook_event::WebhookEventFactory::new(db)
        .created_at(now - Duration::hours(2))
        .status(WebhookStatus::Processed)
        .build()
        .await?;

    let repo = WebhookEventRepository::new(db);
    let batch = repo.get_pending_batch(5, 2).await?;

    let ids: Vec<_> = batch.iter().map(|event| event.id).collect();
    assert_eq!(ids, vec![oldest.id, middle.id]);

    Ok(())
}

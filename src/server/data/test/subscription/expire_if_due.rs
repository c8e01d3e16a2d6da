use super::*;

/// Tests finding and expiring due subscriptions.
///
/// Verifies that only active subscriptions past their window are returned and that
/// expiring them flips the status.
///
/// Expected: the lapsed subscription is expired, the running one untouched
#[tokio::test]
async fn expires_only_due_subscriptions() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_billing_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let lapsed_user = factory::create_user(db).await?;
    let running_user = factory::create_user(db).await?;
    let cancelled_user = factory::create_user(db).await?;

    factory::subscription::SubscriptionFactory::new(db, lapsed_user.id)
        .expires_at(now - Duration::hours(1))
        .build()
        .await?;
    factory::subscription::SubscriptionFactory::new(db, running_user.id)
        .expires_at(now + Duration::days(3))
        .build()
        .await?;
    factory::subscription::SubscriptionFactory::new(db, cancelled_user.id)
        .status(SubscriptionStatus::Cancelled)
        .expires_at(now - Duration::days(1))
        .build()
        .await?;

    let repo = SubscriptionRepository::new(db);
    let due = repo.get_active_due(now).await?;
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].user_id, lapsed_user.id);

    assert!(repo.expire_if_due(due[0].id, now).await?);
    assert!(!repo.expire_if_due(due[0].id, now).await?);

    let stored = repo.find_by_user(lapsed_user.id).await?.unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Expired);

    Ok(())
}

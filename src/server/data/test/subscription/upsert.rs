use super::*;

/// Tests that upserting twice keeps a single row per user.
///
/// Expected: second upsert overwrites the window of the same row
#[tokio::test]
async fn overwrites_existing_row() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_billing_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let plan = factory::create_plan(db).await?;
    let now = Utc::now();

    let repo = SubscriptionRepository::new(db);
    let first = repo
        .upsert(UpsertSubscriptionParam {
            user_id: user.id,
            plan_id: Some(plan.id),
            status: SubscriptionStatus::Active,
            started_at: now,
            expires_at: now + Duration::days(30),
        })
        .await?;

    let second = repo
        .upsert(UpsertSubscriptionParam {
            user_id: user.id,
            plan_id: None,
            status: SubscriptionStatus::Active,
            started_at: now,
            expires_at: now + Duration::days(60),
        })
        .await?;

    assert_eq!(first.id, second.id);
    assert_eq!(second.plan_id, None);
    assert_eq!(
        second.expires_at.timestamp(),
        (now + Duration::days(60)).timestamp()
    );
    assert_eq!(repo.find_by_user(user.id).await?, Some(second));

    Ok(())
}

/// Tests a conditional status transition.
///
/// Expected: active -> cancelled succeeds once, then reports no change
#[tokio::test]
async fn transitions_status_once() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_billing_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    factory::create_subscription(db, user.id).await?;

    let repo = SubscriptionRepository::new(db);
    assert!(
        repo.transition(
            user.id,
            SubscriptionStatus::Active,
            SubscriptionStatus::Cancelled
        )
        .await?
    );
    assert!(
        !repo
            .transition(
                user.id,
                SubscriptionStatus::Active,
                SubscriptionStatus::Cancelled
            )
            .await?
    );

    Ok(())
}

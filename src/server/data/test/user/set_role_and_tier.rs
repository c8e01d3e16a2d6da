use super::*;

/// Tests promoting a user to admin.
///
/// Expected: Ok with role persisted
#[tokio::test]
async fn sets_role() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    repo.set_role(user.id, UserRole::Admin).await?;

    let updated = repo.find_by_id(user.id).await?.unwrap();
    assert_eq!(updated.role, UserRole::Admin);
    assert!(updated.is_admin());

    Ok(())
}

/// Tests changing the tier and verification flag.
///
/// Expected: Ok with both columns persisted and other users untouched
#[tokio::test]
async fn sets_tier_and_verification_for_single_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .email_verified(false)
        .build()
        .await?;
    let other = factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    repo.set_tier(user.id, UserTier::Vip).await?;
    repo.set_email_verified(user.id).await?;

    let updated = repo.find_by_id(user.id).await?.unwrap();
    assert_eq!(updated.tier, UserTier::Vip);
    assert!(updated.email_verified);

    let untouched = repo.find_by_id(other.id).await?.unwrap();
    assert_eq!(untouched.tier, UserTier::Free);

    Ok(())
}

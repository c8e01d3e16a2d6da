use super::*;

/// Tests creating, updating and deleting a signal.
///
/// Expected: create stores a pending signal, update rewrites fields, delete removes it
#[tokio::test]
async fn creates_updates_and_deletes_signal() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_signal_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let admin = factory::user::create_admin(db).await?;

    let repo = SignalRepository::new(db);
    let created = repo.create(admin.id, param("Superclásico", UserTier::Vip)).await?;
    assert_eq!(created.result, SignalResult::Pending);
    assert_eq!(created.author_id, admin.id);

    let updated = repo
        .update(created.id, param("Superclásico (updated)", UserTier::Free))
        .await?
        .unwrap();
    assert_eq!(updated.title, "Superclásico (updated)");
    assert_eq!(updated.tier, UserTier::Free);

    assert!(repo.delete(created.id).await?);
    assert!(!repo.delete(created.id).await?);
    assert!(repo.find_by_id(created.id).await?.is_none());

    Ok(())
}

/// Tests updating a missing signal.
///
/// Expected: Ok(None)
#[tokio::test]
async fn update_returns_none_for_missing_signal() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_signal_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SignalRepository::new(db);
    let result = repo.update(42, param("Ghost", UserTier::Free)).await?;

    assert!(result.is_none());

    Ok(())
}

use super::*;

/// Tests rotating a refresh token.
///
/// Verifies that revocation links the old token to its replacement and that a second
/// revocation of the same token reports nothing changed.
///
/// Expected: true then false, with replaced_by_id recorded
#[tokio::test]
async fn revokes_and_links_replacement() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let expires_at = Utc::now() + Duration::days(30);

    let repo = RefreshTokenRepository::new(db);
    let old = repo.create(user.id, "old".to_string(), expires_at).await?;
    let new = repo.create(user.id, "new".to_string(), expires_at).await?;

    let now = Utc::now();
    assert!(repo.revoke(old.id, Some(new.id), now).await?);
    assert!(!repo.revoke(old.id, None, now).await?);

    let stored = repo.find_by_hash("old").await?.unwrap();
    assert!(stored.is_revoked());
    assert_eq!(stored.replaced_by_id, Some(new.id));

    Ok(())
}

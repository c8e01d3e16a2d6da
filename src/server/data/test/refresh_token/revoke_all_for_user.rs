use super::*;

/// Tests revoking every live refresh token of one user.
///
/// Expected: both tokens of the user revoked, the other user's token untouched
#[tokio::test]
async fn revokes_only_that_users_tokens() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let expires_at = Utc::now() + Duration::days(30);

    let repo = RefreshTokenRepository::new(db);
    repo.create(user.id, "a".to_string(), expires_at).await?;
    repo.create(user.id, "b".to_string(), expires_at).await?;
    repo.create(other.id, "c".to_string(), expires_at).await?;

    let revoked = repo.revoke_all_for_user(user.id, Utc::now()).await?;

    assert_eq!(revoked, 2);
    assert!(repo.find_by_hash("a").await?.unwrap().is_revoked());
    assert!(!repo.find_by_hash("c").await?.unwrap().is_revoked());

    Ok(())
}

use super::*;

/// Tests deleting expired tokens.
///
/// Expected: only the expired token is removed
#[tokio::test]
async fn deletes_only_expired_tokens() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let now = Utc::now();

    let repo = UserTokenRepository::new(db);
    repo.create(CreateEmailTokenParam {
        user_id: user.id,
        kind: TokenKind::EmailVerification,
        token_hash: "old".to_string(),
        expires_at: now - Duration::minutes(1),
    })
    .await?;
    repo.create(CreateEmailTokenParam {
        user_id: user.id,
        kind: TokenKind::EmailVerification,
        token_hash: "fresh".to_string(),
        expires_at: now + Duration::hours(1),
    })
    .await?;

    let deleted = repo.delete_expired(now).await?;

    assert_eq!(deleted, 1);
    assert!(repo
        .find_by_hash("old", TokenKind::EmailVerification)
        .await?
        .is_none());
    assert!(repo
        .find_by_hash("fresh", TokenKind::EmailVerification)
        .await?
        .is_some());

    Ok(())
}

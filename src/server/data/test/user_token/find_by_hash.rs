use super::*;

/// Tests finding a stored token by hash and kind.
///
/// Verifies that a verification token is not returned when asking for a password
/// reset token with the same hash.
///
/// Expected: Ok(Some) for the matching kind, Ok(None) for the other
#[tokio::test]
async fn finds_token_only_for_matching_kind() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = UserTokenRepository::new(db);
    let created = repo
        .create(CreateEmailTokenParam {
            user_id: user.id,
            kind: TokenKind::EmailVerification,
            token_hash: "abc123".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await?;

    let found = repo
        .find_by_hash("abc123", TokenKind::EmailVerification)
        .await?;
    assert_eq!(found, Some(created));

    let wrong_kind = repo.find_by_hash("abc123", TokenKind::PasswordReset).await?;
    assert!(wrong_kind.is_none());

    Ok(())
}

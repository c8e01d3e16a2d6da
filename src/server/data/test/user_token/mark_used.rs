use super::*;

/// Tests that a token can only be consumed once.
///
/// Expected: true on the first call, false on the second
#[tokio::test]
async fn consumes_token_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let repo = UserTokenRepository::new(db);
    let token = repo
        .create(CreateEmailTokenParam {
            user_id: user.id,
            kind: TokenKind::PasswordReset,
            token_hash: "reset-hash".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await?;

    let now = Utc::now();
    assert!(repo.mark_used(token.id, now).await?);
    assert!(!repo.mark_used(token.id, now).await?);

    let stored = repo
        .find_by_hash("reset-hash", TokenKind::PasswordReset)
        .await?
        .unwrap();
    assert!(!stored.is_usable(now));

    Ok(())
}

/// Tests invalidating outstanding tokens of one kind.
///
/// Expected: only unused tokens of the given kind are consumed
#[tokio::test]
async fn invalidates_outstanding_tokens_of_kind() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_auth_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let expires_at = Utc::now() + Duration::hours(1);

    let repo = UserTokenRepository::new(db);
    for (hash, kind) in [
        ("verify-1", TokenKind::EmailVerification),
        ("verify-2", TokenKind::EmailVerification),
        ("reset-1", TokenKind::PasswordReset),
    ] {
        repo.create(CreateEmailTokenParam {
            user_id: user.id,
            kind,
            token_hash: hash.to_string(),
            expires_at,
        })
        .await?;
    }

    let invalidated = repo
        .invalidate_for_user(user.id, TokenKind::EmailVerification, Utc::now())
        .await?;
    assert_eq!(invalidated, 2);

    let reset = repo
        .find_by_hash("reset-1", TokenKind::PasswordReset)
        .await?
        .unwrap();
    assert!(reset.used_at.is_none());

    Ok(())
}

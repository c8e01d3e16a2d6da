use super::*;

/// Tests creating a new user during registration.
///
/// Verifies that the repository stores the account as an unverified, free-tier,
/// regular user with the given credentials.
///
/// Expected: Ok with defaults applied
#[tokio::test]
async fn creates_unverified_free_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let user = repo
        .create(CreateUserParam {
            email: "fan@example.com".to_string(),
            name: "Fan".to_string(),
            password_hash: "hash".to_string(),
        })
        .await?;

    assert_eq!(user.email, "fan@example.com");
    assert_eq!(user.role, UserRole::User);
    assert_eq!(user.tier, UserTier::Free);
    assert!(!user.email_verified);

    Ok(())
}

/// Tests that the email column is unique.
///
/// Expected: Err on the second insert with the same email
#[tokio::test]
async fn rejects_duplicate_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let param = CreateUserParam {
        email: "fan@example.com".to_string(),
        name: "Fan".to_string(),
        password_hash: "hash".to_string(),
    };
    repo.create(param.clone()).await?;

    let result = repo.create(param).await;

    assert!(result.is_err());

    Ok(())
}

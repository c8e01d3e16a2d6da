use super::*;

mod require_admin;

/// Tests a request without an Authorization header.
///
/// Expected: Err(AuthError::MissingToken)
#[tokio::test]
async fn rejects_missing_token() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = keys();
    let headers = HeaderMap::new();

    let result = AuthGuard::new(db, &keys, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::MissingToken))
    ));

    Ok(())
}

/// Tests a token signed with another secret.
///
/// Expected: Err(AuthError::InvalidToken)
#[tokio::test]
async fn rejects_foreign_token() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::create_user(db).await?;
    let other_keys = JwtKeys::from_secret("some-other-secret", chrono::Duration::minutes(15));
    let headers = headers_for(&other_keys, user);

    let keys = keys();
    let result = AuthGuard::new(db, &keys, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidToken(_)))
    ));

    Ok(())
}

/// Tests a valid token whose user was deleted.
///
/// Expected: Err(AuthError::UserNotInDatabase)
#[tokio::test]
async fn rejects_deleted_user() -> Result<(), AppError> {
    use sea_orm::{EntityTrait, ModelTrait};

    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = keys();

    let user = factory::user::create_user(db).await?;
    let user_id = user.id;
    let headers = headers_for(&keys, user.clone());
    user.delete(db).await?;
    assert!(entity::prelude::User::find_by_id(user_id).one(db).await?.is_none());

    let result = AuthGuard::new(db, &keys, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(id))) if id == user_id
    ));

    Ok(())
}

/// Tests that the guard reads the current role from the database.
///
/// Verifies that a user promoted after the token was issued is treated as admin
/// without logging in again.
///
/// Expected: Ok(User) with the admin role
#[tokio::test]
async fn uses_current_database_role() -> Result<(), AppError> {
    use crate::server::data::user::UserRepository;

    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = keys();

    let user = factory::user::create_user(db).await?;
    let user_id = user.id;
    let headers = headers_for(&keys, user);

    UserRepository::new(db)
        .set_role(user_id, UserRole::Admin)
        .await?;

    let returned = AuthGuard::new(db, &keys, &headers)
        .require(&[Permission::Admin])
        .await?;

    assert!(returned.is_admin());

    Ok(())
}

use super::*;

/// Tests admin user successfully passes admin permission check.
///
/// Expected: Ok(User) with the admin role
#[tokio::test]
async fn grants_access_to_admin_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = keys();

    let user = factory::user::UserFactory::new(db)
        .name("AdminUser")
        .role(UserRole::Admin)
        .build()
        .await?;
    let headers = headers_for(&keys, user);

    let returned_user = AuthGuard::new(db, &keys, &headers)
        .require(&[Permission::Admin])
        .await?;

    assert_eq!(returned_user.name, "AdminUser");
    assert!(returned_user.is_admin());

    Ok(())
}

/// Tests non-admin user is denied admin permission.
///
/// Expected: Err(AuthError::AccessDenied) naming the user
#[tokio::test]
async fn denies_access_to_non_admin_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = keys();

    let user = factory::user::UserFactory::new(db)
        .tier(UserTier::Vip)
        .build()
        .await?;
    let user_id = user.id;
    let headers = headers_for(&keys, user);

    let result = AuthGuard::new(db, &keys, &headers)
        .require(&[Permission::Admin])
        .await;

    match result {
        Err(AppError::AuthErr(AuthError::AccessDenied(denied_id, message))) => {
            assert_eq!(denied_id, user_id);
            assert!(message.contains("admin"));
        }
        other => panic!("Expected AccessDenied, got {:?}", other.map(|u| u.id)),
    }

    Ok(())
}

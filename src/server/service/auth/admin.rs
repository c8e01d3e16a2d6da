use entity::sea_orm_active_enums::UserRole;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    model::user::User,
    service::{admin_code::AdminCodeService, auth::AuthService},
};

impl<'a> AuthService<'a> {
    /// Promotes `user` to admin with the one-time code logged at startup.
    ///
    /// # Returns
    /// - `Ok(User)` - The user, now an admin
    /// - `Err(AuthError::InvalidAdminCode)` - Wrong, expired or already used code
    pub async fn claim_admin(
        &self,
        user: &User,
        code: &str,
        admin_codes: &AdminCodeService,
    ) -> Result<User, AppError> {
        if !admin_codes.validate_and_consume(code.trim()).await {
            return Err(AuthError::InvalidAdminCode.into());
        }

        let repo = UserRepository::new(self.db);
        repo.set_role(user.id, UserRole::Admin).await?;

        tracing::info!(user_id = user.id, "Admin role claimed with startup code");

        repo.find_by_id(user.id)
            .await?
            .ok_or_else(|| AuthError::UserNotInDatabase(user.id).into())
    }
}

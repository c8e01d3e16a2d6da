use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::TokenKind;
use sea_orm::TransactionTrait;

use crate::server::{
    data::{
        refresh_token::RefreshTokenRepository, user::UserRepository,
        user_token::UserTokenRepository,
    },
    error::{auth::AuthError, AppError},
    service::auth::{password::hash_password, AuthService},
    util::{
        parse::{normalize_email, validate_password},
        token::hash_token,
    },
};

impl<'a> AuthService<'a> {
    /// Mails a password reset link.
    ///
    /// Always succeeds for well-formed input so the endpoint does not reveal which
    /// emails are registered.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Ok(email) = normalize_email(email) else {
            return Ok(());
        };

        let Some(user) = UserRepository::new(self.db).find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = Self::issue_email_token(
            self.db,
            user.id,
            TokenKind::PasswordReset,
            Duration::minutes(self.config.password_reset_ttl_minutes),
        )
        .await?;

        if let Err(e) = self.mailer.send_password_reset(&user.email, &token).await {
            tracing::error!(user_id = user.id, "Failed to send password reset mail: {}", e);
        }

        Ok(())
    }

    /// Sets a new password with a token from the reset mail.
    ///
    /// Every refresh token of the user is revoked, ending all existing sessions.
    ///
    /// # Returns
    /// - `Ok(())` - Password changed
    /// - `Err(AppError::BadRequest)` - New password has an invalid length
    /// - `Err(AuthError::InvalidEmailToken)` - Unknown, used or expired token
    pub async fn reset_password(&self, token: &str, new_password: String) -> Result<(), AppError> {
        validate_password(&new_password)?;

        let now = Utc::now();
        let stored = UserTokenRepository::new(self.db)
            .find_by_hash(&hash_token(token.trim()), TokenKind::PasswordReset)
            .await?
            .filter(|stored| stored.is_usable(now))
            .ok_or(AuthError::InvalidEmailToken)?;

        let password_hash = hash_password(new_password, self.config.bcrypt_cost).await?;

        let txn = self.db.begin().await?;

        if !UserTokenRepository::new(&txn)
            .mark_used(stored.id, now)
            .await?
        {
            return Err(AuthError::InvalidEmailToken.into());
        }

        UserRepository::new(&txn)
            .set_password_hash(stored.user_id, password_hash)
            .await?;
        let revoked = RefreshTokenRepository::new(&txn)
            .revoke_all_for_user(stored.user_id, now)
            .await?;

        txn.commit().await?;

        tracing::info!(
            user_id = stored.user_id,
            revoked_sessions = revoked,
            "Password reset"
        );

        Ok(())
    }
}

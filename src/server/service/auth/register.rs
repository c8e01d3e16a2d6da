use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::TokenKind;
use sea_orm::{SqlErr, TransactionTrait};

use crate::server::{
    data::{user::UserRepository, user_token::UserTokenRepository},
    error::{auth::AuthError, AppError},
    model::user::{CreateUserParam, RegisterParam, User},
    service::auth::{password::hash_password, AuthService},
    util::{
        parse::{normalize_email, validate_password},
        token::hash_token,
    },
};

impl<'a> AuthService<'a> {
    /// Creates an unverified free account and mails the verification link.
    ///
    /// A failed mail does not fail the registration; the user can ask for a new link.
    ///
    /// # Returns
    /// - `Ok(User)` - The new account
    /// - `Err(AppError::BadRequest)` - Invalid email, empty name or bad password length
    /// - `Err(AuthError::EmailTaken)` - Email already registered
    pub async fn register(&self, param: RegisterParam) -> Result<User, AppError> {
        let email = normalize_email(&param.email)?;
        let name = param.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }
        validate_password(&param.password)?;

        if UserRepository::new(self.db)
            .find_by_email(&email)
            .await?
            .is_some()
        {
            return Err(AuthError::EmailTaken.into());
        }

        let password_hash = hash_password(param.password, self.config.bcrypt_cost).await?;

        let txn = self.db.begin().await?;

        let user = match UserRepository::new(&txn)
            .create(CreateUserParam {
                email,
                name,
                password_hash,
            })
            .await
        {
            Ok(user) => user,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(AuthError::EmailTaken.into());
            }
            Err(err) => return Err(err.into()),
        };

        let token = Self::issue_email_token(
            &txn,
            user.id,
            TokenKind::EmailVerification,
            Duration::hours(self.config.email_token_ttl_hours),
        )
        .await?;

        txn.commit().await?;

        tracing::info!(user_id = user.id, "User registered");

        if let Err(e) = self
            .mailer
            .send_verification(&user.email, &user.name, &token)
            .await
        {
            tracing::error!(user_id = user.id, "Failed to send verification mail: {}", e);
        }

        Ok(user)
    }

    /// Confirms an email address with a token from the verification mail.
    ///
    /// # Returns
    /// - `Ok(User)` - The now verified user
    /// - `Err(AuthError::InvalidEmailToken)` - Unknown, used or expired token
    pub async fn verify_email(&self, token: &str) -> Result<User, AppError> {
        let now = Utc::now();

        let stored = UserTokenRepository::new(self.db)
            .find_by_hash(&hash_token(token.trim()), TokenKind::EmailVerification)
            .await?
            .filter(|stored| stored.is_usable(now))
            .ok_or(AuthError::InvalidEmailToken)?;

        let txn = self.db.begin().await?;

        if !UserTokenRepository::new(&txn)
            .mark_used(stored.id, now)
            .await?
        {
            return Err(AuthError::InvalidEmailToken.into());
        }

        let user_repo = UserRepository::new(&txn);
        user_repo.set_email_verified(stored.user_id).await?;
        let user = user_repo
            .find_by_id(stored.user_id)
            .await?
            .ok_or(AuthError::InvalidEmailToken)?;

        txn.commit().await?;

        tracing::info!(user_id = user.id, "Email verified");

        Ok(user)
    }

    /// Mails a new verification link to an unverified account.
    ///
    /// Unknown, malformed and already verified addresses are silently accepted so the
    /// endpoint does not reveal which emails are registered.
    pub async fn resend_verification(&self, email: &str) -> Result<(), AppError> {
        let Ok(email) = normalize_email(email) else {
            return Ok(());
        };

        let Some(user) = UserRepository::new(self.db).find_by_email(&email).await? else {
            return Ok(());
        };
        if user.email_verified {
            return Ok(());
        }

        let token = Self::issue_email_token(
            self.db,
            user.id,
            TokenKind::EmailVerification,
            Duration::hours(self.config.email_token_ttl_hours),
        )
        .await?;

        if let Err(e) = self
            .mailer
            .send_verification(&user.email, &user.name, &token)
            .await
        {
            tracing::error!(user_id = user.id, "Failed to resend verification mail: {}", e);
        }

        Ok(())
    }
}

use chrono::Utc;
use sea_orm::TransactionTrait;

use crate::server::{
    data::{refresh_token::RefreshTokenRepository, user::UserRepository},
    error::{auth::AuthError, AppError},
    service::auth::{password::verify_password, AuthService, TokenPair},
    util::{parse::normalize_email, token::hash_token},
};

impl<'a> AuthService<'a> {
    /// Exchanges email and password for a token pair.
    ///
    /// # Returns
    /// - `Ok(TokenPair)` - New access and refresh token
    /// - `Err(AuthError::InvalidCredentials)` - Unknown email or wrong password
    /// - `Err(AuthError::EmailNotVerified)` - Correct password but unverified email
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = UserRepository::new(self.db)
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.email_verified {
            return Err(AuthError::EmailNotVerified(user.id).into());
        }

        let (pair, _) = self.issue_session(self.db, &user, Utc::now()).await?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(pair)
    }

    /// Rotates a refresh token.
    ///
    /// The presented token is revoked and linked to its successor. Presenting a token
    /// that was already revoked revokes every session of the user.
    ///
    /// # Returns
    /// - `Ok(TokenPair)` - New access token and the replacement refresh token
    /// - `Err(AuthError::InvalidRefreshToken)` - Unknown or expired token
    /// - `Err(AuthError::RefreshTokenReuse)` - Token was already rotated or revoked
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        let token_hash = hash_token(refresh_token.trim());

        let stored = RefreshTokenRepository::new(self.db)
            .find_by_hash(&token_hash)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if stored.is_revoked() {
            return Err(self.reuse_detected(stored.user_id).await);
        }
        if stored.is_expired(now) {
            return Err(AuthError::InvalidRefreshToken.into());
        }

        let user = UserRepository::new(self.db)
            .find_by_id(stored.user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let txn = self.db.begin().await?;

        let (pair, replacement) = self.issue_session(&txn, &user, now).await?;

        if !RefreshTokenRepository::new(&txn)
            .revoke(stored.id, Some(replacement.id), now)
            .await?
        {
            // Lost a race against another rotation of the same token
            txn.rollback().await?;
            return Err(self.reuse_detected(user.id).await);
        }

        txn.commit().await?;

        Ok(pair)
    }

    /// Revokes a refresh token. Unknown and already revoked tokens are accepted.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        let repo = RefreshTokenRepository::new(self.db);

        if let Some(stored) = repo.find_by_hash(&hash_token(refresh_token.trim())).await? {
            if repo.revoke(stored.id, None, Utc::now()).await? {
                tracing::info!(user_id = stored.user_id, "User logged out");
            }
        }

        Ok(())
    }

    /// Revokes all sessions of `user_id` and returns the error to report.
    async fn reuse_detected(&self, user_id: i32) -> AppError {
        tracing::warn!(user_id, "Refresh token reuse detected, revoking all sessions");

        match RefreshTokenRepository::new(self.db)
            .revoke_all_for_user(user_id, Utc::now())
            .await
        {
            Ok(_) => AuthError::RefreshTokenReuse(user_id).into(),
            Err(e) => e.into(),
        }
    }
}

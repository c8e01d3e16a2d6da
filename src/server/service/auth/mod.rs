//! Account authentication: registration, sessions and recovery.
//!
//! Sessions are a short-lived HS256 access token plus an opaque refresh token that is
//! rotated on every use. The service is organised by concern:
//! - `register` - Sign-up and email verification
//! - `session` - Login, refresh rotation and logout
//! - `recovery` - Forgotten password flow
//! - `admin` - Claiming the startup admin code

pub mod admin;
pub mod jwt;
pub mod password;
pub mod recovery;
pub mod register;
pub mod session;

use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::TokenKind;
use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::{
    model::auth::TokenPairDto,
    server::{
        config::Config,
        data::{
            refresh_token::RefreshTokenRepository, subscription::SubscriptionRepository,
            user::UserRepository, user_token::UserTokenRepository,
        },
        error::{auth::AuthError, AppError},
        model::{
            subscription::Subscription,
            token::{CreateEmailTokenParam, RefreshToken},
            user::User,
        },
        service::{auth::jwt::JwtKeys, mail::Mailer},
        util::token::{generate_token, hash_token, EMAIL_TOKEN_LENGTH, REFRESH_TOKEN_LENGTH},
    },
};

/// Tokens handed to the client after login or refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    pub fn into_dto(self) -> TokenPairDto {
        TokenPairDto {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.expires_in,
        }
    }
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
    jwt: &'a JwtKeys,
    mailer: &'a Mailer,
}

impl<'a> AuthService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        config: &'a Config,
        jwt: &'a JwtKeys,
        mailer: &'a Mailer,
    ) -> Self {
        Self {
            db,
            config,
            jwt,
            mailer,
        }
    }

    /// The caller's own account with their subscription, if any.
    ///
    /// # Returns
    /// - `Ok((User, Option<Subscription>))` - Fresh user row and subscription
    /// - `Err(AuthError::UserNotInDatabase)` - Account deleted after the token was issued
    pub async fn me(&self, user_id: i32) -> Result<(User, Option<Subscription>), AppError> {
        let user = UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotInDatabase(user_id))?;

        let subscription = SubscriptionRepository::new(self.db)
            .find_by_user(user_id)
            .await?;

        Ok((user, subscription))
    }

    /// Stores a fresh single-use token of `kind` and returns its raw value.
    ///
    /// Earlier unused tokens of the same kind are invalidated, so only the most recent
    /// mail works.
    async fn issue_email_token<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let repo = UserTokenRepository::new(db);

        repo.invalidate_for_user(user_id, kind, now).await?;

        let token = generate_token(EMAIL_TOKEN_LENGTH);
        repo.create(CreateEmailTokenParam {
            user_id,
            kind,
            token_hash: hash_token(&token),
            expires_at: now + ttl,
        })
        .await?;

        Ok(token)
    }

    /// Issues an access token and a new refresh token for `user`.
    ///
    /// # Returns
    /// - `Ok((TokenPair, RefreshToken))` - Tokens for the client and the stored refresh row
    async fn issue_session<C: ConnectionTrait>(
        &self,
        db: &C,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<(TokenPair, RefreshToken), AppError> {
        let refresh_token = generate_token(REFRESH_TOKEN_LENGTH);
        let stored = RefreshTokenRepository::new(db)
            .create(
                user.id,
                hash_token(&refresh_token),
                now + Duration::days(self.config.refresh_token_ttl_days),
            )
            .await?;

        let access_token = self.jwt.issue(user, now)?;

        Ok((
            TokenPair {
                access_token,
                refresh_token,
                expires_in: self.jwt.access_ttl().num_seconds(),
            },
            stored,
        ))
    }
}

//! Repository for persisted refresh tokens.
//!
//! Rotation links every revoked token to its successor through `replaced_by_id`, which
//! is what allows a replayed token to be recognised as reuse.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter,
};

use crate::server::model::token::RefreshToken;

pub struct RefreshTokenRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RefreshTokenRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Stores the hash of a newly issued refresh token.
    pub async fn create(
        &self,
        user_id: i32,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, DbErr> {
        let entity = entity::refresh_token::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            token_hash: ActiveValue::Set(token_hash),
            expires_at: ActiveValue::Set(expires_at),
            revoked_at: ActiveValue::Set(None),
            replaced_by_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(RefreshToken::from_entity(entity))
    }

    pub async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DbErr> {
        let entity = entity::prelude::RefreshToken::find()
            .filter(entity::refresh_token::Column::TokenHash.eq(token_hash))
            .one(self.db)
            .await?;

        Ok(entity.map(RefreshToken::from_entity))
    }

    /// Revokes a single token, optionally recording the token that replaced it.
    ///
    /// Only matches tokens that are not revoked yet.
    ///
    /// # Returns
    /// - `Ok(true)` - The token was live and is now revoked
    /// - `Ok(false)` - The token was already revoked (or does not exist)
    pub async fn revoke(
        &self,
        token_id: i32,
        replaced_by_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::RefreshToken::update_many()
            .filter(entity::refresh_token::Column::Id.eq(token_id))
            .filter(entity::refresh_token::Column::RevokedAt.is_null())
            .col_expr(entity::refresh_token::Column::RevokedAt, Expr::value(now))
            .col_expr(
                entity::refresh_token::Column::ReplacedById,
                Expr::value(replaced_by_id),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Revokes every live token of the user and returns how many were revoked.
    pub async fn revoke_all_for_user(
        &self,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::RefreshToken::update_many()
            .filter(entity::refresh_token::Column::UserId.eq(user_id))
            .filter(entity::refresh_token::Column::RevokedAt.is_null())
            .col_expr(entity::refresh_token::Column::RevokedAt, Expr::value(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes tokens whose expiry is before `now`.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::RefreshToken::delete_many()
            .filter(entity::refresh_token::Column::ExpiresAt.lte(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

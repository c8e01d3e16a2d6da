//! Repository for single-use email tokens (verification and password reset).

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::TokenKind;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter,
};

use crate::server::model::token::{CreateEmailTokenParam, EmailToken};

pub struct UserTokenRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserTokenRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Stores a new token hash.
    pub async fn create(&self, param: CreateEmailTokenParam) -> Result<EmailToken, DbErr> {
        let entity = entity::user_token::ActiveModel {
            user_id: ActiveValue::Set(param.user_id),
            kind: ActiveValue::Set(param.kind),
            token_hash: ActiveValue::Set(param.token_hash),
            expires_at: ActiveValue::Set(param.expires_at),
            used_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(EmailToken::from_entity(entity))
    }

    /// Finds a token of the given kind by its hash.
    pub async fn find_by_hash(
        &self,
        token_hash: &str,
        kind: TokenKind,
    ) -> Result<Option<EmailToken>, DbErr> {
        let entity = entity::prelude::UserToken::find()
            .filter(entity::user_token::Column::TokenHash.eq(token_hash))
            .filter(entity::user_token::Column::Kind.eq(kind))
            .one(self.db)
            .await?;

        Ok(entity.map(EmailToken::from_entity))
    }

    /// Consumes a token.
    ///
    /// The update only matches while `used_at` is still empty, so of two concurrent
    /// consumers exactly one sees `true`.
    ///
    /// # Returns
    /// - `Ok(true)` - The token was unused and is now consumed
    /// - `Ok(false)` - The token was already used (or does not exist)
    /// - `Err(DbErr)` - Database error during update
    pub async fn mark_used(&self, token_id: i32, now: DateTime<Utc>) -> Result<bool, DbErr> {
        let result = entity::prelude::UserToken::update_many()
            .filter(entity::user_token::Column::Id.eq(token_id))
            .filter(entity::user_token::Column::UsedAt.is_null())
            .col_expr(entity::user_token::Column::UsedAt, Expr::value(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Consumes every outstanding token of `kind` for the user.
    ///
    /// Called before issuing a new token so only the latest mailed link works.
    pub async fn invalidate_for_user(
        &self,
        user_id: i32,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::UserToken::update_many()
            .filter(entity::user_token::Column::UserId.eq(user_id))
            .filter(entity::user_token::Column::Kind.eq(kind))
            .filter(entity::user_token::Column::UsedAt.is_null())
            .col_expr(entity::user_token::Column::UsedAt, Expr::value(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes tokens that expired before `now`, used or not.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::UserToken::delete_many()
            .filter(entity::user_token::Column::ExpiresAt.lte(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

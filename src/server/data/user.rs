//! User data repository for database operations.
//!
//! This module provides the `UserRepository` for managing account records in the database.
//! It handles registration inserts, lookups, verification, password changes, and the role
//! and tier updates made by the manager endpoints and the subscription lifecycle.

use chrono::Utc;
use entity::sea_orm_active_enums::{UserRole, UserTier};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::{
    pagination::{PageParam, Paginated},
    user::{CreateUserParam, User},
};

/// Repository providing database operations for user management.
///
/// This struct holds a reference to a database connection or transaction and provides
/// methods for creating, reading, and updating user records.
pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection or an open transaction
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new unverified free-tier user.
    ///
    /// # Arguments
    /// - `param` - Normalised email, display name and bcrypt password hash
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(DbErr)` - Database error, including a unique violation on `email`
    pub async fn create(&self, param: CreateUserParam) -> Result<User, DbErr> {
        let now = Utc::now();
        let entity = entity::user::ActiveModel {
            email: ActiveValue::Set(param.email),
            name: ActiveValue::Set(param.name),
            password_hash: ActiveValue::Set(param.password_hash),
            role: ActiveValue::Set(UserRole::User),
            tier: ActiveValue::Set(UserTier::Free),
            email_verified: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(User::from_entity(entity))
    }

    /// Finds a user by primary key.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User found
    /// - `Ok(None)` - No user with that id
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find_by_id(user_id)
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user by email address.
    ///
    /// The lookup is exact; callers pass the already lower-cased address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Checks if any admin users exist in the database.
    ///
    /// Used during startup to decide whether a one-time admin claim code is needed.
    ///
    /// # Returns
    /// - `Ok(true)` - At least one admin user exists
    /// - `Ok(false)` - No admin users exist (first-time setup scenario)
    /// - `Err(DbErr)` - Database error during count query
    pub async fn admin_exists(&self) -> Result<bool, DbErr> {
        let admin_count = entity::prelude::User::find()
            .filter(entity::user::Column::Role.eq(UserRole::Admin))
            .count(self.db)
            .await?;

        Ok(admin_count > 0)
    }

    /// Gets all users with pagination, ordered by email.
    ///
    /// # Arguments
    /// - `page` - Zero-indexed page and page size
    ///
    /// # Returns
    /// - `Ok(Paginated<User>)` - Users of the requested page and the total user count
    /// - `Err(DbErr)` - Database error during pagination query
    pub async fn get_all_paginated(&self, page: PageParam) -> Result<Paginated<User>, DbErr> {
        let paginator = entity::prelude::User::find()
            .order_by_asc(entity::user::Column::Email)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page.page).await?;
        let users = entities.into_iter().map(User::from_entity).collect();

        Ok(Paginated::new(users, total, page))
    }

    /// Marks the user's email address as verified.
    pub async fn set_email_verified(&self, user_id: i32) -> Result<(), DbErr> {
        self.update_column(user_id, entity::user::Column::EmailVerified, true)
            .await
    }

    /// Replaces the stored password hash.
    pub async fn set_password_hash(
        &self,
        user_id: i32,
        password_hash: String,
    ) -> Result<(), DbErr> {
        self.update_column(user_id, entity::user::Column::PasswordHash, password_hash)
            .await
    }

    /// Sets the user's role.
    ///
    /// # Returns
    /// - `Ok(())` - Role updated (or no matching user found)
    /// - `Err(DbErr)` - Database error during update operation
    pub async fn set_role(&self, user_id: i32, role: UserRole) -> Result<(), DbErr> {
        self.update_column(user_id, entity::user::Column::Role, role)
            .await
    }

    /// Sets the user's paid tier.
    pub async fn set_tier(&self, user_id: i32, tier: UserTier) -> Result<(), DbErr> {
        self.update_column(user_id, entity::user::Column::Tier, tier)
            .await
    }

    async fn update_column(
        &self,
        user_id: i32,
        column: entity::user::Column,
        value: impl Into<sea_orm::Value>,
    ) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(user_id))
            .col_expr(column, Expr::value(value))
            .col_expr(entity::user::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;
        Ok(())
    }
}

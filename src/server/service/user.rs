//! User service for the manager endpoints.
//!
//! This module provides the `UserService` used by admins to browse accounts, change
//! roles and hand out or revoke VIP access manually. It works with domain models rather
//! than DTOs.

use chrono::Utc;
use entity::sea_orm_active_enums::UserRole;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    data::user::UserRepository,
    error::AppError,
    model::{
        pagination::{PageParam, Paginated},
        subscription::Subscription,
        user::User,
    },
    service::vip_activation::VipActivationService,
};

/// Service providing business logic for user management.
pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Retrieves all users with pagination, ordered by email.
    ///
    /// # Arguments
    /// - `page` - Page number and size
    ///
    /// # Returns
    /// - `Ok(Paginated<User>)` - Users for the requested page with pagination metadata
    /// - `Err(AppError::DbErr)` - Database error during pagination query
    pub async fn list(&self, page: PageParam) -> Result<Paginated<User>, AppError> {
        Ok(UserRepository::new(self.db).get_all_paginated(page).await?)
    }

    /// Retrieves a user by id.
    ///
    /// # Returns
    /// - `Ok(User)` - The user
    /// - `Err(AppError::NotFound)` - No user with that id
    pub async fn get(&self, user_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Changes a user's role.
    ///
    /// An admin can not demote themselves, so the manager always keeps at least the
    /// acting admin.
    ///
    /// # Arguments
    /// - `actor` - Admin performing the change
    /// - `user_id` - Target user
    /// - `role` - New role
    ///
    /// # Returns
    /// - `Ok(User)` - The updated user
    /// - `Err(AppError::BadRequest)` - Self-demotion attempt
    /// - `Err(AppError::NotFound)` - Unknown user
    pub async fn set_role(
        &self,
        actor: &User,
        user_id: i32,
        role: UserRole,
    ) -> Result<User, AppError> {
        if actor.id == user_id && role != UserRole::Admin {
            return Err(AppError::BadRequest(
                "Admins can not remove their own admin role".to_string(),
            ));
        }

        let user = self.get(user_id).await?;
        UserRepository::new(self.db).set_role(user.id, role).await?;

        tracing::info!(
            actor_id = actor.id,
            user_id,
            role = ?role,
            "User role changed"
        );

        self.get(user_id).await
    }

    /// Grants `days` of VIP access without a sale.
    ///
    /// # Returns
    /// - `Ok(Subscription)` - The extended subscription
    /// - `Err(AppError::BadRequest)` - `days` is not positive
    /// - `Err(AppError::NotFound)` - Unknown user
    pub async fn grant_vip(&self, user_id: i32, days: i32) -> Result<Subscription, AppError> {
        let user = self.get(user_id).await?;

        let txn = self.db.begin().await?;
        let subscription = VipActivationService::new(&txn)
            .grant(user.id, days, Utc::now())
            .await?;
        txn.commit().await?;

        tracing::info!(user_id, days, "VIP granted manually");

        Ok(subscription)
    }

    /// Revokes VIP access immediately.
    ///
    /// # Returns
    /// - `Ok(User)` - The user, now on the free tier
    /// - `Err(AppError::NotFound)` - Unknown user
    pub async fn revoke_vip(&self, user_id: i32) -> Result<User, AppError> {
        let user = self.get(user_id).await?;

        let txn = self.db.begin().await?;
        VipActivationService::new(&txn).deactivate(user.id).await?;
        txn.commit().await?;

        tracing::info!(user_id, "VIP revoked manually");

        self.get(user_id).await
    }
}

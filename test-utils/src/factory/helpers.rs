//! Shared helper utilities for factory methods.
//!
//! This module provides common utilities used across all factory modules,
//! including ID generation and convenience methods for creating entities
//! with their dependencies.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a pending sale together with its buyer and plan.
///
/// This is a convenience method that creates:
/// 1. User (verified, free tier)
/// 2. Plan (30 days)
/// 3. Sale (pending, priced from the plan)
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok((user, plan, sale))` - Tuple of all created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_sale_with_dependencies(
    db: &DatabaseConnection,
) -> Result<
    (
        entity::user::Model,
        entity::plan::Model,
        entity::sale::Model,
    ),
    DbErr,
> {
    let user = crate::factory::user::create_user(db).await?;
    let plan = crate::factory::plan::create_plan(db).await?;
    let sale = crate::factory::sale::create_sale(db, user.id, &plan).await?;

    Ok((user, plan, sale))
}

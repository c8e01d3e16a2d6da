//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations (CRUD) for each
//! domain in the application. Repositories use SeaORM entity models internally and return
//! domain models to maintain separation between the data layer and business logic layer.
//!
//! Every repository is generic over `ConnectionTrait`, so the same repository can run
//! against the pooled `DatabaseConnection` or inside a `DatabaseTransaction` opened by a
//! service that needs several writes to commit together.

pub mod plan;
pub mod refresh_token;
pub mod sale;
pub mod signal;
pub mod subscription;
pub mod user;
pub mod user_token;
pub mod webhook_event;

#[cfg(test)]
mod test;

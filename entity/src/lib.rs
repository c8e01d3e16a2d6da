//! SeaORM entity models for the chamagol database schema.
//!
//! Each module maps one table. The schema itself is owned by the `migration` crate;
//! these models must be kept in sync with it.

pub mod prelude;

pub mod plan;
pub mod refresh_token;
pub mod sale;
pub mod sea_orm_active_enums;
pub mod signal;
pub mod subscription;
pub mod user;
pub mod user_token;
pub mod webhook_event;

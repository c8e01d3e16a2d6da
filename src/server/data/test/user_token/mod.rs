use crate::server::{data::user_token::UserTokenRepository, model::token::CreateEmailTokenParam};
use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::TokenKind;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod delete_expired;
mod find_by_hash;
mod mark_used;

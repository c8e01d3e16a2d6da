use crate::server::{
    data::subscription::SubscriptionRepository, model::subscription::UpsertSubscriptionParam,
};
use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::SubscriptionStatus;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod expire_if_due;
mod upsert;

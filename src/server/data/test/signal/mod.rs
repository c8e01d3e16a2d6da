use crate::server::{
    data::signal::SignalRepository,
    model::{pagination::PageParam, signal::SignalParam},
};
use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::{SignalResult, UserTier};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod get_paginated;
mod set_result;

fn param(title: &str, tier: UserTier) -> SignalParam {
    SignalParam {
        title: title.to_string(),
        competition: "Libertadores".to_string(),
        event_name: "Boca x River".to_string(),
        market: "BTTS".to_string(),
        pick: "Yes".to_string(),
        odds: 1.95,
        stake_units: Some(1.5),
        analysis: None,
        tier,
        starts_at: Utc::now() + Duration::hours(2),
    }
}

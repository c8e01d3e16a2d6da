use crate::server::{
    data::sale::SaleRepository,
    model::{pagination::PageParam, sale::CreateSaleParam},
};
use chrono::Utc;
use entity::sea_orm_active_enums::SaleStatus;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod mark_paid;
mod stats;
mod transition;

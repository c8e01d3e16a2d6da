use crate::server::{
    data::plan::PlanRepository,
    model::plan::{CreatePlanParam, UpdatePlanParam},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod get_active;
mod update;

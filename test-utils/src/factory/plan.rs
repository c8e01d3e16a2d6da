//! Plan factory for creating test subscription plans.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test plans with customizable fields.
pub struct PlanFactory<'a> {
    db: &'a DatabaseConnection,
    code: String,
    name: String,
    price_cents: i64,
    currency: String,
    duration_days: i32,
    active: bool,
}

impl<'a> PlanFactory<'a> {
    /// Creates a new PlanFactory with default values.
    ///
    /// Defaults:
    /// - code: `"plan-{id}"`
    /// - price: 4990 BRL cents
    /// - duration_days: `30`
    /// - active: `true`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            code: format!("plan-{}", id),
            name: format!("Plan {}", id),
            price_cents: 4990,
            currency: "BRL".to_string(),
            duration_days: 30,
            active: true,
        }
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn price_cents(mut self, price_cents: i64) -> Self {
        self.price_cents = price_cents;
        self
    }

    pub fn duration_days(mut self, duration_days: i32) -> Self {
        self.duration_days = duration_days;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builds and inserts the plan entity into the database.
    pub async fn build(self) -> Result<entity::plan::Model, DbErr> {
        entity::plan::ActiveModel {
            code: ActiveValue::Set(self.code),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(None),
            price_cents: ActiveValue::Set(self.price_cents),
            currency: ActiveValue::Set(self.currency),
            duration_days: ActiveValue::Set(self.duration_days),
            active: ActiveValue::Set(self.active),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active 30-day plan with default values.
pub async fn create_plan(db: &DatabaseConnection) -> Result<entity::plan::Model, DbErr> {
    PlanFactory::new(db).build().await
}

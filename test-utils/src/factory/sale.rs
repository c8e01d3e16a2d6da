//! Sale factory for creating test sales.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::SaleStatus;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test sales priced from a plan.
pub struct SaleFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i32,
    plan_id: i32,
    reference: String,
    payment_id: Option<String>,
    amount_cents: i64,
    currency: String,
    status: SaleStatus,
    paid_at: Option<DateTime<Utc>>,
}

impl<'a> SaleFactory<'a> {
    /// Creates a new SaleFactory for the given buyer and plan.
    ///
    /// Defaults:
    /// - reference: `"ref-{id}"`
    /// - amount/currency: copied from the plan
    /// - status: `SaleStatus::Pending`
    pub fn new(db: &'a DatabaseConnection, user_id: i32, plan: &entity::plan::Model) -> Self {
        let id = next_id();
        Self {
            db,
            user_id,
            plan_id: plan.id,
            reference: format!("ref-{}", id),
            payment_id: None,
            amount_cents: plan.price_cents,
            currency: plan.currency.clone(),
            status: SaleStatus::Pending,
            paid_at: None,
        }
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn payment_id(mut self, payment_id: impl Into<String>) -> Self {
        self.payment_id = Some(payment_id.into());
        self
    }

    pub fn status(mut self, status: SaleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn paid_at(mut self, paid_at: DateTime<Utc>) -> Self {
        self.paid_at = Some(paid_at);
        self
    }

    /// Builds and inserts the sale entity into the database.
    pub async fn build(self) -> Result<entity::sale::Model, DbErr> {
        let now = Utc::now();
        entity::sale::ActiveModel {
            user_id: ActiveValue::Set(self.user_id),
            plan_id: ActiveValue::Set(self.plan_id),
            reference: ActiveValue::Set(self.reference),
            checkout_id: ActiveValue::Set(None),
            payment_id: ActiveValue::Set(self.payment_id),
            amount_cents: ActiveValue::Set(self.amount_cents),
            currency: ActiveValue::Set(self.currency),
            status: ActiveValue::Set(self.status),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            paid_at: ActiveValue::Set(self.paid_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending sale for the given user and plan.
pub async fn create_sale(
    db: &DatabaseConnection,
    user_id: i32,
    plan: &entity::plan::Model,
) -> Result<entity::sale::Model, DbErr> {
    SaleFactory::new(db, user_id, plan).build().await
}

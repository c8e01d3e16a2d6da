use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::server::model::plan::{CreatePlanParam, Plan, UpdatePlanParam};

pub struct PlanRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PlanRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new active plan.
    pub async fn create(&self, param: CreatePlanParam) -> Result<Plan, DbErr> {
        let entity = entity::plan::ActiveModel {
            code: ActiveValue::Set(param.code),
            name: ActiveValue::Set(param.name),
            description: ActiveValue::Set(param.description),
            price_cents: ActiveValue::Set(param.price_cents),
            currency: ActiveValue::Set(param.currency),
            duration_days: ActiveValue::Set(param.duration_days),
            active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Plan::from_entity(entity))
    }

    pub async fn find_by_id(&self, plan_id: i32) -> Result<Option<Plan>, DbErr> {
        let entity = entity::prelude::Plan::find_by_id(plan_id)
            .one(self.db)
            .await?;

        Ok(entity.map(Plan::from_entity))
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Plan>, DbErr> {
        let entity = entity::prelude::Plan::find()
            .filter(entity::plan::Column::Code.eq(code))
            .one(self.db)
            .await?;

        Ok(entity.map(Plan::from_entity))
    }

    /// Gets the plans currently offered for sale, cheapest first.
    pub async fn get_active(&self) -> Result<Vec<Plan>, DbErr> {
        let entities = entity::prelude::Plan::find()
            .filter(entity::plan::Column::Active.eq(true))
            .order_by_asc(entity::plan::Column::PriceCents)
            .order_by_asc(entity::plan::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Plan::from_entity).collect())
    }

    /// Gets every plan including retired ones, in creation order.
    pub async fn get_all(&self) -> Result<Vec<Plan>, DbErr> {
        let entities = entity::prelude::Plan::find()
            .order_by_asc(entity::plan::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Plan::from_entity).collect())
    }

    /// Updates the editable fields of a plan. The code is immutable.
    ///
    /// # Returns
    /// - `Ok(Some(Plan))` - The updated plan
    /// - `Ok(None)` - No plan with that id
    /// - `Err(DbErr)` - Database error during update
    pub async fn update(&self, param: UpdatePlanParam) -> Result<Option<Plan>, DbErr> {
        let Some(existing) = entity::prelude::Plan::find_by_id(param.id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: entity::plan::ActiveModel = existing.into();
        active_model.name = ActiveValue::Set(param.name);
        active_model.description = ActiveValue::Set(param.description);
        active_model.price_cents = ActiveValue::Set(param.price_cents);
        active_model.duration_days = ActiveValue::Set(param.duration_days);
        active_model.active = ActiveValue::Set(param.active);

        let entity = active_model.update(self.db).await?;

        Ok(Some(Plan::from_entity(entity)))
    }
}

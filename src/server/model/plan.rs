use chrono::Duration;

use crate::model::plan::{CreatePlanDto, PlanDto, UpdatePlanDto};

/// A purchasable VIP package.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub duration_days: i32,
    pub active: bool,
}

impl Plan {
    /// Length of the VIP window one purchase grants.
    pub fn duration(&self) -> Duration {
        Duration::days(self.duration_days as i64)
    }

    pub fn into_dto(self) -> PlanDto {
        PlanDto {
            id: self.id,
            code: self.code,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            currency: self.currency,
            duration_days: self.duration_days,
            active: self.active,
        }
    }

    pub fn from_entity(entity: entity::plan::Model) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            name: entity.name,
            description: entity.description,
            price_cents: entity.price_cents,
            currency: entity.currency,
            duration_days: entity.duration_days,
            active: entity.active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePlanParam {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub duration_days: i32,
}

impl CreatePlanParam {
    pub fn from_dto(dto: CreatePlanDto) -> Self {
        Self {
            code: dto.code.trim().to_lowercase(),
            name: dto.name.trim().to_string(),
            description: dto.description,
            price_cents: dto.price_cents,
            currency: dto.currency.trim().to_uppercase(),
            duration_days: dto.duration_days,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePlanParam {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_days: i32,
    pub active: bool,
}

impl UpdatePlanParam {
    pub fn from_dto(id: i32, dto: UpdatePlanDto) -> Self {
        Self {
            id,
            name: dto.name.trim().to_string(),
            description: dto.description,
            price_cents: dto.price_cents,
            duration_days: dto.duration_days,
            active: dto.active,
        }
    }
}

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::SaleStatus;

use crate::model::sale::{
    CheckoutResponseDto, RevenueDto, SaleDto, SaleStatsDto, StatusCountDto,
};

/// One purchase attempt of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub id: i32,
    pub user_id: i32,
    pub plan_id: i32,
    /// Our reference, sent to the gateway as `external_reference`.
    pub reference: String,
    pub checkout_id: Option<String>,
    pub payment_id: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Sale {
    pub fn into_dto(self) -> SaleDto {
        SaleDto {
            id: self.id,
            user_id: self.user_id,
            plan_id: self.plan_id,
            reference: self.reference,
            payment_id: self.payment_id,
            amount_cents: self.amount_cents,
            currency: self.currency,
            status: self.status,
            created_at: self.created_at,
            paid_at: self.paid_at,
        }
    }

    pub fn from_entity(entity: entity::sale::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            plan_id: entity.plan_id,
            reference: entity.reference,
            checkout_id: entity.checkout_id,
            payment_id: entity.payment_id,
            amount_cents: entity.amount_cents,
            currency: entity.currency,
            status: entity.status,
            created_at: entity.created_at,
            paid_at: entity.paid_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateSaleParam {
    pub user_id: i32,
    pub plan_id: i32,
    pub reference: String,
    pub amount_cents: i64,
    pub currency: String,
}

/// Result of a successful checkout request.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub sale_id: i32,
    pub reference: String,
    pub checkout_url: String,
}

impl Checkout {
    pub fn into_dto(self) -> CheckoutResponseDto {
        CheckoutResponseDto {
            sale_id: self.sale_id,
            reference: self.reference,
            checkout_url: self.checkout_url,
        }
    }
}

/// Sale counts per status and paid revenue per currency.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaleStats {
    pub by_status: Vec<(SaleStatus, u64)>,
    pub revenue: Vec<(String, i64)>,
}

impl SaleStats {
    pub fn into_dto(self) -> SaleStatsDto {
        SaleStatsDto {
            by_status: self
                .by_status
                .into_iter()
                .map(|(status, count)| StatusCountDto { status, count })
                .collect(),
            revenue: self
                .revenue
                .into_iter()
                .map(|(currency, amount_cents)| RevenueDto {
                    currency,
                    amount_cents,
                })
                .collect(),
        }
    }
}

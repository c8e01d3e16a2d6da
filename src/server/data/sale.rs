//! Sale data repository.
//!
//! Status changes are conditional updates (`WHERE status = ...`) so that a sale can only
//! leave a state once, even when two notifications for the same payment race.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::SaleStatus;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, Iterable, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::{
    pagination::{PageParam, Paginated},
    sale::{CreateSaleParam, Sale},
};

pub struct SaleRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SaleRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new pending sale.
    pub async fn create(&self, param: CreateSaleParam) -> Result<Sale, DbErr> {
        let now = Utc::now();
        let entity = entity::sale::ActiveModel {
            user_id: ActiveValue::Set(param.user_id),
            plan_id: ActiveValue::Set(param.plan_id),
            reference: ActiveValue::Set(param.reference),
            checkout_id: ActiveValue::Set(None),
            payment_id: ActiveValue::Set(None),
            amount_cents: ActiveValue::Set(param.amount_cents),
            currency: ActiveValue::Set(param.currency),
            status: ActiveValue::Set(SaleStatus::Pending),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            paid_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Sale::from_entity(entity))
    }

    pub async fn find_by_id(&self, sale_id: i32) -> Result<Option<Sale>, DbErr> {
        let entity = entity::prelude::Sale::find_by_id(sale_id)
            .one(self.db)
            .await?;

        Ok(entity.map(Sale::from_entity))
    }

    /// Finds a sale by the external reference sent to the gateway.
    pub async fn find_by_reference(&self, reference: &str) -> Result<Option<Sale>, DbErr> {
        let entity = entity::prelude::Sale::find()
            .filter(entity::sale::Column::Reference.eq(reference))
            .one(self.db)
            .await?;

        Ok(entity.map(Sale::from_entity))
    }

    /// Records the gateway's checkout preference id.
    pub async fn set_checkout_id(&self, sale_id: i32, checkout_id: String) -> Result<(), DbErr> {
        entity::prelude::Sale::update_many()
            .filter(entity::sale::Column::Id.eq(sale_id))
            .col_expr(entity::sale::Column::CheckoutId, Expr::value(checkout_id))
            .col_expr(entity::sale::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Moves a `pending` or `failed` sale to `paid`.
    ///
    /// A late approval can follow a rejection, so `failed` sales may still be paid.
    /// Paid and refunded sales are left alone.
    ///
    /// # Returns
    /// - `Ok(true)` - The sale transitioned to paid
    /// - `Ok(false)` - The sale was already paid or refunded (or does not exist)
    pub async fn mark_paid(
        &self,
        sale_id: i32,
        payment_id: &str,
        paid_at: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::Sale::update_many()
            .filter(entity::sale::Column::Id.eq(sale_id))
            .filter(
                entity::sale::Column::Status.is_in([SaleStatus::Pending, SaleStatus::Failed]),
            )
            .col_expr(entity::sale::Column::Status, Expr::value(SaleStatus::Paid))
            .col_expr(entity::sale::Column::PaymentId, Expr::value(payment_id))
            .col_expr(entity::sale::Column::PaidAt, Expr::value(paid_at))
            .col_expr(entity::sale::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Moves a sale from one of `from` to `to`, recording the payment id when given.
    ///
    /// # Returns
    /// - `Ok(true)` - The sale was in one of the `from` states and transitioned
    /// - `Ok(false)` - The sale was in another state (or does not exist)
    pub async fn transition(
        &self,
        sale_id: i32,
        from: &[SaleStatus],
        to: SaleStatus,
        payment_id: Option<&str>,
    ) -> Result<bool, DbErr> {
        let mut update = entity::prelude::Sale::update_many()
            .filter(entity::sale::Column::Id.eq(sale_id))
            .filter(entity::sale::Column::Status.is_in(from.iter().copied()))
            .col_expr(entity::sale::Column::Status, Expr::value(to))
            .col_expr(entity::sale::Column::UpdatedAt, Expr::value(Utc::now()));

        if let Some(payment_id) = payment_id {
            update = update.col_expr(entity::sale::Column::PaymentId, Expr::value(payment_id));
        }

        let result = update.exec(self.db).await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets a user's sales, newest first.
    pub async fn get_by_user_paginated(
        &self,
        user_id: i32,
        page: PageParam,
    ) -> Result<Paginated<Sale>, DbErr> {
        let paginator = entity::prelude::Sale::find()
            .filter(entity::sale::Column::UserId.eq(user_id))
            .order_by_desc(entity::sale::Column::CreatedAt)
            .order_by_desc(entity::sale::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page.page).await?;
        let sales = entities.into_iter().map(Sale::from_entity).collect();

        Ok(Paginated::new(sales, total, page))
    }

    /// Gets all sales, newest first, optionally restricted to one status.
    pub async fn get_paginated(
        &self,
        status: Option<SaleStatus>,
        page: PageParam,
    ) -> Result<Paginated<Sale>, DbErr> {
        let mut query = entity::prelude::Sale::find();
        if let Some(status) = status {
            query = query.filter(entity::sale::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(entity::sale::Column::CreatedAt)
            .order_by_desc(entity::sale::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page.page).await?;
        let sales = entities.into_iter().map(Sale::from_entity).collect();

        Ok(Paginated::new(sales, total, page))
    }

    /// Counts sales for every status, including statuses with no sales.
    pub async fn count_by_status(&self) -> Result<Vec<(SaleStatus, u64)>, DbErr> {
        let mut counts = Vec::new();
        for status in SaleStatus::iter() {
            let count = entity::prelude::Sale::find()
                .filter(entity::sale::Column::Status.eq(status))
                .count(self.db)
                .await?;
            counts.push((status, count));
        }
        Ok(counts)
    }

    /// Sums the amount of paid sales per currency.
    pub async fn paid_revenue_by_currency(&self) -> Result<Vec<(String, i64)>, DbErr> {
        entity::prelude::Sale::find()
            .select_only()
            .column(entity::sale::Column::Currency)
            .column_as(entity::sale::Column::AmountCents.sum(), "total")
            .filter(entity::sale::Column::Status.eq(SaleStatus::Paid))
            .group_by(entity::sale::Column::Currency)
            .order_by_asc(entity::sale::Column::Currency)
            .into_tuple::<(String, i64)>()
            .all(self.db)
            .await
    }
}

//! Sales: checkout creation and payment-driven status changes.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::SaleStatus;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use uuid::Uuid;

use crate::server::{
    config::Config,
    data::{plan::PlanRepository, sale::SaleRepository},
    error::{auth::AuthError, AppError},
    model::{
        pagination::{PageParam, Paginated},
        sale::{Checkout, CreateSaleParam, Sale, SaleStats},
        user::User,
    },
    service::{
        payment::{CheckoutRequest, PaymentGateway},
        vip_activation::VipActivationService,
    },
};

pub struct SaleService<'a> {
    db: &'a DatabaseConnection,
    gateway: &'a dyn PaymentGateway,
    config: &'a Config,
}

impl<'a> SaleService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        gateway: &'a dyn PaymentGateway,
        config: &'a Config,
    ) -> Self {
        Self {
            db,
            gateway,
            config,
        }
    }

    /// Starts the purchase of a plan.
    ///
    /// Creates a pending sale and a gateway checkout for it. When the gateway refuses,
    /// the sale is marked failed so it does not linger as pending.
    ///
    /// # Arguments
    /// - `user` - Verified buyer
    /// - `plan_code` - Code of an active plan
    ///
    /// # Returns
    /// - `Ok(Checkout)` - Sale id, reference and the hosted checkout URL
    /// - `Err(AppError::NotFound)` - No active plan with that code
    /// - `Err(AppError::AuthErr)` - Buyer has not verified the email address
    /// - `Err(AppError::PaymentErr)` - Gateway failure
    pub async fn checkout(&self, user: &User, plan_code: &str) -> Result<Checkout, AppError> {
        if !user.email_verified {
            return Err(AuthError::EmailNotVerified(user.id).into());
        }

        let plan = PlanRepository::new(self.db)
            .find_by_code(&plan_code.trim().to_lowercase())
            .await?
            .filter(|plan| plan.active)
            .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))?;

        let sale_repo = SaleRepository::new(self.db);
        let sale = sale_repo
            .create(CreateSaleParam {
                user_id: user.id,
                plan_id: plan.id,
                reference: Uuid::new_v4().to_string(),
                amount_cents: plan.price_cents,
                currency: plan.currency.clone(),
            })
            .await?;

        let request = CheckoutRequest {
            reference: sale.reference.clone(),
            title: plan.name.clone(),
            amount_cents: sale.amount_cents,
            currency: sale.currency.clone(),
            payer_email: user.email.clone(),
            return_url: format!("{}/checkout/result", self.config.app_url),
            notification_url: self.config.payment_notification_url.clone(),
        };

        match self.gateway.create_checkout(request).await {
            Ok(preference) => {
                sale_repo.set_checkout_id(sale.id, preference.id).await?;

                tracing::info!(
                    sale_id = sale.id,
                    user_id = user.id,
                    plan = %plan.code,
                    "Checkout created"
                );

                Ok(Checkout {
                    sale_id: sale.id,
                    reference: sale.reference,
                    checkout_url: preference.checkout_url,
                })
            }
            Err(err) => {
                sale_repo
                    .transition(sale.id, &[SaleStatus::Pending], SaleStatus::Failed, None)
                    .await?;
                Err(err.into())
            }
        }
    }

    /// Marks a sale paid and grants the plan's VIP window.
    ///
    /// Runs on the caller's connection, normally the transaction that also completes the
    /// webhook event. Already paid sales are not extended a second time.
    ///
    /// # Returns
    /// - `Ok(true)` - The sale transitioned and VIP was activated
    /// - `Ok(false)` - Nothing to do, the sale was already settled
    pub async fn mark_paid<C: ConnectionTrait>(
        db: &C,
        sale: &Sale,
        payment_id: &str,
        paid_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if !SaleRepository::new(db)
            .mark_paid(sale.id, payment_id, paid_at)
            .await?
        {
            return Ok(false);
        }

        let plan = PlanRepository::new(db)
            .find_by_id(sale.plan_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Plan {} of sale {} not found", sale.plan_id, sale.id))
            })?;

        VipActivationService::new(db)
            .activate(sale.user_id, &plan, Utc::now())
            .await?;

        tracing::info!(sale_id = sale.id, user_id = sale.user_id, "Sale paid");

        Ok(true)
    }

    /// Marks a pending sale failed.
    pub async fn mark_failed<C: ConnectionTrait>(
        db: &C,
        sale: &Sale,
        payment_id: &str,
    ) -> Result<bool, AppError> {
        let changed = SaleRepository::new(db)
            .transition(
                sale.id,
                &[SaleStatus::Pending],
                SaleStatus::Failed,
                Some(payment_id),
            )
            .await?;

        Ok(changed)
    }

    /// Marks a sale refunded. Refunding a paid sale revokes the buyer's VIP access.
    pub async fn mark_refunded<C: ConnectionTrait>(
        db: &C,
        sale: &Sale,
        payment_id: &str,
    ) -> Result<bool, AppError> {
        let sale_repo = SaleRepository::new(db);

        if sale_repo
            .transition(
                sale.id,
                &[SaleStatus::Paid],
                SaleStatus::Refunded,
                Some(payment_id),
            )
            .await?
        {
            VipActivationService::new(db)
                .deactivate(sale.user_id)
                .await?;

            tracing::info!(sale_id = sale.id, user_id = sale.user_id, "Paid sale refunded");
            return Ok(true);
        }

        let changed = sale_repo
            .transition(
                sale.id,
                &[SaleStatus::Pending, SaleStatus::Failed],
                SaleStatus::Refunded,
                Some(payment_id),
            )
            .await?;

        Ok(changed)
    }

    pub async fn list_for_user(
        &self,
        user_id: i32,
        page: PageParam,
    ) -> Result<Paginated<Sale>, AppError> {
        Ok(SaleRepository::new(self.db)
            .get_by_user_paginated(user_id, page)
            .await?)
    }

    pub async fn list(
        &self,
        status: Option<SaleStatus>,
        page: PageParam,
    ) -> Result<Paginated<Sale>, AppError> {
        Ok(SaleRepository::new(self.db)
            .get_paginated(status, page)
            .await?)
    }

    pub async fn stats(&self) -> Result<SaleStats, AppError> {
        let repo = SaleRepository::new(self.db);

        Ok(SaleStats {
            by_status: repo.count_by_status().await?,
            revenue: repo.paid_revenue_by_currency().await?,
        })
    }
}

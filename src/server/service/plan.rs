use sea_orm::{DatabaseConnection, SqlErr};

use crate::server::{
    data::plan::PlanRepository,
    error::AppError,
    model::{
        plan::{CreatePlanParam, Plan, UpdatePlanParam},
        subscription::MAX_VIP_DAYS,
    },
};

pub struct PlanService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PlanService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Plans currently offered for sale, cheapest first.
    pub async fn list_active(&self) -> Result<Vec<Plan>, AppError> {
        Ok(PlanRepository::new(self.db).get_active().await?)
    }

    /// Every plan including retired ones, for the manager.
    pub async fn list_all(&self) -> Result<Vec<Plan>, AppError> {
        Ok(PlanRepository::new(self.db).get_all().await?)
    }

    pub async fn get(&self, id: i32) -> Result<Plan, AppError> {
        PlanRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))
    }

    /// Creates a new plan.
    ///
    /// # Returns
    /// - `Ok(Plan)` - The created, active plan
    /// - `Err(AppError::BadRequest)` - Invalid code, name, price, currency or duration
    /// - `Err(AppError::Conflict)` - Code already used by another plan
    pub async fn create(&self, param: CreatePlanParam) -> Result<Plan, AppError> {
        if param.code.is_empty()
            || !param
                .code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AppError::BadRequest(
                "Plan code may only contain letters, digits, '-' and '_'".to_string(),
            ));
        }
        if param.currency.len() != 3 || !param.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(AppError::BadRequest(
                "Currency must be a three-letter ISO code".to_string(),
            ));
        }
        validate_terms(&param.name, param.price_cents, param.duration_days)?;

        let repo = PlanRepository::new(self.db);
        if repo.find_by_code(&param.code).await?.is_some() {
            return Err(AppError::Conflict("Plan code already exists".to_string()));
        }

        match repo.create(param).await {
            Ok(plan) => {
                tracing::info!(plan_id = plan.id, code = %plan.code, "Plan created");
                Ok(plan)
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::Conflict("Plan code already exists".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Updates a plan's commercial terms. Code and currency are immutable since sales
    /// reference them.
    pub async fn update(&self, param: UpdatePlanParam) -> Result<Plan, AppError> {
        validate_terms(&param.name, param.price_cents, param.duration_days)?;

        PlanRepository::new(self.db)
            .update(param)
            .await?
            .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))
    }
}

fn validate_terms(name: &str, price_cents: i64, duration_days: i32) -> Result<(), AppError> {
    if name.is_empty() {
        return Err(AppError::BadRequest("Plan name is required".to_string()));
    }
    if price_cents <= 0 {
        return Err(AppError::BadRequest("Price must be positive".to_string()));
    }
    if duration_days <= 0 || duration_days > MAX_VIP_DAYS {
        return Err(AppError::BadRequest(format!(
            "Duration must be between 1 and {} days",
            MAX_VIP_DAYS
        )));
    }
    Ok(())
}

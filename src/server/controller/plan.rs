use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        plan::{CreatePlanDto, PlanDto, UpdatePlanDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::plan::{CreatePlanParam, Plan, UpdatePlanParam},
        service::plan::PlanService,
        state::AppState,
    },
};

/// Tag for grouping plan endpoints in OpenAPI documentation
pub static PLAN_TAG: &str = "plan";

/// List plans that can be purchased.
///
/// Public endpoint, no authentication required.
#[utoipa::path(
    get,
    path = "/api/plans",
    tag = PLAN_TAG,
    responses(
        (status = 200, description = "Active plans", body = Vec<PlanDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_active_plans(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let plans = PlanService::new(&state.db).list_active().await?;

    Ok((
        StatusCode::OK,
        Json(plans.into_iter().map(Plan::into_dto).collect::<Vec<_>>()),
    ))
}

/// List every plan, including inactive ones.
///
/// # Access Control
/// - `Admin` - Only admins can see inactive plans
#[utoipa::path(
    get,
    path = "/api/admin/plans",
    tag = PLAN_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All plans", body = Vec<PlanDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_all_plans(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let plans = PlanService::new(&state.db).list_all().await?;

    Ok((
        StatusCode::OK,
        Json(plans.into_iter().map(Plan::into_dto).collect::<Vec<_>>()),
    ))
}

/// Create a plan.
///
/// # Access Control
/// - `Admin` - Only admins can create plans
///
/// # Returns
/// - `201 Created` - The new plan
/// - `400 Bad Request` - Invalid code, currency, price or duration
/// - `409 Conflict` - Plan code already exists
#[utoipa::path(
    post,
    path = "/api/admin/plans",
    tag = PLAN_TAG,
    security(("bearer" = [])),
    request_body = CreatePlanDto,
    responses(
        (status = 201, description = "Plan created", body = PlanDto),
        (status = 400, description = "Invalid plan data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 409, description = "Plan code already exists", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePlanDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let plan = PlanService::new(&state.db)
        .create(CreatePlanParam::from_dto(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(plan.into_dto())))
}

/// Get a plan by ID.
///
/// # Access Control
/// - `Admin` - Only admins can read inactive plans by id
#[utoipa::path(
    get,
    path = "/api/admin/plans/{plan_id}",
    tag = PLAN_TAG,
    security(("bearer" = [])),
    params(
        ("plan_id" = i32, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "The plan", body = PlanDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "Plan not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plan_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let plan = PlanService::new(&state.db).get(plan_id).await?;

    Ok((StatusCode::OK, Json(plan.into_dto())))
}

/// Update a plan.
///
/// Code and currency are fixed once a plan exists; deactivating a plan stops new
/// checkouts without touching existing subscriptions.
///
/// # Access Control
/// - `Admin` - Only admins can update plans
#[utoipa::path(
    put,
    path = "/api/admin/plans/{plan_id}",
    tag = PLAN_TAG,
    security(("bearer" = [])),
    params(
        ("plan_id" = i32, Path, description = "Plan ID")
    ),
    request_body = UpdatePlanDto,
    responses(
        (status = 200, description = "Plan updated", body = PlanDto),
        (status = 400, description = "Invalid plan data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "Plan not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(plan_id): Path<i32>,
    Json(payload): Json<UpdatePlanDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let plan = PlanService::new(&state.db)
        .update(UpdatePlanParam::from_dto(plan_id, payload))
        .await?;

    Ok((StatusCode::OK, Json(plan.into_dto())))
}

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::SaleStatus;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, PaginatedDto},
        sale::{CheckoutDto, CheckoutResponseDto, SaleDto, SaleStatsDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::sale::Sale,
        service::sale::SaleService,
        state::AppState,
        util::parse::page_param,
    },
};

/// Tag for grouping sale endpoints in OpenAPI documentation
pub static SALE_TAG: &str = "sale";

/// Filter and pagination for the admin sale listing.
#[derive(Deserialize, IntoParams)]
pub struct SaleListQuery {
    /// Only sales in this status (pending, paid, failed, refunded)
    #[param(value_type = Option<String>)]
    pub status: Option<SaleStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

fn sale_service(state: &AppState) -> SaleService<'_> {
    SaleService::new(&state.db, state.payment_gateway.as_ref(), &state.config)
}

/// Start the purchase of a plan.
///
/// Creates a pending sale and a checkout session at the payment provider. The
/// subscription is only activated once the provider confirms payment through the
/// webhook.
///
/// # Returns
/// - `201 Created` - Sale id, reference and the URL to send the buyer to
/// - `403 Forbidden` - Email not verified yet
/// - `404 Not Found` - Unknown or inactive plan
/// - `502 Bad Gateway` - The payment provider rejected the request
#[utoipa::path(
    post,
    path = "/api/checkout",
    tag = SALE_TAG,
    security(("bearer" = [])),
    request_body = CheckoutDto,
    responses(
        (status = 201, description = "Checkout session created", body = CheckoutResponseDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Email not verified", body = ErrorDto),
        (status = 404, description = "Plan not found", body = ErrorDto),
        (status = 502, description = "Payment provider error", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CheckoutDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let checkout = sale_service(&state)
        .checkout(&user, &payload.plan_code)
        .await?;

    Ok((StatusCode::CREATED, Json(checkout.into_dto())))
}

/// List all sales, newest first.
///
/// # Access Control
/// - `Admin` - Only admins can see every sale
#[utoipa::path(
    get,
    path = "/api/admin/sales",
    tag = SALE_TAG,
    security(("bearer" = [])),
    params(SaleListQuery),
    responses(
        (status = 200, description = "Sales", body = PaginatedDto<SaleDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_sales(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SaleListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let sales = sale_service(&state)
        .list(query.status, page_param(query.page, query.per_page))
        .await?;

    Ok((StatusCode::OK, Json(sales.into_dto(Sale::into_dto))))
}

/// Sale counts per status and paid revenue per currency.
///
/// # Access Control
/// - `Admin` - Only admins can see sale statistics
#[utoipa::path(
    get,
    path = "/api/admin/sales/stats",
    tag = SALE_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Sale statistics", body = SaleStatsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_sale_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let stats = sale_service(&state).stats().await?;

    Ok((StatusCode::OK, Json(stats.into_dto())))
}

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::{
    model::{
        api::{ErrorDto, PaginatedDto},
        sale::SaleDto,
        user::ProfileDto,
    },
    server::{
        controller::PageQuery,
        error::AppError,
        middleware::auth::AuthGuard,
        model::sale::Sale,
        service::{auth::AuthService, sale::SaleService},
        state::AppState,
    },
};

/// Tag for grouping profile endpoints in OpenAPI documentation
pub static USER_TAG: &str = "user";

/// GET /api/me - Profile of the authenticated user
///
/// Returns the account together with its tier and current subscription, if any.
///
/// # Authentication
/// Requires user to be logged in (no admin permission required)
#[utoipa::path(
    get,
    path = "/api/me",
    tag = USER_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile of the caller", body = ProfileDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let (user, subscription) =
        AuthService::new(&state.db, &state.config, &state.jwt, &state.mailer)
            .me(user.id)
            .await?;

    let now = Utc::now();
    let profile = ProfileDto {
        user: user.into_dto(),
        subscription: subscription.map(|s| s.into_dto(now)),
    };

    Ok((StatusCode::OK, Json(profile)))
}

/// GET /api/me/sales - Purchases of the authenticated user, newest first
#[utoipa::path(
    get,
    path = "/api/me/sales",
    tag = USER_TAG,
    security(("bearer" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Sales of the caller", body = PaginatedDto<SaleDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_own_sales(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let sales = SaleService::new(&state.db, state.payment_gateway.as_ref(), &state.config)
        .list_for_user(user.id, query.into_param())
        .await?;

    Ok((StatusCode::OK, Json(sales.into_dto(Sale::into_dto))))
}

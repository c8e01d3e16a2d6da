use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::UserTier;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, PaginatedDto},
        signal::{CreateSignalDto, SettleSignalDto, SignalDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::signal::SignalParam,
        service::signal::SignalService,
        state::AppState,
        util::parse::page_param,
    },
};

/// Tag for grouping signal endpoints in OpenAPI documentation
pub static SIGNAL_TAG: &str = "signal";

/// Filter and pagination for the signal feed.
#[derive(Deserialize, IntoParams)]
pub struct SignalListQuery {
    /// Only signals of this tier (free, vip)
    #[param(value_type = Option<String>)]
    pub tier: Option<UserTier>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// List signals, newest first.
///
/// VIP signals are included for every caller, but their pick, odds, stake and
/// analysis are only shown to VIP members and admins.
///
/// # Access Control
/// - Any authenticated user
#[utoipa::path(
    get,
    path = "/api/signals",
    tag = SIGNAL_TAG,
    security(("bearer" = [])),
    params(SignalListQuery),
    responses(
        (status = 200, description = "Signals", body = PaginatedDto<SignalDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_signals(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SignalListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let can_view_vip = user.can_view_vip();
    let signals = SignalService::new(&state.db, &state.signal_hub)
        .list(query.tier, page_param(query.page, query.per_page))
        .await?;

    Ok((
        StatusCode::OK,
        Json(signals.into_dto(|signal| signal.into_dto(can_view_vip))),
    ))
}

/// Get a signal by ID, redacted like the list.
#[utoipa::path(
    get,
    path = "/api/signals/{signal_id}",
    tag = SIGNAL_TAG,
    security(("bearer" = [])),
    params(
        ("signal_id" = i32, Path, description = "Signal ID")
    ),
    responses(
        (status = 200, description = "The signal", body = SignalDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Signal not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_signal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(signal_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let signal = SignalService::new(&state.db, &state.signal_hub)
        .get(signal_id)
        .await?;

    Ok((StatusCode::OK, Json(signal.into_dto(user.can_view_vip()))))
}

/// Publish a signal and push it to connected WebSocket clients.
///
/// # Access Control
/// - `Admin` - Only admins can publish signals
#[utoipa::path(
    post,
    path = "/api/admin/signals",
    tag = SIGNAL_TAG,
    security(("bearer" = [])),
    request_body = CreateSignalDto,
    responses(
        (status = 201, description = "Signal created", body = SignalDto),
        (status = 400, description = "Invalid signal data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_signal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateSignalDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let signal = SignalService::new(&state.db, &state.signal_hub)
        .create(&user, SignalParam::from_dto(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(signal.into_dto(true))))
}

/// Replace the content of a signal. The recorded result is kept.
///
/// # Access Control
/// - `Admin` - Only admins can edit signals
#[utoipa::path(
    put,
    path = "/api/admin/signals/{signal_id}",
    tag = SIGNAL_TAG,
    security(("bearer" = [])),
    params(
        ("signal_id" = i32, Path, description = "Signal ID")
    ),
    request_body = CreateSignalDto,
    responses(
        (status = 200, description = "Signal updated", body = SignalDto),
        (status = 400, description = "Invalid signal data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "Signal not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_signal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(signal_id): Path<i32>,
    Json(payload): Json<CreateSignalDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let signal = SignalService::new(&state.db, &state.signal_hub)
        .update(signal_id, SignalParam::from_dto(payload))
        .await?;

    Ok((StatusCode::OK, Json(signal.into_dto(true))))
}

/// Record the outcome of a signal.
///
/// # Access Control
/// - `Admin` - Only admins can settle signals
#[utoipa::path(
    post,
    path = "/api/admin/signals/{signal_id}/settle",
    tag = SIGNAL_TAG,
    security(("bearer" = [])),
    params(
        ("signal_id" = i32, Path, description = "Signal ID")
    ),
    request_body = SettleSignalDto,
    responses(
        (status = 200, description = "Signal settled", body = SignalDto),
        (status = 400, description = "Result can not be pending", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "Signal not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn settle_signal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(signal_id): Path<i32>,
    Json(payload): Json<SettleSignalDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    let signal = SignalService::new(&state.db, &state.signal_hub)
        .settle(signal_id, payload.result)
        .await?;

    Ok((StatusCode::OK, Json(signal.into_dto(true))))
}

/// Delete a signal.
///
/// # Access Control
/// - `Admin` - Only admins can delete signals
#[utoipa::path(
    delete,
    path = "/api/admin/signals/{signal_id}",
    tag = SIGNAL_TAG,
    security(("bearer" = [])),
    params(
        ("signal_id" = i32, Path, description = "Signal ID")
    ),
    responses(
        (status = 204, description = "Signal deleted"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "Signal not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_signal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(signal_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[Permission::Admin])
        .await?;

    SignalService::new(&state.db, &state.signal_hub)
        .delete(signal_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

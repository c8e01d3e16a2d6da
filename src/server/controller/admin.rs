//! Manager endpoints for users, subscriptions and the webhook queue.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use entity::sea_orm_active_enums::WebhookStatus;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, PaginatedDto},
        subscription::SubscriptionDto,
        user::{GrantVipDto, SetRoleDto, UserDto},
        webhook::{ProcessSummaryDto, WebhookEventDto},
    },
    server::{
        controller::PageQuery,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{user::User, webhook::WebhookEvent},
        service::{
            subscription::SubscriptionService, user::UserService, webhook::WebhookService,
        },
        state::AppState,
        util::parse::page_param,
    },
};

/// Tag for grouping manager endpoints in OpenAPI documentation
pub static ADMIN_TAG: &str = "admin";

/// Filter and pagination for the webhook queue listing.
#[derive(Deserialize, IntoParams)]
pub struct WebhookListQuery {
    /// Only events in this status (pending, processed, ignored, failed)
    #[param(value_type = Option<String>)]
    pub status: Option<WebhookStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    AuthGuard::new(&state.db, &state.jwt, headers)
        .require(&[Permission::Admin])
        .await
}

/// List all users.
///
/// # Access Control
/// - `Admin` - Only admins can list users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    security(("bearer" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Users", body = PaginatedDto<UserDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = require_admin(&state, &headers).await?;

    let users = UserService::new(&state.db)
        .list(query.into_param())
        .await?;

    Ok((StatusCode::OK, Json(users.into_dto(User::into_dto))))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}",
    tag = ADMIN_TAG,
    security(("bearer" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user", body = UserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = require_admin(&state, &headers).await?;

    let user = UserService::new(&state.db).get(user_id).await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Change a user's role.
///
/// # Access Control
/// - `Admin` - Admins can not demote themselves
#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}/role",
    tag = ADMIN_TAG,
    security(("bearer" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = SetRoleDto,
    responses(
        (status = 200, description = "Role changed", body = UserDto),
        (status = 400, description = "Admin tried to demote themselves", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn set_user_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i32>,
    Json(payload): Json<SetRoleDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = require_admin(&state, &headers).await?;

    let user = UserService::new(&state.db)
        .set_role(&actor, user_id, payload.role)
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Grant VIP access for a number of days without a sale.
///
/// Extends a running subscription, otherwise starts a new one now.
#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/vip",
    tag = ADMIN_TAG,
    security(("bearer" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = GrantVipDto,
    responses(
        (status = 200, description = "VIP granted", body = SubscriptionDto),
        (status = 400, description = "Days must be positive", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn grant_vip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i32>,
    Json(payload): Json<GrantVipDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = require_admin(&state, &headers).await?;

    let subscription = UserService::new(&state.db)
        .grant_vip(user_id, payload.days)
        .await?;

    Ok((StatusCode::OK, Json(subscription.into_dto(Utc::now()))))
}

/// Revoke VIP access immediately.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}/vip",
    tag = ADMIN_TAG,
    security(("bearer" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "VIP revoked", body = UserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn revoke_vip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = require_admin(&state, &headers).await?;

    let user = UserService::new(&state.db).revoke_vip(user_id).await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Get a user's subscription, including expired and cancelled ones.
#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}/subscription",
    tag = ADMIN_TAG,
    security(("bearer" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The subscription", body = SubscriptionDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "User has no subscription", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = require_admin(&state, &headers).await?;

    let subscription = SubscriptionService::new(&state.db)
        .current(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User has no subscription".to_string()))?;

    Ok((StatusCode::OK, Json(subscription.into_dto(Utc::now()))))
}

/// Cancel a user's active subscription and downgrade them to the free tier.
#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/subscription/cancel",
    tag = ADMIN_TAG,
    security(("bearer" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Subscription cancelled", body = SubscriptionDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "No active subscription", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel_user_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = require_admin(&state, &headers).await?;

    let subscription = SubscriptionService::new(&state.db).cancel(user_id).await?;

    Ok((StatusCode::OK, Json(subscription.into_dto(Utc::now()))))
}

/// List queued payment notifications.
#[utoipa::path(
    get,
    path = "/api/admin/webhooks",
    tag = ADMIN_TAG,
    security(("bearer" = [])),
    params(WebhookListQuery),
    responses(
        (status = 200, description = "Webhook events", body = PaginatedDto<WebhookEventDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_webhook_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WebhookListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = require_admin(&state, &headers).await?;

    let events = WebhookService::new(&state.db, state.payment_gateway.as_ref())
        .list(query.status, page_param(query.page, query.per_page))
        .await?;

    Ok((StatusCode::OK, Json(events.into_dto(WebhookEvent::into_dto))))
}

/// Put a failed notification back in the queue.
#[utoipa::path(
    post,
    path = "/api/admin/webhooks/{event_id}/retry",
    tag = ADMIN_TAG,
    security(("bearer" = [])),
    params(
        ("event_id" = i32, Path, description = "Webhook event ID")
    ),
    responses(
        (status = 200, description = "Event requeued", body = WebhookEventDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 409, description = "Event is not failed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn retry_webhook_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = require_admin(&state, &headers).await?;

    let event = WebhookService::new(&state.db, state.payment_gateway.as_ref())
        .retry(event_id)
        .await?;

    Ok((StatusCode::OK, Json(event.into_dto())))
}

/// Run one reconciliation pass over the pending queue now instead of waiting for the
/// scheduler.
#[utoipa::path(
    post,
    path = "/api/admin/webhooks/process",
    tag = ADMIN_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Pass finished", body = ProcessSummaryDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn process_webhook_events(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = require_admin(&state, &headers).await?;

    let summary = WebhookService::new(&state.db, state.payment_gateway.as_ref())
        .process_webhook_events()
        .await?;

    Ok((StatusCode::OK, Json(summary.into_dto())))
}

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::api::{ErrorDto, MessageDto},
    server::{
        error::AppError,
        service::webhook::{ReceiveOutcome, WebhookService},
        state::AppState,
    },
};

/// Tag for grouping webhook endpoints in OpenAPI documentation
pub static WEBHOOK_TAG: &str = "webhook";

/// Header carrying the hex HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Receive a payment notification.
///
/// The notification is only queued here; the scheduler reconciles it with the
/// provider afterwards. Duplicate deliveries are acknowledged without being stored
/// again so the provider stops retrying.
///
/// # Returns
/// - `200 OK` - Notification queued or already known
/// - `400 Bad Request` - Body is not a notification
/// - `401 Unauthorized` - Missing or wrong signature
#[utoipa::path(
    post,
    path = "/api/webhooks/payment",
    tag = WEBHOOK_TAG,
    request_body(content = String, content_type = "application/json"),
    params(
        ("x-signature" = Option<String>, Header, description = "Hex HMAC-SHA256 of the body")
    ),
    responses(
        (status = 200, description = "Notification accepted", body = MessageDto),
        (status = 400, description = "Malformed notification", body = ErrorDto),
        (status = 401, description = "Invalid signature", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn receive_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = WebhookService::new(&state.db, state.payment_gateway.as_ref())
        .receive(
            state.config.payment_webhook_secret.as_deref(),
            signature,
            &body,
        )
        .await?;

    let message = match outcome {
        ReceiveOutcome::Queued(_) => "Notification queued",
        ReceiveOutcome::Duplicate => "Notification already received",
    };

    Ok((StatusCode::OK, Json(MessageDto::new(message))))
}

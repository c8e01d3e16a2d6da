use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No `Authorization: Bearer` header on a protected endpoint.
    #[error("Missing bearer token")]
    MissingToken,

    /// The access token failed signature, expiry or claim validation.
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    /// The token is valid but its subject no longer exists.
    #[error("User {0} from access token not found in database")]
    UserNotInDatabase(i32),

    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Login attempted before confirming the email address.
    #[error("Email address of user {0} is not verified")]
    EmailNotVerified(i32),

    /// Registration with an email that is already taken.
    #[error("Email already registered")]
    EmailTaken,

    /// User lacks the permission the endpoint requires.
    ///
    /// # Fields
    /// - User ID
    /// - Description of the denied action, only logged
    #[error("Access denied for user {0}: {1}")]
    AccessDenied(i32, String),

    /// Unknown, expired or revoked refresh token.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// A refresh token that was already rotated has been presented again.
    #[error("Refresh token reuse detected for user {0}")]
    RefreshTokenReuse(i32),

    /// Unknown, used or expired email verification / password reset token.
    #[error("Invalid or expired token")]
    InvalidEmailToken,

    /// Wrong or expired one-time admin code.
    #[error("Invalid admin code")]
    InvalidAdminCode,

    /// Webhook body signature did not match.
    #[error("Invalid webhook signature")]
    InvalidSignature,
}

/// Converts authentication errors into HTTP responses.
///
/// Client-facing messages stay generic; the detailed variant is logged at debug level.
///
/// # Returns
/// - 401 Unauthorized - Missing/invalid tokens, bad credentials, bad signatures
/// - 403 Forbidden - Unverified email, missing permissions, bad admin code
/// - 409 Conflict - Email already registered
/// - 400 Bad Request - Invalid email verification / reset token
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::MissingToken | Self::InvalidToken(_) | Self::UserNotInDatabase(_) => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid email or password"),
            Self::InvalidRefreshToken | Self::RefreshTokenReuse(_) => {
                (StatusCode::UNAUTHORIZED, "Session expired, please log in again")
            }
            Self::InvalidSignature => (StatusCode::UNAUTHORIZED, "Invalid signature"),
            Self::EmailNotVerified(_) => (
                StatusCode::FORBIDDEN,
                "Please verify your email address before logging in",
            ),
            Self::AccessDenied(_, _) => (StatusCode::FORBIDDEN, "Access denied"),
            Self::InvalidAdminCode => (StatusCode::FORBIDDEN, "Invalid admin code"),
            Self::EmailTaken => (StatusCode::CONFLICT, "Email already registered"),
            Self::InvalidEmailToken => (StatusCode::BAD_REQUEST, "Invalid or expired token"),
        };

        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

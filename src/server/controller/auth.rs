use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        auth::{
            ClaimAdminDto, EmailDto, LoginDto, RefreshTokenDto, RegisterDto, ResetPasswordDto,
            TokenPairDto, VerifyEmailDto,
        },
        user::UserDto,
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::user::RegisterParam,
        service::auth::AuthService,
        state::AppState,
    },
};

/// Tag for grouping auth endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(&state.db, &state.config, &state.jwt, &state.mailer)
}

/// Register a new account.
///
/// Creates an unverified free-tier account and mails a verification link.
///
/// # Returns
/// - `201 Created` - The new account
/// - `400 Bad Request` - Invalid email, empty name or bad password length
/// - `409 Conflict` - Email already registered
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = UserDto),
        (status = 400, description = "Invalid registration data", body = ErrorDto),
        (status = 409, description = "Email already registered", body = ErrorDto),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth_service(&state)
        .register(RegisterParam::from_dto(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(user.into_dto())))
}

/// Confirm an email address.
///
/// # Returns
/// - `200 OK` - The verified account
/// - `400 Bad Request` - Unknown, used or expired token
#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    tag = AUTH_TAG,
    request_body = VerifyEmailDto,
    responses(
        (status = 200, description = "Email verified", body = UserDto),
        (status = 400, description = "Invalid or expired token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth_service(&state).verify_email(&payload.token).await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Mail a new verification link.
///
/// Always answers 200 so the endpoint can not be used to discover accounts.
#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    tag = AUTH_TAG,
    request_body = EmailDto,
    responses(
        (status = 200, description = "Request accepted", body = MessageDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<EmailDto>,
) -> Result<impl IntoResponse, AppError> {
    auth_service(&state)
        .resend_verification(&payload.email)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new(
            "If the account exists and is unverified, a new link has been sent",
        )),
    ))
}

/// Log in with email and password.
///
/// # Returns
/// - `200 OK` - Access and refresh token
/// - `401 Unauthorized` - Unknown email or wrong password
/// - `403 Forbidden` - Email not verified yet
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = TokenPairDto),
        (status = 401, description = "Invalid email or password", body = ErrorDto),
        (status = 403, description = "Email not verified", body = ErrorDto),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, AppError> {
    let pair = auth_service(&state)
        .login(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(pair.into_dto())))
}

/// Rotate a refresh token.
///
/// The presented refresh token is revoked. Presenting it again revokes every session of
/// the account.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = AUTH_TAG,
    request_body = RefreshTokenDto,
    responses(
        (status = 200, description = "New token pair", body = TokenPairDto),
        (status = 401, description = "Invalid, expired or reused refresh token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenDto>,
) -> Result<impl IntoResponse, AppError> {
    let pair = auth_service(&state).refresh(&payload.refresh_token).await?;

    Ok((StatusCode::OK, Json(pair.into_dto())))
}

/// Revoke a refresh token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    request_body = RefreshTokenDto,
    responses(
        (status = 204, description = "Logged out"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenDto>,
) -> Result<impl IntoResponse, AppError> {
    auth_service(&state).logout(&payload.refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Mail a password reset link.
///
/// Always answers 200 so the endpoint can not be used to discover accounts.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = AUTH_TAG,
    request_body = EmailDto,
    responses(
        (status = 200, description = "Request accepted", body = MessageDto),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<EmailDto>,
) -> Result<impl IntoResponse, AppError> {
    auth_service(&state).forgot_password(&payload.email).await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto::new(
            "If the account exists, a password reset link has been sent",
        )),
    ))
}

/// Set a new password with a reset token.
///
/// Ends every existing session of the account.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = AUTH_TAG,
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageDto),
        (status = 400, description = "Invalid token or password", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordDto>,
) -> Result<impl IntoResponse, AppError> {
    auth_service(&state)
        .reset_password(&payload.token, payload.new_password)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Password changed"))))
}

/// Claim the admin role with the one-time startup code.
///
/// # Access Control
/// - Any authenticated user
///
/// # Returns
/// - `200 OK` - The caller, now an admin
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Wrong, expired or used code
#[utoipa::path(
    post,
    path = "/api/auth/claim-admin",
    tag = AUTH_TAG,
    request_body = ClaimAdminDto,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Admin role granted", body = UserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Invalid admin code", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn claim_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ClaimAdminDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.jwt, &headers)
        .require(&[])
        .await?;

    let admin = auth_service(&state)
        .claim_admin(&user, &payload.code, &state.admin_code_service)
        .await?;

    Ok((StatusCode::OK, Json(admin.into_dto())))
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct RegisterDto {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

/// Access/refresh token pair returned by login and refresh.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct TokenPairDto {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct RefreshTokenDto {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct VerifyEmailDto {
    pub token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct EmailDto {
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ResetPasswordDto {
    pub token: String,
    pub new_password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ClaimAdminDto {
    pub code: String,
}

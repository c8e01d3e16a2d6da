use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use chrono::Utc;
use entity::sea_orm_active_enums::{UserRole, UserTier};

use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::auth::{bearer_token, strip_bearer, AuthGuard, Permission},
    model::user::User,
    service::auth::jwt::JwtKeys,
};
use test_utils::{builder::TestBuilder, factory};

mod bearer;
mod require;

fn keys() -> JwtKeys {
    JwtKeys::from_secret("middleware-test-secret", chrono::Duration::minutes(15))
}

/// Headers carrying a freshly issued access token for `user`.
fn headers_for(keys: &JwtKeys, user: entity::user::Model) -> HeaderMap {
    let token = keys.issue(&User::from_entity(user), Utc::now()).unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

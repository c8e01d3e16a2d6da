use axum::http::{header::AUTHORIZATION, HeaderMap};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    model::user::User,
    service::auth::jwt::{Claims, JwtKeys},
};

pub enum Permission {
    Admin,
}

pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    jwt: &'a JwtKeys,
    headers: &'a HeaderMap,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, jwt: &'a JwtKeys, headers: &'a HeaderMap) -> Self {
        Self { db, jwt, headers }
    }

    /// Authenticates the bearer token and checks every permission.
    ///
    /// The user is reloaded from the database so role or tier changes apply before the
    /// access token expires.
    ///
    /// # Returns
    /// - `Ok(User)` - Authenticated user holding all permissions
    /// - `Err(AuthError::MissingToken)` - No bearer token
    /// - `Err(AuthError::InvalidToken)` - Bad signature, expired or malformed claims
    /// - `Err(AuthError::AccessDenied)` - A permission is missing
    pub async fn require(&self, permissions: &[Permission]) -> Result<User, AppError> {
        let token = bearer_token(self.headers).ok_or(AuthError::MissingToken)?;
        let user = authenticate(self.db, self.jwt, token).await?;

        for permission in permissions {
            match permission {
                Permission::Admin => {
                    if !user.is_admin() {
                        return Err(AuthError::AccessDenied(
                            user.id,
                            "User attempted an admin action without the admin role".to_string(),
                        )
                        .into());
                    }
                }
            }
        }

        Ok(user)
    }
}

/// Resolves an access token to its user.
///
/// Shared by the REST guard and the STOMP `CONNECT` handshake.
pub async fn authenticate(
    db: &DatabaseConnection,
    jwt: &JwtKeys,
    token: &str,
) -> Result<User, AppError> {
    let claims = jwt.verify(token)?;
    load_user(db, &claims).await
}

/// Loads the current state of the user a verified token belongs to.
pub async fn load_user(db: &DatabaseConnection, claims: &Claims) -> Result<User, AppError> {
    let user_id = claims.user_id()?;

    let user = UserRepository::new(db)
        .find_by_id(user_id)
        .await?
        .ok_or(AuthError::UserNotInDatabase(user_id))?;

    Ok(user)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(strip_bearer)
}

/// Strips a case-insensitive `Bearer ` prefix; empty tokens are rejected.
pub fn strip_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

//! Route table and OpenAPI document.
//!
//! Routes are registered through `utoipa_axum` so every handler's `utoipa::path`
//! annotation ends up in the document served by Swagger UI at `/api/docs`.

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    config::Config,
    controller::{admin, auth, plan, sale, signal, user, webhook},
    error::{config::ConfigError, AppError},
    middleware::rate_limit::{standard_layer, strict_layer},
    state::AppState,
    ws::ws_handler,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chamagol API",
        description = "Sports tips with free and VIP tiers"
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Accounts, sessions and recovery"),
        (name = "user", description = "The authenticated user's profile"),
        (name = "plan", description = "Subscription plans"),
        (name = "sale", description = "Checkout and sales"),
        (name = "signal", description = "Betting signals"),
        (name = "webhook", description = "Payment provider notifications"),
        (name = "admin", description = "User, subscription and queue management")
    )
)]
struct ApiDoc;

/// Registers the `bearer` scheme referenced by `security(("bearer" = []))`.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi
            .components
            .get_or_insert_with(Default::default)
            .add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
    }
}

/// Builds the application router.
///
/// `/api/auth/*` is limited with the strict tier and the rest of `/api` with the
/// standard tier. The payment webhook, the WebSocket endpoint and the docs are not
/// rate limited.
///
/// # Returns
/// - `Ok(Router)` - Router waiting for `with_state`
/// - `Err(AppError)` - Invalid rate limit or CORS origin in the configuration
pub fn router(config: &Config) -> Result<Router<AppState>, AppError> {
    let auth_routes = OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::verify_email))
        .routes(routes!(auth::resend_verification))
        .routes(routes!(auth::login))
        .routes(routes!(auth::refresh))
        .routes(routes!(auth::logout))
        .routes(routes!(auth::forgot_password))
        .routes(routes!(auth::reset_password))
        .routes(routes!(auth::claim_admin))
        .layer(strict_layer(config.rate_limit_auth_rpm)?);

    let api_routes = OpenApiRouter::new()
        .routes(routes!(user::get_profile))
        .routes(routes!(user::get_own_sales))
        .routes(routes!(plan::get_active_plans))
        .routes(routes!(plan::get_all_plans, plan::create_plan))
        .routes(routes!(plan::get_plan, plan::update_plan))
        .routes(routes!(sale::checkout))
        .routes(routes!(sale::get_sales))
        .routes(routes!(sale::get_sale_stats))
        .routes(routes!(signal::get_signals))
        .routes(routes!(signal::get_signal))
        .routes(routes!(signal::create_signal))
        .routes(routes!(signal::update_signal, signal::delete_signal))
        .routes(routes!(signal::settle_signal))
        .routes(routes!(admin::get_users))
        .routes(routes!(admin::get_user))
        .routes(routes!(admin::set_user_role))
        .routes(routes!(admin::grant_vip, admin::revoke_vip))
        .routes(routes!(admin::get_user_subscription))
        .routes(routes!(admin::cancel_user_subscription))
        .routes(routes!(admin::get_webhook_events))
        .routes(routes!(admin::retry_webhook_event))
        .routes(routes!(admin::process_webhook_events))
        .layer(standard_layer(config.rate_limit_api_rpm)?);

    let webhook_routes =
        OpenApiRouter::new().routes(routes!(webhook::receive_payment_webhook));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(auth_routes)
        .merge(api_routes)
        .merge(webhook_routes)
        .split_for_parts();

    Ok(router
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins)?))
}

/// Any origin when none are configured, otherwise only the listed ones.
fn cors_layer(origins: &[String]) -> Result<CorsLayer, AppError> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
                    name: "CORS_ORIGINS".to_string(),
                    value: origin.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_router_with_default_config() {
        assert!(router(&Config::for_tests()).is_ok());
    }

    #[test]
    fn rejects_invalid_cors_origin() {
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
        assert!(cors_layer(&["https://chamagol.example".to_string()]).is_ok());
    }

    #[test]
    fn documents_every_tag_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
        assert_eq!(doc.tags.map(|tags| tags.len()), Some(7));
    }
}

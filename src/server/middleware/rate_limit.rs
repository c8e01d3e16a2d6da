//! Per-IP rate limiting for the HTTP API.
//!
//! Tiers:
//! - Strict: `/api/auth/*`, password guessing and mail sending
//! - Standard: the rest of `/api`
//!
//! Limits come from `RATE_LIMIT_AUTH_RPM` and `RATE_LIMIT_API_RPM`. The peer address is
//! taken from `ConnectInfo`, so the server must be started with
//! `into_make_service_with_connect_info::<SocketAddr>()`.

use std::sync::Arc;
use std::time::Duration;

use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;

use crate::server::error::AppError;

/// Rate limiter layer type alias using governor types directly
pub type RateLimitLayer = GovernorLayer<
    tower_governor::key_extractor::PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    axum::body::Body,
>;

/// Token bucket refilling one request every `60 / rpm` seconds with a burst of `rpm`.
fn create_layer(requests_per_minute: u32) -> Result<RateLimitLayer, AppError> {
    let refill = Duration::from_millis(60_000 / u64::from(requests_per_minute.max(1)));

    let config = GovernorConfigBuilder::default()
        .period(refill.max(Duration::from_millis(1)))
        .burst_size(requests_per_minute.max(1))
        .finish()
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "Invalid rate limit of {} requests per minute",
                requests_per_minute
            ))
        })?;

    Ok(GovernorLayer::new(Arc::new(config)))
}

/// Layer for the authentication endpoints.
pub fn strict_layer(requests_per_minute: u32) -> Result<RateLimitLayer, AppError> {
    create_layer(requests_per_minute)
}

/// Layer for the general API.
pub fn standard_layer(requests_per_minute: u32) -> Result<RateLimitLayer, AppError> {
    create_layer(requests_per_minute)
}

//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - Database connection pool for data persistence
//! - Configuration and JWT keys for authentication
//! - Mailer and payment gateway for outbound calls
//! - Signal hub feeding the WebSocket sessions
//! - Admin code service for bootstrapping the first admin

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config,
    service::{
        admin_code::AdminCodeService, auth::jwt::JwtKeys, mail::Mailer,
        payment::PaymentGateway,
    },
    ws::hub::SignalHub,
};

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone:
/// - `DatabaseConnection` is a connection pool (clones share the pool)
/// - `Arc` fields share one instance
/// - `SignalHub` and `AdminCodeService` wrap their shared state in `Arc`
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    pub config: Arc<Config>,

    /// Keys signing and verifying access tokens.
    pub jwt: Arc<JwtKeys>,

    pub mailer: Arc<Mailer>,

    /// Payment provider used for checkouts and webhook reconciliation.
    ///
    /// A trait object so tests can run the controllers against a fake gateway.
    pub payment_gateway: Arc<dyn PaymentGateway>,

    /// Fan-out of signal changes to connected STOMP sessions.
    pub signal_hub: SignalHub,

    /// Service for managing the one-time admin code.
    pub admin_code_service: AdminCodeService,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `config` - Loaded configuration
    /// - `mailer` - Outbound mail client
    /// - `payment_gateway` - Payment provider client
    /// - `signal_hub` - Broadcast hub for signal events
    /// - `admin_code_service` - Service for managing admin codes
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(
        db: DatabaseConnection,
        config: Config,
        mailer: Mailer,
        payment_gateway: Arc<dyn PaymentGateway>,
        signal_hub: SignalHub,
        admin_code_service: AdminCodeService,
    ) -> Self {
        let jwt = JwtKeys::from_secret(
            &config.jwt_secret,
            chrono::Duration::minutes(config.access_token_ttl_minutes),
        );

        Self {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            mailer: Arc::new(mailer),
            payment_gateway,
            signal_hub,
            admin_code_service,
        }
    }
}

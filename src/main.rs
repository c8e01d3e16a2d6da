mod model;
mod server;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::server::{
    config::Config,
    error::AppError,
    router,
    scheduler,
    service::{
        admin_code::AdminCodeService,
        mail::Mailer,
        payment::{http::HttpPaymentGateway, PaymentGateway},
    },
    startup,
    state::AppState,
    ws::hub::{SignalHub, DEFAULT_HUB_CAPACITY},
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chamagol=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client()?;
    let mailer = Mailer::from_config(&config, http_client.clone());
    let payment_gateway: Arc<dyn PaymentGateway> =
        Arc::new(HttpPaymentGateway::new(http_client, &config));
    let signal_hub = SignalHub::new(DEFAULT_HUB_CAPACITY);

    let admin_code_service =
        AdminCodeService::new(Duration::from_secs(config.admin_code_ttl_seconds));

    // Check for admin users and log a claim code if none exist
    startup::check_for_admin(&db, &config, &admin_code_service).await?;

    // Kept alive for the lifetime of the server
    let _scheduler =
        scheduler::start_scheduler(db.clone(), payment_gateway.clone(), &config).await?;

    let app = router::router(&config)?;
    let bind_addr = config.bind_addr.clone();

    let app = app.with_state(AppState::new(
        db,
        config,
        mailer,
        payment_gateway,
        signal_hub,
        admin_code_service,
    ));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Chamagol listening on {}", bind_addr);

    // Peer addresses feed the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

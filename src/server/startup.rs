use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config, data::user::UserRepository, error::AppError,
    service::admin_code::AdminCodeService,
};

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(Error)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// HTTP client shared by the mailer and the payment gateway.
///
/// Redirects are not followed so a misconfigured provider URL fails loudly instead of
/// leaking the bearer token to another host.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(15))
        .build()?)
}

/// Logs a one-time admin code when no admin account exists yet.
///
/// The first user to post the code to `/api/auth/claim-admin` before it expires
/// becomes admin.
///
/// # Returns
/// - `Ok(())` - An admin exists, or a code was generated and logged
/// - `Err(AppError::DbErr)` - Checking for an admin failed
pub async fn check_for_admin(
    db: &DatabaseConnection,
    config: &Config,
    admin_code_service: &AdminCodeService,
) -> Result<(), AppError> {
    if UserRepository::new(db).admin_exists().await? {
        return Ok(());
    }

    let code = admin_code_service.generate().await;

    tracing::warn!(
        "No admin account found. Register, log in and POST {{\"code\": \"{}\"}} to {}/api/auth/claim-admin within {} seconds",
        code,
        config.app_url,
        config.admin_code_ttl_seconds
    );

    Ok(())
}

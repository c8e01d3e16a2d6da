use std::{fmt::Display, str::FromStr};

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_EMAIL_FROM: &str = "Chamagol <no-reply@chamagol.com>";
const DEFAULT_WEBHOOK_POLL_CRON: &str = "*/30 * * * * *";
const DEFAULT_SUBSCRIPTION_SWEEP_CRON: &str = "0 */5 * * * *";

/// Application configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Public base URL of the frontend, used to build verification and reset links.
    pub app_url: String,
    pub cors_origins: Vec<String>,

    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub email_token_ttl_hours: i64,
    pub password_reset_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    /// Lifetime of the one-time admin code printed at startup.
    pub admin_code_ttl_seconds: u64,

    pub payment_api_url: String,
    pub payment_access_token: String,
    /// Shared secret for webhook signatures; verification is skipped when unset.
    pub payment_webhook_secret: Option<String>,
    /// Sent with each checkout so the gateway knows where to post notifications.
    pub payment_notification_url: Option<String>,

    pub webhook_poll_cron: String,
    pub subscription_sweep_cron: String,

    pub rate_limit_auth_rpm: u32,
    pub rate_limit_api_rpm: u32,

    pub email_api_url: String,
    /// Mail is only logged when no API key is configured.
    pub email_api_key: Option<String>,
    pub email_from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            app_url: required("APP_URL")?.trim_end_matches('/').to_string(),
            cors_origins: optional("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl_minutes: parsed("ACCESS_TOKEN_TTL_MINUTES", 15)?,
            refresh_token_ttl_days: parsed("REFRESH_TOKEN_TTL_DAYS", 30)?,
            email_token_ttl_hours: parsed("EMAIL_TOKEN_TTL_HOURS", 24)?,
            password_reset_ttl_minutes: parsed("PASSWORD_RESET_TTL_MINUTES", 60)?,
            bcrypt_cost: parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            admin_code_ttl_seconds: parsed("ADMIN_CODE_TTL_SECONDS", 60)?,

            payment_api_url: required("PAYMENT_API_URL")?
                .trim_end_matches('/')
                .to_string(),
            payment_access_token: required("PAYMENT_ACCESS_TOKEN")?,
            payment_webhook_secret: optional("PAYMENT_WEBHOOK_SECRET"),
            payment_notification_url: optional("PAYMENT_NOTIFICATION_URL"),

            webhook_poll_cron: optional("WEBHOOK_POLL_CRON")
                .unwrap_or_else(|| DEFAULT_WEBHOOK_POLL_CRON.to_string()),
            subscription_sweep_cron: optional("SUBSCRIPTION_SWEEP_CRON")
                .unwrap_or_else(|| DEFAULT_SUBSCRIPTION_SWEEP_CRON.to_string()),

            rate_limit_auth_rpm: positive("RATE_LIMIT_AUTH_RPM", 10)?,
            rate_limit_api_rpm: positive("RATE_LIMIT_API_RPM", 120)?,

            email_api_url: optional("EMAIL_API_URL")
                .unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
            email_api_key: optional("EMAIL_API_KEY"),
            email_from: optional("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
        })
    }
}

/// Reads a variable that must be present and non-empty.
fn required(name: &str) -> Result<String, ConfigError> {
    optional(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Reads a variable, treating empty values as unset.
fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Reads and parses a variable, falling back to `default` when unset.
fn parsed<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match optional(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue {
                name: name.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            }),
    }
}

/// Like `parsed` but rejects zero, which would disable a rate limiter.
fn positive(name: &str, default: u32) -> Result<u32, ConfigError> {
    let value = parsed(name, default)?;
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
impl Config {
    /// Configuration for unit tests; never reads the environment.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            app_url: "http://localhost:3000".to_string(),
            cors_origins: Vec::new(),
            jwt_secret: "test-secret-with-enough-entropy".to_string(),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_days: 30,
            email_token_ttl_hours: 24,
            password_reset_ttl_minutes: 60,
            bcrypt_cost: 4,
            admin_code_ttl_seconds: 60,
            payment_api_url: "http://payments.invalid".to_string(),
            payment_access_token: "test-token".to_string(),
            payment_webhook_secret: None,
            payment_notification_url: None,
            webhook_poll_cron: DEFAULT_WEBHOOK_POLL_CRON.to_string(),
            subscription_sweep_cron: DEFAULT_SUBSCRIPTION_SWEEP_CRON.to_string(),
            rate_limit_auth_rpm: 10,
            rate_limit_api_rpm: 120,
            email_api_url: DEFAULT_EMAIL_API_URL.to_string(),
            email_api_key: None,
            email_from: DEFAULT_EMAIL_FROM.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_falls_back_to_default_when_unset() {
        let value: i64 = parsed("CHAMAGOL_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn parsed_rejects_garbage() {
        std::env::set_var("CHAMAGOL_TEST_GARBAGE_TTL", "fifteen");
        let result: Result<i64, _> = parsed("CHAMAGOL_TEST_GARBAGE_TTL", 15);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn positive_rejects_zero() {
        std::env::set_var("CHAMAGOL_TEST_ZERO_RPM", "0");
        assert!(positive("CHAMAGOL_TEST_ZERO_RPM", 10).is_err());
    }

    #[test]
    fn required_reports_variable_name() {
        let err = required("CHAMAGOL_TEST_MISSING_REQUIRED").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: CHAMAGOL_TEST_MISSING_REQUIRED"
        );
    }
}

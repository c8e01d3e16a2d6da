//! Outbound mail for verification and password reset links.
//!
//! Two transports:
//! 1. HTTP mail API (Resend compatible) when `EMAIL_API_KEY` is set
//! 2. Log only, for development setups without a mail provider

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::server::{config::Config, error::AppError};

/// Delays before the second and third attempt, in seconds.
const RETRY_DELAYS: &[u64] = &[1, 4];

/// A plain-text mail as posted to the mail API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Clone)]
enum Transport {
    Http {
        client: reqwest::Client,
        api_url: String,
        api_key: String,
    },
    Log,
    #[cfg(test)]
    Capture(std::sync::Arc<std::sync::Mutex<Vec<Email>>>),
}

/// Sends account mails through the configured transport.
#[derive(Clone)]
pub struct Mailer {
    transport: Transport,
    from: String,
    /// Frontend base URL the links point to
    app_url: String,
}

impl Mailer {
    /// Picks the HTTP transport when an API key is configured, log-only otherwise.
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        let transport = match &config.email_api_key {
            Some(api_key) => Transport::Http {
                client,
                api_url: config.email_api_url.clone(),
                api_key: api_key.clone(),
            },
            None => {
                tracing::warn!("EMAIL_API_KEY not set, emails will only be logged");
                Transport::Log
            }
        };

        Self {
            transport,
            from: config.email_from.clone(),
            app_url: config.app_url.clone(),
        }
    }

    /// Mailer that records every mail instead of sending it.
    #[cfg(test)]
    pub fn capturing(config: &Config) -> (Self, std::sync::Arc<std::sync::Mutex<Vec<Email>>>) {
        let outbox = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mailer = Self {
            transport: Transport::Capture(outbox.clone()),
            from: config.email_from.clone(),
            app_url: config.app_url.clone(),
        };
        (mailer, outbox)
    }

    /// Sends the email verification link to a freshly registered user.
    ///
    /// Delivery is detached, see `send_detached`.
    pub async fn send_verification(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let link = self.link("verify-email", token)?;
        let text = format!(
            "Hi {},\n\nconfirm your email address to start receiving tips:\n\n{}\n\n\
             If you did not create an account you can ignore this message.",
            name, link
        );

        self.send_detached(self.email(to, "Confirm your email address", text))
            .await;
        Ok(())
    }

    /// Sends a password reset link. Delivery is detached, see `send_detached`.
    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), AppError> {
        let link = self.link("reset-password", token)?;
        let text = format!(
            "Someone requested a password reset for your account.\n\n\
             Choose a new password here:\n\n{}\n\n\
             If this was not you, no action is needed.",
            link
        );

        self.send_detached(self.email(to, "Reset your password", text))
            .await;
        Ok(())
    }

    /// Delivers a mail without making the caller wait for the mail API.
    ///
    /// The HTTP transport runs on a background task, so response times do not depend on
    /// whether a mail was sent. Failures are only logged.
    pub async fn send_detached(&self, email: Email) {
        if matches!(self.transport, Transport::Http { .. }) {
            let mailer = self.clone();
            tokio::spawn(async move {
                let to = email.to.clone();
                if let Err(e) = mailer.send(email).await {
                    tracing::error!(%to, "Failed to deliver mail: {}", e);
                }
            });
            return;
        }

        if let Err(e) = self.send(email).await {
            tracing::error!("Failed to deliver mail: {}", e);
        }
    }

    /// Delivers a mail through the configured transport.
    ///
    /// The HTTP transport retries network errors, 429 and 5xx responses up to three
    /// attempts in total. Other failures are returned immediately.
    pub async fn send(&self, email: Email) -> Result<(), AppError> {
        match &self.transport {
            Transport::Http {
                client,
                api_url,
                api_key,
            } => send_with_retry(client, api_url, api_key, &email).await,
            Transport::Log => {
                tracing::info!(
                    to = %email.to,
                    subject = %email.subject,
                    "Mail delivery disabled, message body:\n{}",
                    email.text
                );
                Ok(())
            }
            #[cfg(test)]
            Transport::Capture(outbox) => {
                if let Ok(mut outbox) = outbox.lock() {
                    outbox.push(email);
                }
                Ok(())
            }
        }
    }

    fn email(&self, to: &str, subject: &str, text: String) -> Email {
        Email {
            from: self.from.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            text,
        }
    }

    /// Builds `{app_url}/{path}?token={token}`.
    fn link(&self, path: &str, token: &str) -> Result<String, AppError> {
        let mut url = Url::parse(&format!("{}/{}", self.app_url, path))
            .map_err(|e| AppError::InternalError(format!("Invalid APP_URL: {}", e)))?;
        url.query_pairs_mut().append_pair("token", token);
        Ok(url.into())
    }
}

async fn send_with_retry(
    client: &reqwest::Client,
    api_url: &str,
    api_key: &str,
    email: &Email,
) -> Result<(), AppError> {
    let mut last_error = None;

    for (attempt, delay_secs) in std::iter::once(&0u64).chain(RETRY_DELAYS).enumerate() {
        if *delay_secs > 0 {
            tracing::warn!(attempt, delay_secs, "Retrying mail delivery");
            tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
        }

        match send_once(client, api_url, api_key, email).await {
            Ok(()) => {
                tracing::info!(to = %email.to, subject = %email.subject, "Mail sent");
                return Ok(());
            }
            Err((error, true)) => last_error = Some(error),
            Err((error, false)) => return Err(error),
        }
    }

    tracing::error!(
        to = %email.to,
        attempts = RETRY_DELAYS.len() + 1,
        "Mail delivery failed after all retries"
    );
    Err(last_error
        .unwrap_or_else(|| AppError::InternalError("Mail delivery failed".to_string())))
}

/// One delivery attempt. The flag tells whether the failure is worth retrying.
async fn send_once(
    client: &reqwest::Client,
    api_url: &str,
    api_key: &str,
    email: &Email,
) -> Result<(), (AppError, bool)> {
    let response = client
        .post(api_url)
        .bearer_auth(api_key)
        .json(email)
        .send()
        .await
        .map_err(|e| (AppError::ReqwestErr(e), true))?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    let transient = status.as_u16() == 429 || status.is_server_error();
    if transient {
        tracing::warn!(%status, %body, "Mail API returned transient error");
    }

    Err((
        AppError::InternalError(format!("Mail API returned HTTP {}: {}", status, body)),
        transient,
    ))
}

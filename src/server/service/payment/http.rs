//! REST client for the hosted-checkout payment gateway.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::server::{
    config::Config,
    error::payment::PaymentError,
    service::payment::{
        CheckoutPreference, CheckoutRequest, GatewayPayment, PaymentGateway, PaymentStatus,
    },
    util::parse::string_or_number,
};

#[derive(Debug, Serialize)]
struct PreferenceRequest<'a> {
    items: Vec<PreferenceItem<'a>>,
    external_reference: &'a str,
    payer: Payer<'a>,
    back_urls: BackUrls<'a>,
    auto_return: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PreferenceItem<'a> {
    title: &'a str,
    quantity: u32,
    unit_price: f64,
    currency_id: &'a str,
}

#[derive(Debug, Serialize)]
struct Payer<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct BackUrls<'a> {
    success: &'a str,
    pending: &'a str,
    failure: &'a str,
}

#[derive(Debug, Deserialize)]
struct PreferenceResponse {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    init_point: String,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    status: String,
    #[serde(default)]
    external_reference: Option<String>,
    transaction_amount: f64,
    currency_id: String,
    #[serde(default)]
    date_approved: Option<DateTime<FixedOffset>>,
}

impl PaymentResponse {
    fn into_payment(self) -> GatewayPayment {
        GatewayPayment {
            id: self.id,
            status: PaymentStatus::parse(&self.status),
            external_reference: self.external_reference.filter(|r| !r.is_empty()),
            amount_cents: to_cents(self.transaction_amount),
            currency: self.currency_id,
            approved_at: self.date_approved.map(|at| at.with_timezone(&Utc)),
        }
    }
}

/// Gateway client authenticated with a bearer access token.
#[derive(Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl HttpPaymentGateway {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.payment_api_url.clone(),
            access_token: config.payment_access_token.clone(),
        }
    }

    /// Turns non-2xx answers into `PaymentError::Status`.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, PaymentError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(PaymentError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutPreference, PaymentError> {
        let body = PreferenceRequest {
            items: vec![PreferenceItem {
                title: &request.title,
                quantity: 1,
                unit_price: from_cents(request.amount_cents),
                currency_id: &request.currency,
            }],
            external_reference: &request.reference,
            payer: Payer {
                email: &request.payer_email,
            },
            back_urls: BackUrls {
                success: &request.return_url,
                pending: &request.return_url,
                failure: &request.return_url,
            },
            auto_return: "approved",
            notification_url: request.notification_url.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/checkout/preferences", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let preference: PreferenceResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))?;

        Ok(CheckoutPreference {
            id: preference.id,
            checkout_url: preference.init_point,
        })
    }

    async fn get_payment(&self, payment_id: &str) -> Result<GatewayPayment, PaymentError> {
        let response = self
            .client
            .get(payment_url(&self.base_url, payment_id)?)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let payment: PaymentResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))?;

        Ok(payment.into_payment())
    }
}

/// `{base_url}/v1/payments/{payment_id}` with the id escaped as a single path segment.
fn payment_url(base_url: &str, payment_id: &str) -> Result<Url, PaymentError> {
    let mut url = Url::parse(base_url).map_err(|e| PaymentError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| PaymentError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(["v1", "payments", payment_id]);

    Ok(url)
}

/// The gateway speaks decimal amounts; we store cents.
fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

//! Payment gateway abstraction.
//!
//! Services only talk to the gateway through `PaymentGateway`, so the HTTP client can
//! be swapped for an in-memory fake in tests.

pub mod http;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::server::error::payment::PaymentError;

/// What the gateway needs to build a hosted checkout page.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    /// Our sale reference, echoed back as the payment's external reference
    pub reference: String,
    pub title: String,
    pub amount_cents: i64,
    pub currency: String,
    pub payer_email: String,
    /// Where the payer lands after paying
    pub return_url: String,
    pub notification_url: Option<String>,
}

/// A checkout preference created at the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutPreference {
    pub id: String,
    pub checkout_url: String,
}

/// Authoritative payment state as reported by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayPayment {
    pub id: String,
    pub status: PaymentStatus,
    pub external_reference: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub approved_at: Option<DateTime<Utc>>,
}

/// Gateway payment statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Approved,
    Pending,
    InProcess,
    Authorized,
    Rejected,
    Cancelled,
    Refunded,
    ChargedBack,
    Other(String),
}

/// What a payment status means for the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid,
    Failed,
    Refunded,
    /// Not settled yet, or a status we do not act on
    Unsettled,
}

impl PaymentStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "approved" => Self::Approved,
            "pending" => Self::Pending,
            "in_process" => Self::InProcess,
            "authorized" => Self::Authorized,
            "rejected" => Self::Rejected,
            "cancelled" => Self::Cancelled,
            "refunded" => Self::Refunded,
            "charged_back" => Self::ChargedBack,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn outcome(&self) -> PaymentOutcome {
        match self {
            Self::Approved => PaymentOutcome::Paid,
            Self::Rejected | Self::Cancelled => PaymentOutcome::Failed,
            Self::Refunded | Self::ChargedBack => PaymentOutcome::Refunded,
            Self::Pending | Self::InProcess | Self::Authorized | Self::Other(_) => {
                PaymentOutcome::Unsettled
            }
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a hosted checkout for one sale.
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutPreference, PaymentError>;

    /// Fetches a payment by its gateway id.
    async fn get_payment(&self, payment_id: &str) -> Result<GatewayPayment, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statuses_to_outcomes() {
        let cases = [
            ("approved", PaymentOutcome::Paid),
            ("rejected", PaymentOutcome::Failed),
            ("cancelled", PaymentOutcome::Failed),
            ("refunded", PaymentOutcome::Refunded),
            ("charged_back", PaymentOutcome::Refunded),
            ("pending", PaymentOutcome::Unsettled),
            ("in_process", PaymentOutcome::Unsettled),
            ("authorized", PaymentOutcome::Unsettled),
            ("in_mediation", PaymentOutcome::Unsettled),
        ];

        for (status, expected) in cases {
            assert_eq!(PaymentStatus::parse(status).outcome(), expected, "{}", status);
        }
    }
}

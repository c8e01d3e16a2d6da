//! In-memory gateway for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::server::{
    error::payment::PaymentError,
    service::payment::{
        CheckoutPreference, CheckoutRequest, GatewayPayment, PaymentGateway, PaymentStatus,
    },
};

#[derive(Default)]
pub struct FakePaymentGateway {
    payments: Mutex<HashMap<String, GatewayPayment>>,
    checkouts: Mutex<Vec<CheckoutRequest>>,
    fail_checkout: bool,
}

impl FakePaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway whose checkout creation always answers HTTP 503.
    pub fn failing_checkout() -> Self {
        Self {
            fail_checkout: true,
            ..Self::default()
        }
    }

    /// Registers a payment that `get_payment` will return.
    pub fn add_payment(&self, payment_id: &str, reference: &str, status: &str) {
        let payment = GatewayPayment {
            id: payment_id.to_string(),
            status: PaymentStatus::parse(status),
            external_reference: Some(reference.to_string()),
            amount_cents: 4990,
            currency: "BRL".to_string(),
            approved_at: (status == "approved").then(Utc::now),
        };

        if let Ok(mut payments) = self.payments.lock() {
            payments.insert(payment_id.to_string(), payment);
        }
    }

    pub fn checkouts(&self) -> Vec<CheckoutRequest> {
        self.checkouts
            .lock()
            .map(|checkouts| checkouts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutPreference, PaymentError> {
        if self.fail_checkout {
            return Err(PaymentError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }

        let preference = CheckoutPreference {
            id: format!("pref-{}", request.reference),
            checkout_url: format!("https://pay.example.com/checkout/{}", request.reference),
        };

        if let Ok(mut checkouts) = self.checkouts.lock() {
            checkouts.push(request);
        }

        Ok(preference)
    }

    async fn get_payment(&self, payment_id: &str) -> Result<GatewayPayment, PaymentError> {
        self.payments
            .lock()
            .ok()
            .and_then(|payments| payments.get(payment_id).cloned())
            .ok_or_else(|| PaymentError::Status {
                status: 404,
                body: format!("payment {} not found", payment_id),
            })
    }
}

use thiserror::Error;

/// Failures talking to the payment gateway.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Payment gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("Payment gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A gateway URL could not be built from the configured base URL.
    #[error("Invalid payment gateway URL: {0}")]
    InvalidUrl(String),

    /// The gateway answered 2xx with a body we cannot interpret.
    #[error("Unexpected payment gateway response: {0}")]
    MalformedResponse(String),
}

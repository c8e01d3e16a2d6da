//! One-time admin code used to bootstrap the first manager account.
//!
//! When the database has no admin at startup a random code is generated, logged and kept
//! in memory for a short time. A registered user who posts the code to
//! `/api/auth/claim-admin` is promoted to admin; the code is consumed on first success.

use std::sync::Arc;
use std::time::{Duration, Instant};

use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use crate::server::util::token::generate_token;

const ADMIN_CODE_LENGTH: usize = 32;

#[derive(Clone)]
struct AdminCode {
    code: String,
    expires_at: Instant,
}

impl AdminCode {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Constant-time comparison against user input.
    fn matches(&self, input: &str) -> bool {
        self.code.as_bytes().ct_eq(input.as_bytes()).into()
    }
}

/// In-memory holder of the current admin code.
///
/// Cloning shares the same code; the service lives in `AppState`.
#[derive(Clone)]
pub struct AdminCodeService {
    code: Arc<RwLock<Option<AdminCode>>>,
    ttl: Duration,
}

impl AdminCodeService {
    /// Creates a service without an active code.
    ///
    /// # Arguments
    /// - `ttl` - How long a generated code stays valid
    pub fn new(ttl: Duration) -> Self {
        Self {
            code: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    /// Generates a fresh code, replacing any previous one.
    ///
    /// # Returns
    /// - `String` - The 32-character alphanumeric code to hand to the operator
    pub async fn generate(&self) -> String {
        let code = generate_token(ADMIN_CODE_LENGTH);
        *self.code.write().await = Some(AdminCode {
            code: code.clone(),
            expires_at: Instant::now() + self.ttl,
        });
        code
    }

    /// Checks `input` against the stored code and consumes it on success.
    ///
    /// Expired codes are dropped on access. A wrong guess leaves a valid code in place.
    ///
    /// # Returns
    /// - `true` - Code matched and was still valid; it can not be used again
    /// - `false` - No code, expired code or mismatch
    pub async fn validate_and_consume(&self, input: &str) -> bool {
        let mut code = self.code.write().await;

        match code.as_ref() {
            Some(stored) if stored.is_expired() => {
                *code = None;
                false
            }
            Some(stored) if stored.matches(input) => {
                *code = None;
                true
            }
            _ => false,
        }
    }

    /// Whether an unexpired code is currently stored.
    #[cfg(test)]
    pub async fn has_valid_code(&self) -> bool {
        let mut code = self.code.write().await;

        match code.as_ref() {
            Some(stored) if stored.is_expired() => {
                *code = None;
                false
            }
            Some(_) => true,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn service() -> AdminCodeService {
        AdminCodeService::new(Duration::from_secs(60))
    }

    /// Tests generating a new admin code.
    ///
    /// Expected: 32-character code stored as valid
    #[tokio::test]
    async fn test_generate_code() {
        let service = service();
        assert!(!service.has_valid_code().await);

        let code = service.generate().await;
        assert_eq!(code.len(), 32);
        assert!(service.has_valid_code().await);
    }

    /// Tests that a correct code validates once and is then consumed.
    ///
    /// Expected: first validation succeeds, second fails
    #[tokio::test]
    async fn test_code_cannot_be_reused() {
        let service = service();
        let code = service.generate().await;

        assert!(service.validate_and_consume(&code).await);
        assert!(!service.has_valid_code().await);
        assert!(!service.validate_and_consume(&code).await);
    }

    /// Tests validating an incorrect admin code.
    ///
    /// Expected: validation fails and the stored code survives
    #[tokio::test]
    async fn test_validate_incorrect_code() {
        let service = service();
        service.generate().await;

        assert!(!service.validate_and_consume("wrong_code").await);
        assert!(service.has_valid_code().await);
    }

    /// Tests validating when no code was ever generated.
    ///
    /// Expected: validation fails
    #[tokio::test]
    async fn test_validate_without_code() {
        assert!(!service().validate_and_consume("any_code").await);
    }

    /// Tests that a regenerated code replaces the previous one.
    ///
    /// Expected: the old code is rejected, the new one accepted
    #[tokio::test]
    async fn test_regenerate_replaces_code() {
        let service = service();
        let first = service.generate().await;
        let second = service.generate().await;

        assert!(!service.validate_and_consume(&first).await);
        assert!(service.validate_and_consume(&second).await);
    }

    /// Tests that codes expire after their TTL.
    ///
    /// Expected: code valid initially and rejected after the TTL elapsed
    #[tokio::test]
    async fn test_code_expires_after_ttl() {
        let service = AdminCodeService::new(Duration::from_millis(50));
        let code = service.generate().await;
        assert!(service.has_valid_code().await);

        sleep(Duration::from_millis(80)).await;

        assert!(!service.validate_and_consume(&code).await);
        assert!(!service.has_valid_code().await);
    }
}

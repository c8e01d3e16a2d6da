use crate::server::{error::AppError, model::pagination::PageParam};

/// Page size used when the client does not send `per_page`.
pub const DEFAULT_PER_PAGE: u64 = 20;
/// Largest page size a client may request.
pub const MAX_PER_PAGE: u64 = 100;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 72;

/// Trims, lower-cases and sanity-checks an email address.
///
/// This is a shape check only (`local@domain.tld`, no whitespace); deliverability is
/// proven by the verification mail.
///
/// # Returns
/// - `Ok(String)` - Normalised address
/// - `Err(AppError::BadRequest)` - Address is obviously malformed
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();

    let valid = email.len() <= 254
        && !email.chars().any(char::is_whitespace)
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };

    if !valid {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    Ok(email)
}

/// Checks password length bounds.
///
/// bcrypt ignores everything after 72 bytes, so longer passwords are rejected instead
/// of silently truncated.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Builds pagination parameters from optional query values.
///
/// `per_page` defaults to `DEFAULT_PER_PAGE` and is clamped to `1..=MAX_PER_PAGE`.
pub fn page_param(page: Option<u64>, per_page: Option<u64>) -> PageParam {
    PageParam {
        page: page.unwrap_or(0),
        per_page: per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE),
    }
}

/// Serde helper for ids that arrive either as JSON numbers or strings.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::{de::Error, Deserialize};

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Ok(value),
        serde_json::Value::Number(value) => Ok(value.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_email_case_and_whitespace() {
        assert_eq!(
            normalize_email("  Fan@Example.COM ").unwrap(),
            "fan@example.com"
        );
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in [
            "",
            "fan",
            "fan@",
            "@example.com",
            "fan@example",
            "f an@example.com",
            "a@b@c.com",
            "fan@.com",
        ] {
            assert!(normalize_email(email).is_err(), "accepted {:?}", email);
        }
    }

    #[test]
    fn enforces_password_bounds() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
        assert!(validate_password(&"x".repeat(73)).is_err());
    }

    #[test]
    fn clamps_page_size() {
        let default = page_param(None, None);
        assert_eq!((default.page, default.per_page), (0, DEFAULT_PER_PAGE));

        assert_eq!(page_param(Some(3), Some(0)).per_page, 1);
        assert_eq!(page_param(Some(3), Some(1000)).per_page, MAX_PER_PAGE);
    }
}

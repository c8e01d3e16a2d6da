//! Opaque token generation and hashing.
//!
//! Refresh tokens and emailed tokens are random alphanumeric strings handed to the
//! client once. Only their SHA-256 digest is persisted, so a database leak does not
//! leak usable tokens.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of refresh tokens.
pub const REFRESH_TOKEN_LENGTH: usize = 48;
/// Length of email verification and password reset tokens.
pub const EMAIL_TOKEN_LENGTH: usize = 32;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                         abcdefghijklmnopqrstuvwxyz\
                         0123456789";

/// Generates a random alphanumeric string of `length` characters.
pub fn generate_token(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Lower-case hex SHA-256 digest of a token, as stored in the database.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_alphanumeric_tokens_of_requested_length() {
        let token = generate_token(REFRESH_TOKEN_LENGTH);
        assert_eq!(token.len(), REFRESH_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token(REFRESH_TOKEN_LENGTH));
    }

    #[test]
    fn hashes_to_known_digest() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

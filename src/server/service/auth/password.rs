//! bcrypt hashing on the blocking pool.

use crate::server::error::internal::InternalError;

/// Hashes `password` with the given bcrypt cost.
pub async fn hash_password(password: String, cost: u32) -> Result<String, InternalError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

/// Checks `password` against a stored bcrypt hash.
pub async fn verify_password(password: String, hash: String) -> Result<bool, InternalError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}

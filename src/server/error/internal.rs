use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// bcrypt failed to hash or verify a password.
    ///
    /// Results in a 500 Internal Server Error with a generic message returned
    /// to client.
    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// A blocking task (password hashing) panicked or was cancelled.
    #[error("Blocking task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// Signing an access token failed.
    #[error("Failed to encode access token: {0}")]
    TokenEncoding(#[source] jsonwebtoken::errors::Error),

    /// Serializing an outbound message failed.
    #[error("Failed to serialize {what}: {source}")]
    Serialization {
        /// What was being serialized
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A row that was just written could not be read back.
    #[error("{entity} {id} disappeared during {operation}")]
    MissingAfterWrite {
        entity: &'static str,
        id: i32,
        operation: &'static str,
    },
}

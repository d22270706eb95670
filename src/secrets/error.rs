//! Error types for secret store operations.

use thiserror::Error;

/// Result type for secret store operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors surfaced by a secret store backend.
///
/// `Conflict` and `NotFound` are recoverable by design: the synchronizer
/// consumes them to drive its replace and idempotent-delete fallbacks, and
/// neither ever escapes it.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// A secret with this name already exists (create collided).
    #[error("Secret already exists: {name}")]
    Conflict { name: String },

    /// No secret with this name exists.
    #[error("Secret not found: {name}")]
    NotFound { name: String },

    /// The store rejected the request for any other reason.
    #[error("Secret store API error (status {code}): {message}")]
    Api { code: u16, message: String },

    /// The store could not be reached at all.
    #[error("Secret store connection failed: {message}")]
    ConnectionFailed { message: String },
}

impl SecretsError {
    /// Create a conflict error.
    pub fn conflict(name: impl Into<String>) -> Self {
        Self::Conflict { name: name.into() }
    }

    /// Create a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an API error.
    pub fn api(code: u16, message: impl Into<String>) -> Self {
        Self::Api { code, message: message.into() }
    }

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed { message: message.into() }
    }
}

//! # Error Types
//!
//! Error types for the certflow pipeline using `thiserror`.

use std::path::PathBuf;

use crate::secrets::SecretsError;

/// Custom result type for certflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the certflow pipeline
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// External CA toolchain invocation returned non-zero, timed out, or
    /// could not start
    #[error("Command execution failed: {command}: {message}")]
    CommandExecution { command: String, message: String },

    /// A required certificate artifact is absent where it is needed as
    /// input (signing preconditions, secret-sync reads)
    #[error("Artifact not found: {path}")]
    ArtifactNotFound { path: PathBuf },

    /// Secret store failure other than the recoverable conflict-on-create
    /// and not-found-on-delete responses
    #[error("Secret store error: {0}")]
    SecretStore(#[from] SecretsError),

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a command execution error
    pub fn command_execution<C: Into<String>, M: Into<String>>(command: C, message: M) -> Self {
        Self::CommandExecution { command: command.into(), message: message.into() }
    }

    /// Create an artifact not found error
    pub fn artifact_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::ArtifactNotFound { path: path.into() }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(source: std::io::Error, context: S) -> Self {
        Self::Io { source, context: context.into() }
    }

    /// Create a serialization error with context
    pub fn serialization<S: Into<String>>(source: serde_json::Error, context: S) -> Self {
        Self::Serialization { source, context: context.into() }
    }
}

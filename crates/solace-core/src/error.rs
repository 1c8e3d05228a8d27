//! Error types for the Solace engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by [`SessionStore`](crate::session::SessionStore)
/// implementations.
///
/// Kept separate from [`SolaceError`] so callers can tell persistence
/// failures (a data-integrity concern the transport must decide how to
/// report) apart from request rejection.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum StoreError {
    /// The session id is unknown to the store
    #[error("Session not found: '{0}'")]
    SessionNotFound(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Backend failure that fits no other variant
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a SessionNotFound error
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Self::SessionNotFound(session_id.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Check if this error means the referenced session does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A shared error type for the engine's exposed operations.
///
/// Generation failures never appear here: the arbitrator always recovers
/// them by falling back to rule-based responses. A chat turn fails only
/// when its input is invalid or the session store fails.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum SolaceError {
    /// The request itself is unusable (malformed frame, empty message,
    /// negative emotion weights); rejected before any component runs
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Session persistence failure, propagated distinctly
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SolaceError {
    /// Creates an InvalidInput error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an InvalidInput error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Check if this is a store error
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Check if this error means the referenced session does not exist
    pub fn is_session_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::SessionNotFound(_)))
    }
}

/// A type alias for `Result<T, SolaceError>`.
pub type Result<T> = std::result::Result<T, SolaceError>;

//! Error types for the GuildLink connector.

use thiserror::Error;

use crate::levels::ModuleId;

/// A shared error type for all connector crates.
///
/// Remote outcomes map onto `ServiceUnavailable` / `RemoteRejected`; the
/// remaining variants cover local preconditions and the storage layer.
#[derive(Error, Debug, Clone)]
pub enum LinkError {
    /// Transport failure or a 5xx response from the bot service.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// 4xx response; carries the server-supplied message verbatim.
    #[error("{0}")]
    RemoteRejected(String),

    /// The operation requires an established connection.
    #[error("not connected")]
    NotConnected,

    /// Module id outside the catalog's id space.
    #[error("invalid module id {0}")]
    InvalidModule(ModuleId),

    /// The persisted session record could not be parsed.
    #[error("corrupt session record: {0}")]
    CorruptSession(String),

    /// IO error (file system operations).
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LinkError {
    /// Creates a ServiceUnavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Creates a RemoteRejected error.
    pub fn remote_rejected(message: impl Into<String>) -> Self {
        Self::RemoteRejected(message.into())
    }

    /// Creates a CorruptSession error.
    pub fn corrupt_session(message: impl Into<String>) -> Self {
        Self::CorruptSession(message.into())
    }

    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Check if this is a RemoteRejected error.
    pub fn is_remote_rejected(&self) -> bool {
        matches!(self, Self::RemoteRejected(_))
    }

    /// Check if this is a CorruptSession error.
    pub fn is_corrupt_session(&self) -> bool {
        matches!(self, Self::CorruptSession(_))
    }
}

impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A type alias for `Result<T, LinkError>`.
pub type Result<T> = std::result::Result<T, LinkError>;

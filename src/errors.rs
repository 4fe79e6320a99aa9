//! Error handling for the clearance runtime
//!
//! Expected authorization outcomes (missing permission, role above the bot)
//! are `Decision` values and never appear here. This enum covers the
//! failures that happen around the engine: configuration, the platform call
//! and the reply channel.

use thiserror::Error;

/// Main error type for the clearance runtime
#[derive(Error, Debug)]
pub enum ClearanceError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Platform operation failed: {operation} - {message}")]
    PlatformOperation { operation: String, message: String },

    #[error("Reply channel closed: {reason}")]
    ReplyChannel { reason: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Result with ClearanceError
pub type ClearanceResult<T> = Result<T, ClearanceError>;

impl ClearanceError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a platform operation error
    pub fn platform(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PlatformOperation {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a reply channel error
    pub fn reply_channel(reason: impl Into<String>) -> Self {
        Self::ReplyChannel {
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Whether the failure ends the current invocation for good.
    ///
    /// Nothing in this runtime is retried, so every error is terminal for the
    /// invocation; only configuration errors are fatal for the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClearanceError::Config { .. })
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for ClearanceError {
    fn from(err: serde_json::Error) -> Self {
        ClearanceError::serialization("json_operation", err)
    }
}

/// Convert from std::io errors
impl From<std::io::Error> for ClearanceError {
    fn from(err: std::io::Error) -> Self {
        ClearanceError::io("io_operation", err)
    }
}

/// Convert from figment errors
impl From<figment::Error> for ClearanceError {
    fn from(err: figment::Error) -> Self {
        ClearanceError::config(err.to_string())
    }
}

/// Core error types for StreamFlow collaborators
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors reported by external collaborators (transport, reporting backend)
#[derive(Error, Debug)]
pub enum CoreError {
    /// Request never produced a response (connection refused, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// No bearer token was available for an authenticated call
    #[error("Not authenticated")]
    Unauthenticated,

    /// Response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl CoreError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a rejection error from a status code and body text
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

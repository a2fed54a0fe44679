//! Error types for the StreamFlow client.

use streamflow_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to the StreamFlow backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no token available, or token rejected
    #[error("Authentication required")]
    AuthRequired,

    /// Login failed (wrong email or password)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl ClientError {
    /// Classify a send failure
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::ServerUnreachable(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

impl From<ClientError> for CoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::AuthRequired | ClientError::AuthFailed(_) => CoreError::Unauthenticated,
            ClientError::ServerError { status, message } => CoreError::rejected(status, message),
            ClientError::ParseError(msg) => CoreError::Parse(msg),
            other => CoreError::transport(other.to_string()),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_into_core_errors() {
        assert!(matches!(
            CoreError::from(ClientError::AuthRequired),
            CoreError::Unauthenticated
        ));
        assert!(matches!(
            CoreError::from(ClientError::ServerError {
                status: 404,
                message: "Song not found".into()
            }),
            CoreError::Rejected { status: 404, .. }
        ));
        assert!(matches!(
            CoreError::from(ClientError::ServerUnreachable("refused".into())),
            CoreError::Transport(_)
        ));
    }
}

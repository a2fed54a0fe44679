//! Error types for playback management

use streamflow_core::CoreError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No bearer credential was available for the audio fetch
    #[error("Not authenticated")]
    Unauthenticated,

    /// Audio fetch answered with a non-success status
    #[error("Audio load failed with status {status}")]
    Load { status: u16 },

    /// Audio fetch succeeded but returned no bytes
    #[error("Audio payload is empty")]
    EmptyPayload,

    /// Audio fetch returned something that is not audio (e.g. an HTML error page)
    #[error("Unsupported content type: {0}")]
    UnsupportedContent(String),

    /// Queue start index outside the track list
    #[error("Invalid queue index {index} for {len} tracks")]
    InvalidIndex { index: usize, len: usize },

    /// Session or play-count reporting failed (logged, never propagated)
    #[error("Reporting failed: {0}")]
    ReportingFailure(String),

    /// Audio transport produced no response at all
    #[error("Transport error: {0}")]
    Transport(String),

    /// Media output refused the request
    #[error("Media output error: {0}")]
    Media(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Operation not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<CoreError> for PlaybackError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthenticated => PlaybackError::Unauthenticated,
            CoreError::Rejected { status, .. } => PlaybackError::Load { status },
            other => PlaybackError::Transport(other.to_string()),
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Collaborator traits consumed by the playback core
use crate::error::Result;
use crate::types::{PlaylistId, TrackId};
use async_trait::async_trait;

/// Bearer credential accessor
///
/// Synchronous: the player asks for the token right before each audio fetch.
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, or `None` when the user is signed out
    fn bearer_token(&self) -> Option<String>;
}

/// Fixed credential, for tests and one-shot tools
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    /// Credentials holding the given token
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// Credentials with no token
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Raw response of an audio fetch
///
/// Status and content type are passed through untouched; deciding whether
/// the payload is playable is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header value, if present
    pub content_type: Option<String>,
    /// Response body
    pub bytes: Vec<u8>,
}

impl AudioPayload {
    /// Successful payload with the given content type
    pub fn ok(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.into()),
            bytes,
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Audio byte transport
///
/// Implementers perform one authenticated GET of a track's byte stream.
/// Only failures that produce no response at all are errors; non-2xx
/// statuses come back as an `AudioPayload`.
#[async_trait]
pub trait AudioTransport: Send + Sync {
    /// Fetch the full byte stream for a track
    ///
    /// # Errors
    /// Returns `CoreError::Transport` if no response was received
    async fn fetch(&self, track_id: &TrackId, bearer_token: &str) -> Result<AudioPayload>;
}

/// Listening-session and play-count reporting backend
///
/// All calls are best-effort telemetry. Callers log failures and carry on.
#[async_trait]
pub trait SessionReporter: Send + Sync {
    /// Open a listening session, returning the backend's session id
    async fn start_session(
        &self,
        track_id: &TrackId,
        context_id: Option<&PlaylistId>,
    ) -> Result<String>;

    /// Close a listening session with the listened duration
    async fn complete_session(
        &self,
        track_id: &TrackId,
        session_id: &str,
        duration_secs: f64,
    ) -> Result<()>;

    /// Record one play of a track
    async fn notify_played(&self, track_id: &TrackId) -> Result<()>;
}

//! Authenticated audio loading
//!
//! `AudioSource` turns a track id into a `PlayableHandle`: one authenticated
//! fetch through the injected transport, then validation of the response.
//! Handles are scoped; dropping one releases its bytes and decrements the
//! source's live-handle count.

use crate::error::{PlaybackError, Result};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use streamflow_core::{AudioPayload, AudioTransport, CredentialProvider, TrackId};

/// Content types accepted besides `audio/*`
const GENERIC_AUDIO_TYPES: &[&str] = &["application/octet-stream", "application/ogg"];

/// In-memory, ready-to-play audio
pub struct PlayableHandle {
    track_id: TrackId,
    content_type: Option<String>,
    bytes: Arc<[u8]>,
    live: Arc<AtomicUsize>,
}

impl PlayableHandle {
    fn new(track_id: TrackId, payload: AudioPayload, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self {
            track_id,
            content_type: payload.content_type,
            bytes: payload.bytes.into(),
            live,
        }
    }

    pub fn track_id(&self) -> &TrackId {
        &self.track_id
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Shared view of the audio bytes, for media outputs that decode off-thread
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for PlayableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayableHandle")
            .field("track_id", &self.track_id)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Drop for PlayableHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(track_id = %self.track_id, "Released audio handle");
    }
}

/// Loads track audio through an authenticated transport
#[derive(Clone)]
pub struct AudioSource {
    transport: Arc<dyn AudioTransport>,
    credentials: Arc<dyn CredentialProvider>,
    live: Arc<AtomicUsize>,
}

impl AudioSource {
    pub fn new(
        transport: Arc<dyn AudioTransport>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            transport,
            credentials,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fetch and validate a track's audio
    ///
    /// # Errors
    /// - `Unauthenticated` if no bearer token is available
    /// - `Transport` if the fetch produced no response
    /// - `Load` for a non-2xx status
    /// - `EmptyPayload` for an empty body
    /// - `UnsupportedContent` if the body is not audio
    pub async fn load(&self, track_id: &TrackId) -> Result<PlayableHandle> {
        let token = self
            .credentials
            .bearer_token()
            .filter(|token| !token.is_empty())
            .ok_or(PlaybackError::Unauthenticated)?;

        let payload = self.transport.fetch(track_id, &token).await?;

        if !payload.is_success() {
            return Err(PlaybackError::Load {
                status: payload.status,
            });
        }
        if payload.bytes.is_empty() {
            return Err(PlaybackError::EmptyPayload);
        }
        if let Some(content_type) = payload.content_type.as_deref() {
            if !is_audio_content_type(content_type) {
                return Err(PlaybackError::UnsupportedContent(content_type.to_string()));
            }
        }

        tracing::info!(
            track_id = %track_id,
            bytes = payload.bytes.len(),
            content_type = ?payload.content_type,
            "Audio loaded"
        );

        Ok(PlayableHandle::new(
            track_id.clone(),
            payload,
            Arc::clone(&self.live),
        ))
    }

    /// Number of handles from this source that are still alive
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Whether a `Content-Type` header value describes audio
///
/// Parameters (`; charset=...`) are ignored and matching is case-insensitive.
pub fn is_audio_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("audio/") || GENERIC_AUDIO_TYPES.contains(&mime.as_str())
}

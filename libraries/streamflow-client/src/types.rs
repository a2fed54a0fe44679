//! Types for StreamFlow API requests and responses.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use streamflow_core::{PlaylistId, Track};

/// Default backend address for local development
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Configuration for connecting to a StreamFlow backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    pub url: String,
    /// Current access token (if authenticated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl ServerConfig {
    /// Create a new server config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Create a config with an existing token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::new(url)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            access_token: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// A song as returned by the backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SongResponse {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    /// Duration in seconds
    pub duration: Option<f64>,
    pub format: Option<String>,
    pub album_art_path: Option<String>,
}

impl SongResponse {
    /// Convert to a playable `Track`, resolving artwork against `base_url`
    pub fn into_track(self, base_url: &str) -> Track {
        let artwork = self
            .album_art_path
            .as_ref()
            .map(|_| format!("{}/api/stream/album-art/{}/", base_url, self.id));

        let mut track = Track::new(self.id, self.title, self.artist, self.duration.unwrap_or(0.0));
        if let Some(album) = self.album.filter(|a| !a.trim().is_empty()) {
            track = track.with_album(album);
        }
        if let Some(artwork) = artwork {
            track = track.with_artwork(artwork);
        }
        track.genre = self.genre;
        track.year = self.year;
        track
    }
}

/// A playlist with its songs, as returned by the backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub songs: Vec<SongResponse>,
}

/// A playlist resolved to playable tracks.
#[derive(Debug, Clone)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub tracks: Vec<Track>,
}

// =============================================================================
// Listening Types
// =============================================================================

/// Response from starting a listening session.
#[derive(Debug, Deserialize)]
pub struct ListenStartResponse {
    pub session_id: String,
}

/// Request body for completing a listening session.
#[derive(Debug, Serialize)]
pub struct CompleteSessionRequest {
    pub duration_seconds: f64,
}

/// Track domain type
use super::ids::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playable track metadata
///
/// Supplied by the catalog (playlist cache, song listing) and only read by
/// the player. Queues share tracks as `Arc<Track>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name ("Unknown Album" when the catalog has none)
    pub album: String,

    /// Duration in seconds (never negative)
    pub duration_secs: f64,

    /// Artwork reference (URL or backend path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,

    /// Genre
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    /// Release year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Album label used when the catalog omits one
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

impl Track {
    /// Create a new track
    ///
    /// Negative or non-finite durations are stored as zero.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_secs: f64,
    ) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            artist: artist.into(),
            album: UNKNOWN_ALBUM.to_string(),
            duration_secs: sanitize_duration(duration_secs),
            artwork: None,
            genre: None,
            year: None,
        }
    }

    /// Set the album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the artwork reference
    #[must_use]
    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }

    /// Track duration
    ///
    /// Saturates at `Duration::MAX` for durations too large to represent.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(sanitize_duration(self.duration_secs)).unwrap_or(Duration::MAX)
    }
}

fn sanitize_duration(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_track_defaults() {
        let track = Track::new("t1", "Song", "Artist", 180.0);
        assert_eq!(track.album, UNKNOWN_ALBUM);
        assert!(track.artwork.is_none());
        assert_eq!(track.duration(), Duration::from_secs(180));
    }

    #[test]
    fn negative_duration_clamped_to_zero() {
        let track = Track::new("t1", "Song", "Artist", -5.0);
        assert_eq!(track.duration_secs, 0.0);
        assert_eq!(track.duration(), Duration::ZERO);
    }

    #[test]
    fn nan_duration_clamped_to_zero() {
        let track = Track::new("t1", "Song", "Artist", f64::NAN);
        assert_eq!(track.duration(), Duration::ZERO);
    }

    #[test]
    fn huge_duration_saturates() {
        let track = Track::new("t1", "Song", "Artist", 1e30);
        assert_eq!(track.duration(), Duration::MAX);
    }

    #[test]
    fn builder_sets_album_and_artwork() {
        let track = Track::new("t1", "Song", "Artist", 1.0)
            .with_album("Album")
            .with_artwork("/api/stream/album-art/t1");
        assert_eq!(track.album, "Album");
        assert_eq!(track.artwork.as_deref(), Some("/api/stream/album-art/t1"));
    }
}

//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use streamflow_core::{PlaylistId, Track};

/// Playback engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    Idle,

    /// Fetching the current track's audio
    Loading,

    /// Audio loaded, not yet started
    Ready,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Track reached its natural end
    Ended,

    /// Last load failed
    Errored,
}

impl PlaybackState {
    /// Whether seeking is meaningful in this state
    pub fn is_seekable(self) -> bool {
        matches!(self, Self::Ready | Self::Playing | Self::Paused)
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Next mode in the `off → all → one → off` cycle
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

/// Configuration for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial volume (0-100, default: 75)
    pub volume: u8,

    /// Initial shuffle flag (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 75,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

/// Read-only view of the whole player, for UI rendering
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    pub current_track: Option<Arc<Track>>,
    pub is_playing: bool,
    /// Elapsed fraction of the current track (0.0-1.0)
    pub progress: f64,
    pub volume: u8,
    pub muted: bool,
    pub repeat: RepeatMode,
    pub shuffle: bool,
    /// Queue in play order; `None` for a standalone track
    pub queue: Option<Vec<Arc<Track>>>,
    pub cursor: Option<usize>,
    pub context: Option<PlaylistId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.volume, 75);
        assert!(!config.shuffle);
        assert_eq!(config.repeat, RepeatMode::Off);
    }

    #[test]
    fn repeat_cycles_through_all_modes() {
        assert_eq!(RepeatMode::Off.cycle(), RepeatMode::All);
        assert_eq!(RepeatMode::All.cycle(), RepeatMode::One);
        assert_eq!(RepeatMode::One.cycle(), RepeatMode::Off);
    }

    #[test]
    fn only_loaded_states_are_seekable() {
        assert!(PlaybackState::Ready.is_seekable());
        assert!(PlaybackState::Playing.is_seekable());
        assert!(PlaybackState::Paused.is_seekable());
        assert!(!PlaybackState::Idle.is_seekable());
        assert!(!PlaybackState::Loading.is_seekable());
        assert!(!PlaybackState::Ended.is_seekable());
        assert!(!PlaybackState::Errored.is_seekable());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: PlayerConfig = serde_json::from_str(r#"{"repeat":"all"}"#).unwrap();
        assert_eq!(config.repeat, RepeatMode::All);
        assert_eq!(config.volume, 75);
    }
}

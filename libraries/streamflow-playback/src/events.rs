//! Player events
//!
//! Events are queued as state changes happen and drained by the UI:
//! - State changes (loading, playing, paused, ...)
//! - Track changes (new track set, or cleared)
//! - Queue and mode changes
//! - Volume changes
//! - Errors that aborted a transition

use crate::types::{PlaybackState, RepeatMode};
use serde::{Deserialize, Serialize};
use streamflow_core::TrackId;

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// Engine state changed
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// Current track changed
    TrackChanged {
        /// ID of the new track, `None` when playback was cleared
        track_id: Option<TrackId>,
    },

    /// Queue contents or cursor changed
    QueueChanged {
        /// Number of queued tracks
        length: usize,
        /// Cursor in play order
        cursor: Option<usize>,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        muted: bool,
    },

    /// Shuffle or repeat mode changed
    ModesChanged {
        shuffle: bool,
        repeat: RepeatMode,
    },

    /// A transition failed
    Error {
        /// Error message
        message: String,
    },
}

/// Pending event buffer
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    pending: Vec<PlayerEvent>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: PlayerEvent) {
        self.pending.push(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending)
    }
}

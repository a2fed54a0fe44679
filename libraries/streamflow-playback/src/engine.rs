//! Playback engine
//!
//! Owns the "now playing" slot: current track, its loaded audio, progress
//! and volume. Every state change goes through [`PlaybackEngine::transition`].
//!
//! ```text
//!          set_track(Some)         load ok            play
//!   Idle ─────────────────▶ Loading ───────▶ Ready ─────────▶ Playing ◀──┐
//!    ▲                        │                                 │  ▲     │
//!    │ set_track(None)        │ load err                  pause │  │play │
//!    │ (from any state)       ▼                                 ▼  │     │
//!    └──────────────────── Errored                           Paused      │
//!                                               media end               │
//!                                   Playing ─────────────▶ Ended ───────┘
//!                                                              play (rewind)
//! ```
//!
//! Loads are asynchronous and run outside the engine: `set_track` hands out
//! a [`LoadTicket`], and the result comes back through `complete_load`.
//! A ticket from an earlier `set_track` is stale; its audio is released and
//! ignored.

use crate::error::{PlaybackError, Result};
use crate::events::{EventQueue, PlayerEvent};
use crate::output::MediaOutput;
use crate::source::PlayableHandle;
use crate::types::PlaybackState;
use crate::volume::Volume;
use std::sync::Arc;
use std::time::Duration;
use streamflow_core::{Track, TrackId};

/// Identifies one load request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub track_id: TrackId,
}

/// Result of `play()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Now playing; `first_play` is true the first time this load plays
    Started { first_play: bool },

    /// Audio still loading; playback starts once it is ready
    Deferred,

    AlreadyPlaying,
}

/// Result of applying a finished load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Superseded by a newer track change
    Stale,

    /// Audio ready, waiting for `play()`
    Ready,

    /// Audio ready and playback started (play was requested while loading)
    Started { first_play: bool },
}

pub struct PlaybackEngine {
    state: PlaybackState,
    current: Option<Arc<Track>>,
    handle: Option<PlayableHandle>,
    output: Box<dyn MediaOutput>,

    /// Bumped on every track change
    generation: u64,

    /// Play as soon as the pending load completes
    play_when_ready: bool,

    /// Whether the current load has reached Playing at least once
    played: bool,

    progress: f64,
    volume: Volume,
    events: EventQueue,
}

impl PlaybackEngine {
    pub fn new(mut output: Box<dyn MediaOutput>, volume: i32) -> Self {
        let volume = Volume::new(volume);
        output.set_gain(volume.gain());

        Self {
            state: PlaybackState::Idle,
            current: None,
            handle: None,
            output,
            generation: 0,
            play_when_ready: false,
            played: false,
            progress: 0.0,
            volume,
            events: EventQueue::default(),
        }
    }

    // ===== Track =====

    /// Replace the current track
    ///
    /// The previous audio is detached and released before this returns.
    /// Progress resets to 0; volume is kept. `Some` moves to Loading and
    /// returns the ticket the caller must load; `None` moves to Idle.
    pub fn set_track(&mut self, track: Option<Arc<Track>>) -> Option<LoadTicket> {
        self.release_audio();
        self.generation += 1;
        self.play_when_ready = false;
        self.played = false;
        self.progress = 0.0;

        let track_id = track.as_ref().map(|t| t.id.clone());
        self.current = track;
        self.events.push(PlayerEvent::TrackChanged {
            track_id: track_id.clone(),
        });

        match track_id {
            Some(track_id) => {
                self.transition(PlaybackState::Loading);
                Some(LoadTicket {
                    generation: self.generation,
                    track_id,
                })
            }
            None => {
                self.transition(PlaybackState::Idle);
                None
            }
        }
    }

    /// Same as `set_track(None)`
    pub fn stop(&mut self) {
        self.set_track(None);
    }

    /// Apply the result of a load started from `ticket`
    ///
    /// # Errors
    /// Returns the load error (engine moves to Errored), or a media error if
    /// the output rejects the audio or a requested autoplay. Either way
    /// nothing is left playing.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<PlayableHandle>,
    ) -> Result<LoadOutcome> {
        if ticket.generation != self.generation || self.state != PlaybackState::Loading {
            tracing::debug!(
                track_id = %ticket.track_id,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale audio load"
            );
            return Ok(LoadOutcome::Stale);
        }

        let handle = match result {
            Ok(handle) => handle,
            Err(e) => return Err(self.fail(e)),
        };

        if let Err(e) = self.output.attach(&handle) {
            return Err(self.fail(e));
        }
        self.output.set_gain(self.volume.gain());
        self.handle = Some(handle);
        self.transition(PlaybackState::Ready);

        if !std::mem::take(&mut self.play_when_ready) {
            return Ok(LoadOutcome::Ready);
        }

        match self.play()? {
            PlayOutcome::Started { first_play } => Ok(LoadOutcome::Started { first_play }),
            PlayOutcome::Deferred | PlayOutcome::AlreadyPlaying => Ok(LoadOutcome::Ready),
        }
    }

    fn fail(&mut self, error: PlaybackError) -> PlaybackError {
        tracing::warn!(
            track_id = ?self.current.as_ref().map(|t| &t.id),
            error = %error,
            "Audio load failed"
        );
        self.release_audio();
        self.play_when_ready = false;
        self.transition(PlaybackState::Errored);
        self.events.push(PlayerEvent::Error {
            message: error.to_string(),
        });
        error
    }

    fn release_audio(&mut self) {
        if self.handle.is_some() {
            self.output.detach();
            self.handle = None;
        }
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// From Ended the track is rewound first. While Loading the request is
    /// remembered and honoured when the audio arrives.
    ///
    /// # Errors
    /// - `NoTrackLoaded` in Idle or Errored
    /// - `Media` if the output refuses; the state is left unchanged
    pub fn play(&mut self) -> Result<PlayOutcome> {
        match self.state {
            PlaybackState::Playing => Ok(PlayOutcome::AlreadyPlaying),
            PlaybackState::Loading => {
                self.play_when_ready = true;
                Ok(PlayOutcome::Deferred)
            }
            PlaybackState::Idle | PlaybackState::Errored => Err(PlaybackError::NoTrackLoaded),
            PlaybackState::Ended => {
                self.output.seek(Duration::ZERO);
                self.progress = 0.0;
                self.start_output()
            }
            PlaybackState::Ready | PlaybackState::Paused => self.start_output(),
        }
    }

    fn start_output(&mut self) -> Result<PlayOutcome> {
        if let Err(e) = self.output.play() {
            tracing::warn!(error = %e, "Media output refused to play");
            self.events.push(PlayerEvent::Error {
                message: e.to_string(),
            });
            return Err(e);
        }

        let first_play = !self.played;
        self.played = true;
        self.transition(PlaybackState::Playing);
        Ok(PlayOutcome::Started { first_play })
    }

    /// Pause playback
    ///
    /// Returns true if playback was running. A pending autoplay is cancelled.
    pub fn pause(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing => {
                self.output.pause();
                self.transition(PlaybackState::Paused);
                true
            }
            PlaybackState::Loading => {
                self.play_when_ready = false;
                false
            }
            _ => false,
        }
    }

    /// The media layer reached the end of the track
    ///
    /// Returns false (and changes nothing) unless the engine was Playing.
    pub fn mark_ended(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        self.progress = 1.0;
        self.transition(PlaybackState::Ended);
        true
    }

    // ===== Seek & Progress =====

    /// Seek to a fraction of the track
    ///
    /// Out-of-range fractions are clamped to [0, 1]. Returns the applied
    /// fraction.
    ///
    /// # Errors
    /// Returns `InvalidOperation` unless Ready, Playing or Paused
    pub fn set_progress(&mut self, fraction: f64) -> Result<f64> {
        if !self.state.is_seekable() {
            return Err(PlaybackError::InvalidOperation(format!(
                "cannot seek while {:?}",
                self.state
            )));
        }

        let fraction = clamp_fraction(fraction);
        let offset = self
            .current
            .as_ref()
            .map_or(Duration::ZERO, |t| offset_of(t, fraction));

        self.progress = fraction;
        self.output.seek(offset);
        tracing::debug!(fraction, offset_secs = offset.as_secs_f64(), "Seek");
        Ok(fraction)
    }

    /// Position report from the media layer
    pub fn on_media_progress(&mut self, position: Duration) {
        if !matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            return;
        }
        let Some(track) = &self.current else {
            return;
        };
        if track.duration_secs > 0.0 {
            self.progress = clamp_fraction(position.as_secs_f64() / track.duration_secs);
        }
    }

    // ===== Volume =====

    /// Set volume, clamped to 0-100; returns the applied level
    pub fn set_volume(&mut self, level: i32) -> u8 {
        let level = self.volume.set_level(level);
        self.apply_volume();
        level
    }

    /// Toggle mute; returns the new mute state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.volume.toggle_mute();
        self.apply_volume();
        muted
    }

    fn apply_volume(&mut self) {
        self.output.set_gain(self.volume.gain());
        self.events.push(PlayerEvent::VolumeChanged {
            level: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    // ===== State =====

    fn transition(&mut self, to: PlaybackState) {
        if self.state == to {
            return;
        }
        tracing::debug!(from = ?self.state, to = ?to, "Playback state transition");
        self.state = to;
        self.events.push(PlayerEvent::StateChanged { state: to });
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Whether playback will start once the pending load completes
    pub fn is_play_pending(&self) -> bool {
        self.play_when_ready
    }

    pub fn current_track(&self) -> Option<&Arc<Track>> {
        self.current.as_ref()
    }

    /// Elapsed fraction of the current track (0.0-1.0)
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub(crate) fn push_event(&mut self, event: PlayerEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.events.drain()
    }
}

/// Position `fraction` of the way through `track`
fn offset_of(track: &Track, fraction: f64) -> Duration {
    Duration::try_from_secs_f64(track.duration_secs * fraction).unwrap_or(Duration::MAX)
}

fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

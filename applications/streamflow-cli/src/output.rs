//! Wall-clock playback simulation
//!
//! There is no audio device in the terminal player. `SimulatedOutput` wraps
//! a `SilentOutput` the engine and a ticker task share; the ticker advances
//! the position while playing and reports the natural end of each track.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use streamflow_core::TrackId;
use streamflow_playback::{
    MediaOutput, PlayableHandle, PlayerFacade, PlayerSnapshot, SilentOutput,
};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Cloneable `MediaOutput` backed by a shared `SilentOutput`
#[derive(Debug, Clone, Default)]
pub struct SimulatedOutput {
    deck: Arc<Mutex<SilentOutput>>,
}

impl SimulatedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn deck(&self) -> MutexGuard<'_, SilentOutput> {
        match self.deck.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Move the position forward if playing
    ///
    /// Returns the attached track with its new position, read under one lock.
    pub fn advance(&self, by: Duration) -> Option<(TrackId, Duration)> {
        let mut deck = self.deck();
        if !deck.is_playing() {
            return None;
        }
        let track_id = deck.attached()?.clone();
        let position = deck.position().saturating_add(by);
        deck.seek(position);
        Some((track_id, position))
    }

    pub fn is_playing(&self) -> bool {
        self.deck().is_playing()
    }

    pub fn position(&self) -> Duration {
        self.deck().position()
    }

    pub fn attached(&self) -> Option<TrackId> {
        self.deck().attached().cloned()
    }

    pub fn gain(&self) -> f32 {
        self.deck().gain()
    }
}

impl MediaOutput for SimulatedOutput {
    fn attach(&mut self, handle: &PlayableHandle) -> streamflow_playback::Result<()> {
        debug!(track_id = %handle.track_id(), bytes = handle.len(), "Attached audio");
        self.deck().attach(handle)
    }

    fn play(&mut self) -> streamflow_playback::Result<()> {
        self.deck().play()
    }

    fn pause(&mut self) {
        self.deck().pause();
    }

    fn seek(&mut self, position: Duration) {
        self.deck().seek(position);
    }

    fn set_gain(&mut self, gain: f32) {
        self.deck().set_gain(gain);
    }

    fn detach(&mut self) {
        self.deck().detach();
    }
}

/// Advance `output` every `period` and feed progress and track ends to
/// `player`
///
/// Tracks with an unknown (zero) duration never end on their own.
pub fn spawn_ticker(
    player: Arc<PlayerFacade>,
    output: SimulatedOutput,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let Some((attached, position)) = output.advance(period) else {
                continue;
            };
            // The player may have switched tracks since the position was read
            let current = player.snapshot().await.current_track;
            if current.as_ref().map(|t| &t.id) != Some(&attached) {
                continue;
            }
            player.on_media_progress(position).await;

            let snapshot = player.snapshot().await;
            if reached_end(&attached, position, &snapshot) {
                if let Err(e) = player.on_media_ended().await {
                    warn!(track_id = %attached, error = %e, "Failed to advance after track end");
                }
            }
        }
    })
}

/// Whether `position` on `attached` is the natural end of the playing track
///
/// Only true when `attached` is still the current track, so an overrun of a
/// track that was just replaced never ends its successor.
fn reached_end(attached: &TrackId, position: Duration, snapshot: &PlayerSnapshot) -> bool {
    let Some(track) = snapshot.current_track.as_ref() else {
        return false;
    };
    let duration = track.duration();
    snapshot.is_playing && &track.id == attached && !duration.is_zero() && position >= duration
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamflow_core::Track;
    use streamflow_playback::{PlaybackState, RepeatMode};

    #[test]
    fn advance_only_moves_while_playing() {
        let output = SimulatedOutput::new();
        assert_eq!(output.advance(Duration::from_secs(1)), None);
        assert_eq!(output.position(), Duration::ZERO);
    }

    #[test]
    fn clones_share_state() {
        let output = SimulatedOutput::new();
        let mut engine_side: Box<dyn MediaOutput> = Box::new(output.clone());

        engine_side.set_gain(0.25);
        engine_side.seek(Duration::from_secs(7));

        assert_eq!(output.gain(), 0.25);
        assert_eq!(output.position(), Duration::from_secs(7));
        assert!(output.attached().is_none());
    }

    fn snapshot(current: Option<Track>, is_playing: bool) -> PlayerSnapshot {
        PlayerSnapshot {
            state: if is_playing {
                PlaybackState::Playing
            } else {
                PlaybackState::Paused
            },
            current_track: current.map(Arc::new),
            is_playing,
            progress: 0.0,
            volume: 75,
            muted: false,
            repeat: RepeatMode::Off,
            shuffle: false,
            queue: None,
            cursor: None,
            context: None,
        }
    }

    #[test]
    fn end_is_reached_at_duration_of_attached_track() {
        let a = TrackId::from("a");
        let playing = snapshot(Some(Track::new("a", "A", "X", 10.0)), true);

        assert!(!reached_end(&a, Duration::from_secs(9), &playing));
        assert!(reached_end(&a, Duration::from_secs(10), &playing));

        let paused = snapshot(Some(Track::new("a", "A", "X", 10.0)), false);
        assert!(!reached_end(&a, Duration::from_secs(12), &paused));
    }

    #[test]
    fn overrun_of_replaced_track_does_not_end_successor() {
        // Old track "a" ran 30s; "b" is only 20s long and just started
        let stale = TrackId::from("a");
        let successor = snapshot(Some(Track::new("b", "B", "X", 20.0)), true);
        assert!(!reached_end(&stale, Duration::from_secs(30), &successor));

        let b = TrackId::from("b");
        assert!(reached_end(&b, Duration::from_secs(20), &successor));
    }

    #[test]
    fn unknown_duration_never_ends() {
        let a = TrackId::from("a");
        let unknown = snapshot(Some(Track::new("a", "A", "X", 0.0)), true);
        assert!(!reached_end(&a, Duration::from_secs(3600), &unknown));
        assert!(!reached_end(&a, Duration::from_secs(1), &snapshot(None, true)));
    }
}

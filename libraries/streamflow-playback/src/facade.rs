//! Player facade
//!
//! The one object a UI talks to. It owns the engine, the queue and the
//! session tracker behind a single async mutex, so operations are
//! serialized. The only suspension point is the audio load, which runs with
//! the lock released; its result is applied only if no newer track change
//! happened in the meantime.
//!
//! Track changes always run in the same order: the outgoing session is
//! completed, then the old audio is released, then the new load starts.

use crate::engine::{LoadOutcome, LoadTicket, PlayOutcome, PlaybackEngine};
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::output::MediaOutput;
use crate::queue::{QueueManager, QueueStep};
use crate::session::{Clock, ListeningSessionTracker, MonotonicClock, ReportSink};
use crate::source::{AudioSource, PlayableHandle};
use crate::types::{PlaybackState, PlayerConfig, PlayerSnapshot, RepeatMode};
use std::sync::Arc;
use std::time::Duration;
use streamflow_core::{PlaylistId, Track};
use tokio::sync::Mutex;

/// Public playback API
pub struct PlayerFacade {
    inner: Mutex<Inner>,
    source: AudioSource,
}

struct Inner {
    engine: PlaybackEngine,
    queue: QueueManager,
    tracker: ListeningSessionTracker,

    /// Playlist the queue came from, reported with each session
    context: Option<PlaylistId>,
}

impl PlayerFacade {
    pub fn new(
        config: &PlayerConfig,
        source: AudioSource,
        output: Box<dyn MediaOutput>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self::with_clock(config, source, output, sink, Arc::new(MonotonicClock))
    }

    pub fn with_clock(
        config: &PlayerConfig,
        source: AudioSource,
        output: Box<dyn MediaOutput>,
        sink: Arc<dyn ReportSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let inner = Inner {
            engine: PlaybackEngine::new(output, i32::from(config.volume)),
            queue: QueueManager::new(config.shuffle, config.repeat),
            tracker: ListeningSessionTracker::with_clock(sink, clock),
            context: None,
        };

        Self {
            inner: Mutex::new(inner),
            source,
        }
    }

    // ===== Starting playback =====

    /// Play a single track with no queue
    ///
    /// Any queue is cleared, so skipping afterwards stops playback.
    pub async fn play_track(&self, track: impl Into<Arc<Track>>) -> Result<()> {
        let track = track.into();
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.queue.clear();
            inner.context = None;
            inner.emit_queue();
            inner.begin(Some(track))
        };
        self.load(ticket).await
    }

    /// Replace the queue and play from `start_index`
    ///
    /// # Errors
    /// Returns `InvalidIndex` when `start_index` is out of range; nothing
    /// about the current playback changes in that case.
    pub async fn play_queue(
        &self,
        tracks: Vec<Arc<Track>>,
        start_index: usize,
        context: Option<PlaylistId>,
    ) -> Result<()> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            let start = inner.queue.start_queue(tracks, start_index)?;
            inner.context = context;
            inner.emit_queue();
            inner.begin(Some(start))
        };
        self.load(ticket).await
    }

    // ===== Transport =====

    /// Pause if playing, otherwise play
    ///
    /// Pausing completes the open listening session before returning. With
    /// nothing loaded, the queue's current track is reloaded (after a
    /// terminal skip, or a failed load). Returns the resulting state.
    pub async fn toggle_play_pause(&self) -> Result<PlaybackState> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            match inner.engine.state() {
                PlaybackState::Playing => {
                    inner.engine.pause();
                    inner.tracker.complete_elapsed();
                    return Ok(inner.engine.state());
                }
                PlaybackState::Loading => {
                    if inner.engine.is_play_pending() {
                        inner.engine.pause();
                    } else {
                        inner.engine.play()?;
                    }
                    return Ok(inner.engine.state());
                }
                PlaybackState::Ready | PlaybackState::Paused | PlaybackState::Ended => {
                    let outcome = inner.engine.play()?;
                    if let PlayOutcome::Started { first_play } = outcome {
                        inner.on_started(first_play);
                    }
                    return Ok(inner.engine.state());
                }
                PlaybackState::Idle | PlaybackState::Errored => {
                    let restart = inner
                        .engine
                        .current_track()
                        .cloned()
                        .or_else(|| inner.queue.current())
                        .ok_or(PlaybackError::NoTrackLoaded)?;
                    tracing::info!(track_id = %restart.id, "Restarting playback");
                    inner.begin(Some(restart))
                }
            }
        };

        self.load(ticket).await?;
        Ok(self.inner.lock().await.engine.state())
    }

    /// Skip to the next track per the queue's repeat mode
    ///
    /// A standalone track, or the end of a queue with repeat off, stops
    /// playback. The queue itself is kept.
    pub async fn skip_next(&self) -> Result<()> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            let step = inner.queue.next();
            inner.follow(step)
        };
        self.load(ticket).await
    }

    /// Skip to the previous track per the queue's repeat mode
    pub async fn skip_previous(&self) -> Result<()> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            let step = inner.queue.previous();
            inner.follow(step)
        };
        self.load(ticket).await
    }

    /// The media layer finished the current track
    ///
    /// Advances like `skip_next`. Ignored unless something was playing.
    pub async fn on_media_ended(&self) -> Result<()> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            if !inner.engine.mark_ended() {
                return Ok(());
            }
            inner.tracker.complete_elapsed();
            let step = inner.queue.next();
            inner.follow(step)
        };
        self.load(ticket).await
    }

    /// Stop everything and return to Idle
    ///
    /// Completes the open session, releases the audio and clears the queue.
    /// Volume, shuffle and repeat are kept.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        inner.tracker.complete_elapsed();
        inner.engine.stop();
        inner.queue.clear();
        inner.context = None;
        inner.emit_queue();
        tracing::info!("Playback stopped");
    }

    // ===== Modes =====

    pub async fn toggle_shuffle(&self) -> bool {
        let mut inner = self.inner.lock().await;
        let shuffled = inner.queue.toggle_shuffle();
        inner.emit_modes();
        inner.emit_queue();
        shuffled
    }

    pub async fn toggle_repeat(&self) -> RepeatMode {
        let mut inner = self.inner.lock().await;
        let repeat = inner.queue.toggle_repeat();
        inner.emit_modes();
        repeat
    }

    // ===== Position & Volume =====

    /// Seek to a fraction of the current track, clamped to [0, 1]
    pub async fn set_progress(&self, fraction: f64) -> Result<f64> {
        self.inner.lock().await.engine.set_progress(fraction)
    }

    pub async fn on_media_progress(&self, position: Duration) {
        self.inner.lock().await.engine.on_media_progress(position);
    }

    /// Set volume, clamped to 0-100; returns the applied level
    pub async fn set_volume(&self, level: i32) -> u8 {
        self.inner.lock().await.engine.set_volume(level)
    }

    pub async fn toggle_mute(&self) -> bool {
        self.inner.lock().await.engine.toggle_mute()
    }

    // ===== Queries =====

    pub async fn snapshot(&self) -> PlayerSnapshot {
        let inner = self.inner.lock().await;
        let engine = &inner.engine;
        let queue = &inner.queue;

        PlayerSnapshot {
            state: engine.state(),
            current_track: engine.current_track().cloned(),
            is_playing: engine.is_playing(),
            progress: engine.progress(),
            volume: engine.volume(),
            muted: engine.is_muted(),
            repeat: queue.repeat(),
            shuffle: queue.is_shuffled(),
            queue: (!queue.is_empty()).then(|| queue.tracks()),
            cursor: queue.cursor(),
            context: inner.context.clone(),
        }
    }

    /// Take all events queued since the last call
    pub async fn drain_events(&self) -> Vec<PlayerEvent> {
        self.inner.lock().await.engine.drain_events()
    }

    /// Live audio handles held by this player (0 or 1 once loads settle)
    pub fn live_handles(&self) -> usize {
        self.source.live_handles()
    }

    // ===== Loading =====

    async fn load(&self, ticket: Option<LoadTicket>) -> Result<()> {
        let Some(ticket) = ticket else {
            return Ok(());
        };

        let result = self.source.load(&ticket.track_id).await;
        self.inner.lock().await.apply_load(&ticket, result)
    }
}

impl Inner {
    /// Switch to `track` and request playback
    ///
    /// Returns the ticket to load, if any.
    fn begin(&mut self, track: Option<Arc<Track>>) -> Option<LoadTicket> {
        self.tracker.complete_elapsed();
        let ticket = self.engine.set_track(track);
        if ticket.is_some() {
            // Loading: play() only records the request
            match self.engine.play() {
                Ok(PlayOutcome::Deferred) => {}
                other => tracing::warn!(outcome = ?other, "Unexpected play outcome while loading"),
            }
        }
        ticket
    }

    fn follow(&mut self, step: QueueStep) -> Option<LoadTicket> {
        let ticket = match step {
            QueueStep::Advance(track) | QueueStep::Replay(track) => self.begin(Some(track)),
            QueueStep::Terminal => {
                tracing::info!("Reached end of queue");
                self.begin(None)
            }
        };
        self.emit_queue();
        ticket
    }

    fn apply_load(&mut self, ticket: &LoadTicket, result: Result<PlayableHandle>) -> Result<()> {
        match self.engine.complete_load(ticket, result)? {
            LoadOutcome::Started { first_play } => self.on_started(first_play),
            LoadOutcome::Ready | LoadOutcome::Stale => {}
        }
        Ok(())
    }

    /// Entered Playing: open a session, and count the play once per load
    fn on_started(&mut self, first_play: bool) {
        let Some(track_id) = self.engine.current_track().map(|t| t.id.clone()) else {
            return;
        };
        self.tracker.start_session(track_id.clone(), self.context.clone());
        if first_play {
            self.tracker.notify_played(&track_id);
        }
    }

    fn emit_queue(&mut self) {
        let event = PlayerEvent::QueueChanged {
            length: self.queue.len(),
            cursor: self.queue.cursor(),
        };
        self.engine.push_event(event);
    }

    fn emit_modes(&mut self) {
        let event = PlayerEvent::ModesChanged {
            shuffle: self.queue.is_shuffled(),
            repeat: self.queue.repeat(),
        };
        self.engine.push_event(event);
    }
}

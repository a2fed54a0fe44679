//! Listening-session bookkeeping
//!
//! A session is one contiguous interval of a track being audible, bounded by
//! play and pause/end/skip/stop. At most one session is open; opening a new
//! one first closes a stale one with its own elapsed time.

use std::sync::Arc;
use std::time::Instant;
use streamflow_core::{PlaylistId, SessionKey, TrackId};

/// Monotonic time source
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// `Instant::now`
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Destination for session and play-count reports
///
/// Calls must return immediately; delivery happens elsewhere and failures
/// never reach the caller.
pub trait ReportSink: Send + Sync {
    /// A session was opened under a local key
    fn session_started(&self, key: SessionKey, track_id: &TrackId, context_id: Option<&PlaylistId>);

    /// A session was closed after `duration_secs` of listening
    fn session_completed(&self, key: SessionKey, track_id: &TrackId, duration_secs: f64);

    /// A loaded track started playing for the first time
    fn track_played(&self, track_id: &TrackId);
}

/// An open listening session
#[derive(Debug, Clone)]
pub struct ListeningSession {
    /// Local key; the backend id is resolved by the report sink
    pub key: SessionKey,
    pub track_id: TrackId,
    pub context_id: Option<PlaylistId>,
    pub started_at: Instant,
}

/// Opens and closes listening sessions, forwarding each to a `ReportSink`
pub struct ListeningSessionTracker {
    sink: Arc<dyn ReportSink>,
    clock: Arc<dyn Clock>,
    open: Option<ListeningSession>,
}

impl ListeningSessionTracker {
    pub fn new(sink: Arc<dyn ReportSink>) -> Self {
        Self::with_clock(sink, Arc::new(MonotonicClock))
    }

    pub fn with_clock(sink: Arc<dyn ReportSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sink,
            clock,
            open: None,
        }
    }

    /// Open a session for `track_id`
    ///
    /// A session that is still open is completed first with its own elapsed
    /// time, so its listening time is not lost.
    pub fn start_session(&mut self, track_id: TrackId, context_id: Option<PlaylistId>) -> SessionKey {
        if self.open.is_some() {
            tracing::debug!("Completing stale listening session before opening a new one");
            self.complete_elapsed();
        }

        let session = ListeningSession {
            key: SessionKey::generate(),
            track_id,
            context_id,
            started_at: self.clock.now(),
        };

        self.sink
            .session_started(session.key, &session.track_id, session.context_id.as_ref());
        tracing::debug!(key = %session.key, track_id = %session.track_id, "Listening session started");

        let key = session.key;
        self.open = Some(session);
        key
    }

    /// Close the open session with an explicit duration
    ///
    /// Returns `false` without reporting anything if no session is open.
    /// Negative or non-finite durations are reported as zero.
    pub fn complete_session(&mut self, duration_secs: f64) -> bool {
        let Some(session) = self.open.take() else {
            return false;
        };

        let duration_secs = if duration_secs.is_finite() {
            duration_secs.max(0.0)
        } else {
            0.0
        };

        self.sink
            .session_completed(session.key, &session.track_id, duration_secs);
        tracing::debug!(
            key = %session.key,
            track_id = %session.track_id,
            duration_secs,
            "Listening session completed"
        );
        true
    }

    /// Close the open session with the time elapsed since it started
    pub fn complete_elapsed(&mut self) -> bool {
        let Some(started_at) = self.open.as_ref().map(|s| s.started_at) else {
            return false;
        };
        let elapsed = self.clock.now().saturating_duration_since(started_at);
        self.complete_session(elapsed.as_secs_f64())
    }

    /// Report one play of a track
    pub fn notify_played(&self, track_id: &TrackId) {
        self.sink.track_played(track_id);
    }

    pub fn open_session(&self) -> Option<&ListeningSession> {
        self.open.as_ref()
    }
}

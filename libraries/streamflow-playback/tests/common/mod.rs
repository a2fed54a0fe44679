//! Shared fakes for playback integration tests
//!
//! Transport, media output and report sink all write into one `Journal`, so
//! tests can assert on the relative order of side effects.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use streamflow_core::{
    AudioPayload, AudioTransport, PlaylistId, SessionKey, StaticCredentials, Track, TrackId,
};
use streamflow_playback::{
    AudioSource, Clock, MediaOutput, PlayableHandle, PlayerConfig, PlayerFacade, ReportSink,
};
use tokio::sync::Notify;

// ===== Journal =====

#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }

    /// Index of the first entry equal to `entry`
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }

    /// Durations of every reported session completion, in order
    pub fn completions(&self) -> Vec<f64> {
        self.entries()
            .iter()
            .filter_map(|e| e.strip_prefix("complete:"))
            .filter_map(|rest| rest.rsplit(':').next())
            .filter_map(|d| d.parse().ok())
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

// ===== Transport =====

pub struct FakeTransport {
    journal: Journal,
    responses: Mutex<HashMap<String, AudioPayload>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeTransport {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            responses: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Serve `payload` for `track_id` instead of the default audio
    pub fn respond(&self, track_id: &str, payload: AudioPayload) {
        self.responses
            .lock()
            .unwrap()
            .insert(track_id.to_string(), payload);
    }

    /// Hold fetches of `track_id` until the returned gate is notified
    pub fn gate(&self, track_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(track_id.to_string(), gate.clone());
        gate
    }
}

#[async_trait]
impl AudioTransport for FakeTransport {
    async fn fetch(
        &self,
        track_id: &TrackId,
        _bearer_token: &str,
    ) -> streamflow_core::Result<AudioPayload> {
        self.journal.push(format!("fetch:{track_id}"));

        let gate = self.gates.lock().unwrap().get(track_id.as_str()).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let payload = self
            .responses
            .lock()
            .unwrap()
            .get(track_id.as_str())
            .cloned()
            .unwrap_or_else(|| AudioPayload::ok("audio/mpeg", vec![0xFF, 0xFB, 0x90, 0x00]));
        Ok(payload)
    }
}

// ===== Output =====

pub struct RecordingOutput {
    journal: Journal,
}

impl MediaOutput for RecordingOutput {
    fn attach(&mut self, handle: &PlayableHandle) -> streamflow_playback::Result<()> {
        self.journal.push(format!("attach:{}", handle.track_id()));
        Ok(())
    }

    fn play(&mut self) -> streamflow_playback::Result<()> {
        self.journal.push("output:play");
        Ok(())
    }

    fn pause(&mut self) {
        self.journal.push("output:pause");
    }

    fn seek(&mut self, position: Duration) {
        self.journal
            .push(format!("seek:{}", position.as_secs_f64()));
    }

    fn set_gain(&mut self, _gain: f32) {}

    fn detach(&mut self) {
        self.journal.push("detach");
    }
}

// ===== Reporting =====

pub struct RecordingSink {
    journal: Journal,
}

impl ReportSink for RecordingSink {
    fn session_started(&self, _key: SessionKey, track_id: &TrackId, context_id: Option<&PlaylistId>) {
        match context_id {
            Some(ctx) => self.journal.push(format!("start:{track_id}:{ctx}")),
            None => self.journal.push(format!("start:{track_id}")),
        }
    }

    fn session_completed(&self, _key: SessionKey, track_id: &TrackId, duration_secs: f64) {
        self.journal
            .push(format!("complete:{track_id}:{duration_secs}"));
    }

    fn track_played(&self, track_id: &TrackId) {
        self.journal.push(format!("played:{track_id}"));
    }
}

// ===== Clock =====

pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}

// ===== Harness =====

pub struct Harness {
    pub player: Arc<PlayerFacade>,
    pub transport: Arc<FakeTransport>,
    pub clock: Arc<ManualClock>,
    pub journal: Journal,
}

pub fn harness() -> Harness {
    harness_with(PlayerConfig::default(), StaticCredentials::new("test-token"))
}

pub fn harness_with(config: PlayerConfig, credentials: StaticCredentials) -> Harness {
    let journal = Journal::default();
    let transport = Arc::new(FakeTransport::new(journal.clone()));
    let clock = Arc::new(ManualClock::new());

    let source = AudioSource::new(transport.clone(), Arc::new(credentials));
    let player = PlayerFacade::with_clock(
        &config,
        source,
        Box::new(RecordingOutput {
            journal: journal.clone(),
        }),
        Arc::new(RecordingSink {
            journal: journal.clone(),
        }),
        clock.clone(),
    );

    Harness {
        player: Arc::new(player),
        transport,
        clock,
        journal,
    }
}

pub fn track(id: &str) -> Arc<Track> {
    Arc::new(Track::new(id, format!("Song {id}"), "Test Artist", 200.0).with_album("Test Album"))
}

pub fn tracks(ids: &[&str]) -> Vec<Arc<Track>> {
    ids.iter().map(|id| track(id)).collect()
}

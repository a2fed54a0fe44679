//! StreamFlow - Playback Core
//!
//! Platform-agnostic playback orchestration for the StreamFlow client.
//!
//! This crate provides:
//! - Authenticated audio loading with scoped, leak-checked handles
//! - A playback state machine (load, play, pause, seek, natural end)
//! - A play queue with shuffle and repeat (Off, All, One)
//! - Listening-session tracking with monotonic durations
//! - Fire-and-forget delivery of session and play-count reports
//! - Volume control (logarithmic, 0-100%, mute/unmute)
//!
//! # Architecture
//!
//! `streamflow-playback` never talks HTTP or to an audio device itself:
//! - Audio bytes come from an `AudioTransport`
//! - Credentials come from a `CredentialProvider`
//! - Reports go to a `SessionReporter` (via [`ReportingDispatcher`])
//! - Rendering happens in a [`MediaOutput`]
//!
//! [`PlayerFacade`] ties these together and is the only type a UI needs.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use streamflow_core::{SessionReporter, StaticCredentials, Track, AudioTransport};
//! use streamflow_playback::{
//!     AudioSource, PlayerConfig, PlayerFacade, ReportingDispatcher, SilentOutput,
//! };
//!
//! # async fn demo(
//! #     transport: Arc<dyn AudioTransport>,
//! #     reporter: Arc<dyn SessionReporter>,
//! # ) -> streamflow_playback::Result<()> {
//! let source = AudioSource::new(transport, Arc::new(StaticCredentials::new("token")));
//! let reports = Arc::new(ReportingDispatcher::spawn(reporter));
//! let player = PlayerFacade::new(
//!     &PlayerConfig::default(),
//!     source,
//!     Box::new(SilentOutput::new()),
//!     reports.clone(),
//! );
//!
//! let tracks = vec![
//!     Arc::new(Track::new("1", "Intro", "Some Artist", 183.0)),
//!     Arc::new(Track::new("2", "Outro", "Some Artist", 201.0)),
//! ];
//! player.play_queue(tracks, 0, None).await?;
//! player.toggle_play_pause().await?; // pause
//! player.skip_next().await?;
//! player.stop().await;
//!
//! reports.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod events;
mod facade;
mod output;
mod queue;
mod reporting;
mod session;
mod shuffle;
mod source;
mod types;
mod volume;

pub use engine::{LoadOutcome, LoadTicket, PlayOutcome, PlaybackEngine};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use facade::PlayerFacade;
pub use output::{MediaOutput, SilentOutput};
pub use queue::{QueueManager, QueueStep};
pub use reporting::ReportingDispatcher;
pub use session::{Clock, ListeningSession, ListeningSessionTracker, MonotonicClock, ReportSink};
pub use source::{is_audio_content_type, AudioSource, PlayableHandle};
pub use types::{PlaybackState, PlayerConfig, PlayerSnapshot, RepeatMode};
pub use volume::Volume;

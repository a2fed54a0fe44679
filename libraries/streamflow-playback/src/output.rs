//! Media output abstraction
//!
//! The engine drives whatever actually renders audio (a desktop audio
//! device, a browser element, nothing at all) through this trait.

use crate::error::Result;
use crate::source::PlayableHandle;
use std::time::Duration;
use streamflow_core::TrackId;

/// Platform media layer
///
/// Implementors receive the loaded handle on `attach` and must stop using it
/// after `detach`.
pub trait MediaOutput: Send {
    /// Prepare to render the given audio
    fn attach(&mut self, handle: &PlayableHandle) -> Result<()>;

    /// Start or resume rendering
    ///
    /// # Errors
    /// Returns `PlaybackError::Media` if the platform refuses to play
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    /// Jump to an absolute offset from the start of the track
    fn seek(&mut self, position: Duration);

    /// Linear gain, 0.0 (silent) to 1.0
    fn set_gain(&mut self, gain: f32);

    /// Stop and forget the attached audio
    fn detach(&mut self);
}

/// Output that renders nothing
///
/// Keeps just enough state to answer status queries in headless use.
#[derive(Debug, Default)]
pub struct SilentOutput {
    attached: Option<TrackId>,
    playing: bool,
    position: Duration,
    gain: f32,
}

impl SilentOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(&self) -> Option<&TrackId> {
        self.attached.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl MediaOutput for SilentOutput {
    fn attach(&mut self, handle: &PlayableHandle) -> Result<()> {
        self.attached = Some(handle.track_id().clone());
        self.position = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.playing = self.attached.is_some();
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) {
        self.position = position;
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn detach(&mut self) {
        self.attached = None;
        self.playing = false;
        self.position = Duration::ZERO;
    }
}

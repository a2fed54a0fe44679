//! Player wiring and command execution

use crate::commands::{Command, HELP};
use crate::error::{CliError, Result};
use crate::output::{spawn_ticker, SimulatedOutput};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use streamflow_client::StreamFlowClient;
use streamflow_core::{PlaylistId, Track};
use streamflow_playback::{
    AudioSource, PlaybackState, PlayerConfig, PlayerEvent, PlayerFacade, PlayerSnapshot,
    ReportingDispatcher,
};
use tokio::task::JoinHandle;
use tracing::info;

/// What to load when the player starts
#[derive(Debug, Clone, Default)]
pub struct PlayRequest {
    pub track_ids: Vec<String>,
    pub start: usize,
    pub playlist: Option<String>,
}

/// A running player bound to one backend
pub struct PlayerApp {
    player: Arc<PlayerFacade>,
    reports: Arc<ReportingDispatcher>,
    output: SimulatedOutput,
    ticker: JoinHandle<()>,
}

impl PlayerApp {
    /// Build a player on top of an authenticated client
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(client: &StreamFlowClient, config: &PlayerConfig, tick: Duration) -> Self {
        let source = AudioSource::new(
            Arc::new(client.audio_transport()),
            Arc::new(client.tokens()),
        );
        let reports = Arc::new(ReportingDispatcher::spawn(Arc::new(
            client.session_reporter(),
        )));
        let output = SimulatedOutput::new();
        let player = Arc::new(PlayerFacade::new(
            config,
            source,
            Box::new(output.clone()),
            reports.clone(),
        ));
        let ticker = spawn_ticker(player.clone(), output.clone(), tick);

        Self {
            player,
            reports,
            output,
            ticker,
        }
    }

    pub fn player(&self) -> &Arc<PlayerFacade> {
        &self.player
    }

    pub fn output(&self) -> &SimulatedOutput {
        &self.output
    }

    /// Resolve the request against the catalog and start playback
    ///
    /// A single track without a playlist plays standalone; anything else
    /// becomes a queue.
    pub async fn start(&self, client: &StreamFlowClient, request: &PlayRequest) -> Result<()> {
        let (tracks, context) = resolve_tracks(client, request).await?;
        info!(tracks = tracks.len(), start = request.start, "Starting playback");

        if tracks.len() == 1 && context.is_none() && request.start == 0 {
            let track = tracks.into_iter().next().map(Arc::new);
            if let Some(track) = track {
                self.player.play_track(track).await?;
            }
            return Ok(());
        }

        let tracks = tracks.into_iter().map(Arc::new).collect();
        self.player.play_queue(tracks, request.start, context).await?;
        Ok(())
    }

    /// Run one interactive command; returns `false` when the user quits
    pub async fn execute(&self, command: Command) -> Result<(bool, String)> {
        let message = match command {
            Command::Toggle => {
                let state = self.player.toggle_play_pause().await?;
                format!("{:?}", state)
            }
            Command::Next => {
                self.player.skip_next().await?;
                self.now_playing().await
            }
            Command::Previous => {
                self.player.skip_previous().await?;
                self.now_playing().await
            }
            Command::Shuffle => {
                let on = self.player.toggle_shuffle().await;
                format!("shuffle {}", if on { "on" } else { "off" })
            }
            Command::Repeat => {
                let mode = self.player.toggle_repeat().await;
                format!("repeat {:?}", mode)
            }
            Command::Seek(fraction) => {
                let applied = self.player.set_progress(fraction).await?;
                format!("seeked to {:.0}%", applied * 100.0)
            }
            Command::Volume(level) => {
                let applied = self.player.set_volume(level).await;
                format!("volume {}", applied)
            }
            Command::Mute => {
                let muted = self.player.toggle_mute().await;
                let label = if muted { "muted" } else { "unmuted" };
                label.to_string()
            }
            Command::End => {
                self.player.on_media_ended().await?;
                self.now_playing().await
            }
            Command::Status => render_status(&self.player.snapshot().await),
            Command::Stop => {
                self.player.stop().await;
                "stopped".to_string()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok((false, String::new())),
        };
        Ok((true, message))
    }

    /// Events since the last call, one line each
    pub async fn drain_event_lines(&self) -> Vec<String> {
        self.player
            .drain_events()
            .await
            .iter()
            .filter_map(describe_event)
            .collect()
    }

    /// Stop playback and deliver outstanding reports
    pub async fn shutdown(self) {
        self.ticker.abort();
        self.player.stop().await;
        self.reports.shutdown().await;
    }

    async fn now_playing(&self) -> String {
        let snapshot = self.player.snapshot().await;
        match &snapshot.current_track {
            Some(track) => format!("{:?}: {} - {}", snapshot.state, track.artist, track.title),
            None => format!("{:?}", snapshot.state),
        }
    }
}

async fn resolve_tracks(
    client: &StreamFlowClient,
    request: &PlayRequest,
) -> Result<(Vec<Track>, Option<PlaylistId>)> {
    if !client.is_authenticated() {
        return Err(CliError::NotLoggedIn(
            "run `streamflow login` or set STREAMFLOW_AUTH__ACCESS_TOKEN".to_string(),
        ));
    }

    let mut context = None;
    let mut tracks = Vec::with_capacity(request.track_ids.len());

    if let Some(playlist_id) = &request.playlist {
        if request.track_ids.is_empty() {
            let playlist = client.playlist(playlist_id).await?;
            info!(playlist = %playlist.name, tracks = playlist.tracks.len(), "Loaded playlist");
            context = Some(playlist.id);
            tracks = playlist.tracks;
        } else {
            context = Some(PlaylistId::new(playlist_id.as_str()));
        }
    }

    for id in &request.track_ids {
        tracks.push(client.song(id).await?);
    }

    Ok((tracks, context))
}

/// Multi-line summary of the player
pub fn render_status(snapshot: &PlayerSnapshot) -> String {
    let mut out = String::new();

    match &snapshot.current_track {
        Some(track) => {
            let total = track.duration_secs;
            let elapsed = total * snapshot.progress;
            let _ = writeln!(
                out,
                "{:?}: {} - {} [{}] {} / {}",
                snapshot.state,
                track.artist,
                track.title,
                track.album,
                format_time(elapsed),
                format_time(total)
            );
        }
        None => {
            let _ = writeln!(out, "{:?}: nothing loaded", snapshot.state);
        }
    }

    let _ = write!(
        out,
        "volume {}{} | shuffle {} | repeat {:?}",
        snapshot.volume,
        if snapshot.muted { " (muted)" } else { "" },
        if snapshot.shuffle { "on" } else { "off" },
        snapshot.repeat
    );

    if let (Some(queue), Some(cursor)) = (&snapshot.queue, snapshot.cursor) {
        let _ = write!(out, "\nqueue {}/{}", cursor + 1, queue.len());
        if let Some(context) = &snapshot.context {
            let _ = write!(out, " from playlist {}", context);
        }
        for (i, track) in queue.iter().enumerate() {
            let marker = if i == cursor { ">" } else { " " };
            let _ = write!(out, "\n {} {}. {} - {}", marker, i + 1, track.artist, track.title);
        }
    }

    out
}

/// One-line description of an event, or `None` for noise
pub fn describe_event(event: &PlayerEvent) -> Option<String> {
    match event {
        PlayerEvent::StateChanged { state } => match state {
            PlaybackState::Loading | PlaybackState::Ready => None,
            other => Some(format!("[{:?}]", other)),
        },
        PlayerEvent::TrackChanged { track_id } => Some(match track_id {
            Some(id) => format!("[track {}]", id),
            None => "[no track]".to_string(),
        }),
        PlayerEvent::Error { message } => Some(format!("[error] {}", message)),
        PlayerEvent::QueueChanged { .. }
        | PlayerEvent::VolumeChanged { .. }
        | PlayerEvent::ModesChanged { .. } => None,
    }
}

fn format_time(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

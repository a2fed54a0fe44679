//! Background delivery of session and play-count reports
//!
//! `ReportingDispatcher` is the `ReportSink` used in production. Reports are
//! queued on an unbounded channel and delivered in order by one worker task,
//! so playback control never waits on the backend. Failures are logged and
//! dropped.

use crate::error::PlaybackError;
use crate::session::ReportSink;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use streamflow_core::{PlaylistId, SessionKey, SessionReporter, TrackId};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

#[derive(Debug)]
enum Command {
    Start {
        key: SessionKey,
        track_id: TrackId,
        context_id: Option<PlaylistId>,
    },
    Complete {
        key: SessionKey,
        track_id: TrackId,
        duration_secs: f64,
    },
    Played {
        track_id: TrackId,
    },
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Channel-backed `ReportSink`
pub struct ReportingDispatcher {
    tx: mpsc::UnboundedSender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ReportingDispatcher {
    /// Spawn the delivery worker on the current tokio runtime
    pub fn spawn(reporter: Arc<dyn SessionReporter>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(reporter, rx));
        Self {
            tx,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Wait until every report queued before this call has been delivered
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Deliver what is queued, then stop the worker
    ///
    /// Reports submitted afterwards are dropped.
    pub async fn shutdown(&self) {
        let worker = match self.worker.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(worker) = worker else {
            return;
        };

        let _ = self.tx.send(Command::Shutdown);
        if let Err(e) = worker.await {
            tracing::error!(error = %e, "Reporting worker panicked");
        }
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            tracing::debug!("Reporting worker stopped, dropping report");
        }
    }
}

impl ReportSink for ReportingDispatcher {
    fn session_started(&self, key: SessionKey, track_id: &TrackId, context_id: Option<&PlaylistId>) {
        self.send(Command::Start {
            key,
            track_id: track_id.clone(),
            context_id: context_id.cloned(),
        });
    }

    fn session_completed(&self, key: SessionKey, track_id: &TrackId, duration_secs: f64) {
        self.send(Command::Complete {
            key,
            track_id: track_id.clone(),
            duration_secs,
        });
    }

    fn track_played(&self, track_id: &TrackId) {
        self.send(Command::Played {
            track_id: track_id.clone(),
        });
    }
}

async fn run_worker(reporter: Arc<dyn SessionReporter>, mut rx: mpsc::UnboundedReceiver<Command>) {
    // Local key → backend session id; `None` when the start report failed
    let mut sessions: HashMap<SessionKey, Option<String>> = HashMap::new();

    while let Some(command) = rx.recv().await {
        match command {
            Command::Start {
                key,
                track_id,
                context_id,
            } => {
                let backend_id = match reporter.start_session(&track_id, context_id.as_ref()).await {
                    Ok(id) => Some(id),
                    Err(e) => {
                        log_failure("start listening session", &track_id, &e.to_string());
                        None
                    }
                };
                sessions.insert(key, backend_id);
            }
            Command::Complete {
                key,
                track_id,
                duration_secs,
            } => match sessions.remove(&key).flatten() {
                Some(session_id) => {
                    if let Err(e) = reporter
                        .complete_session(&track_id, &session_id, duration_secs)
                        .await
                    {
                        log_failure("complete listening session", &track_id, &e.to_string());
                    }
                }
                None => {
                    tracing::warn!(
                        track_id = %track_id,
                        key = %key,
                        "Skipping session completion, session was never opened on the backend"
                    );
                }
            },
            Command::Played { track_id } => {
                if let Err(e) = reporter.notify_played(&track_id).await {
                    log_failure("record play", &track_id, &e.to_string());
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
            Command::Shutdown => break,
        }
    }

    tracing::debug!(open_sessions = sessions.len(), "Reporting worker stopped");
}

fn log_failure(action: &str, track_id: &TrackId, message: &str) {
    let err = PlaybackError::ReportingFailure(message.to_string());
    tracing::warn!(track_id = %track_id, error = %err, "Failed to {}", action);
}

//! Listening-session and play-count reporting.

use crate::client::{check_status, TokenStore};
use crate::error::{ClientError, Result};
use crate::types::{CompleteSessionRequest, ListenStartResponse};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use streamflow_core::{CoreError, PlaylistId, SessionReporter, TrackId};
use tracing::debug;

/// `SessionReporter` backed by the listening endpoints
///
/// Reads the bearer token from the shared [`TokenStore`] on every call.
#[derive(Debug, Clone)]
pub struct HttpSessionReporter {
    http: Client,
    base_url: String,
    tokens: TokenStore,
}

impl HttpSessionReporter {
    pub(crate) fn new(http: Client, base_url: String, tokens: TokenStore) -> Self {
        Self {
            http,
            base_url,
            tokens,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.tokens.get().ok_or(ClientError::AuthRequired)?;
        Ok(request.bearer_auth(token))
    }

    async fn open(&self, track_id: &TrackId, context_id: Option<&PlaylistId>) -> Result<String> {
        let url = format!("{}/api/songs/{}/listen/", self.base_url, track_id);
        let mut request = self.http.post(&url);
        if let Some(playlist) = context_id {
            request = request.query(&[("playlist_id", playlist.as_str())]);
        }

        let response = self
            .authorized(request)?
            .send()
            .await
            .map_err(ClientError::from_send)?;

        let started: ListenStartResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        debug!(track_id = %track_id, session_id = %started.session_id, "Listening session opened");
        Ok(started.session_id)
    }

    async fn close(&self, track_id: &TrackId, session_id: &str, duration_secs: f64) -> Result<()> {
        let url = format!(
            "{}/api/songs/{}/listen/{}/",
            self.base_url, track_id, session_id
        );
        let body = CompleteSessionRequest {
            duration_seconds: duration_secs,
        };

        let response = self
            .authorized(self.http.put(&url).json(&body))?
            .send()
            .await
            .map_err(ClientError::from_send)?;
        check_status(response).await?;

        debug!(track_id = %track_id, session_id = %session_id, duration_secs, "Listening session closed");
        Ok(())
    }

    async fn played(&self, track_id: &TrackId) -> Result<()> {
        let url = format!("{}/api/songs/{}/play/", self.base_url, track_id);
        let response = self
            .authorized(self.http.post(&url))?
            .send()
            .await
            .map_err(ClientError::from_send)?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionReporter for HttpSessionReporter {
    async fn start_session(
        &self,
        track_id: &TrackId,
        context_id: Option<&PlaylistId>,
    ) -> streamflow_core::Result<String> {
        self.open(track_id, context_id).await.map_err(CoreError::from)
    }

    async fn complete_session(
        &self,
        track_id: &TrackId,
        session_id: &str,
        duration_secs: f64,
    ) -> streamflow_core::Result<()> {
        self.close(track_id, session_id, duration_secs)
            .await
            .map_err(CoreError::from)
    }

    async fn notify_played(&self, track_id: &TrackId) -> streamflow_core::Result<()> {
        self.played(track_id).await.map_err(CoreError::from)
    }
}

//! Authenticated audio byte fetches.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use streamflow_core::{AudioPayload, AudioTransport, CoreError, TrackId};
use tracing::{debug, warn};

/// `AudioTransport` over the backend's stream endpoint
///
/// Non-2xx responses are returned as payloads so the player can classify
/// them; only a missing response is an error.
#[derive(Debug, Clone)]
pub struct HttpAudioTransport {
    http: Client,
    base_url: String,
}

impl HttpAudioTransport {
    pub(crate) fn new(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Stream URL for a track
    pub fn stream_url(&self, track_id: &TrackId) -> String {
        format!("{}/api/stream/song/{}/", self.base_url, track_id)
    }
}

#[async_trait]
impl AudioTransport for HttpAudioTransport {
    async fn fetch(
        &self,
        track_id: &TrackId,
        bearer_token: &str,
    ) -> streamflow_core::Result<AudioPayload> {
        let url = self.stream_url(track_id);
        debug!(url = %url, "Fetching audio");

        let response = self
            .http
            .get(&url)
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| {
                warn!(track_id = %track_id, error = %e, "Audio request failed");
                CoreError::transport(e.to_string())
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoreError::transport(format!("Failed to read audio body: {}", e)))?;

        debug!(
            track_id = %track_id,
            status,
            content_type = content_type.as_deref().unwrap_or("-"),
            bytes = bytes.len(),
            "Audio response received"
        );

        Ok(AudioPayload {
            status,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

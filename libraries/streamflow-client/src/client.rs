//! Main StreamFlow backend client.

use crate::auth::AuthClient;
use crate::catalog::CatalogClient;
use crate::error::{ClientError, Result};
use crate::listening::HttpSessionReporter;
use crate::stream::HttpAudioTransport;
use crate::types::{LoginResponse, Playlist, ServerConfig};
use reqwest::{Client, Response};
use std::sync::{Arc, RwLock};
use streamflow_core::{CredentialProvider, Track};
use tracing::{debug, info};
use url::Url;

/// Shared bearer token
///
/// Cloned into every component that needs credentials, so a login or logout
/// is seen everywhere at once.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token)),
        }
    }

    pub fn set(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    pub fn get(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CredentialProvider for TokenStore {
    fn bearer_token(&self) -> Option<String> {
        self.get()
    }
}

/// Main client for a StreamFlow backend.
///
/// Handles login and hands out the collaborators the player needs: a token
/// store, an audio transport and a session reporter. API calls share one
/// connection pool with a whole-request timeout; audio fetches use a second
/// pool bounded only on connect.
///
/// # Example
///
/// ```ignore
/// use streamflow_client::{StreamFlowClient, ServerConfig};
///
/// let client = StreamFlowClient::new(ServerConfig::new("http://localhost:8000"))?;
/// client.login("me@example.com", "secret").await?;
///
/// let playlist = client.playlist("p1").await?;
/// println!("{} tracks", playlist.tracks.len());
/// ```
pub struct StreamFlowClient {
    http: Client,
    stream_http: Client,
    base_url: String,
    tokens: TokenStore,
}

impl StreamFlowClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let base_url = normalize_url(&config.url)?;

        let user_agent = format!("StreamFlow/{} (CLI)", env!("CARGO_PKG_VERSION"));

        // Create HTTP client with reasonable defaults
        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(user_agent.clone())
            .build()
            .map_err(ClientError::Request)?;

        // Audio bodies can take longer than any API call; bound only the connect
        let stream_http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(user_agent)
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            stream_http,
            base_url,
            tokens: TokenStore::new(config.access_token),
        })
    }

    /// Get the server URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Check if the client has an access token.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.get().is_some()
    }

    /// Login with email and password.
    ///
    /// On success, the access token is stored for subsequent requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let auth_client = AuthClient::new(&self.http, &self.base_url);
        let response = auth_client.login(email, password).await?;

        self.tokens.set(Some(response.access_token.clone()));
        Ok(response)
    }

    /// Set the token directly (e.g., from stored credentials).
    pub fn set_token(&self, access_token: impl Into<String>) {
        self.tokens.set(Some(access_token.into()));
    }

    /// Clear the stored token (logout).
    pub fn logout(&self) {
        self.tokens.set(None);
        info!("Logged out");
    }

    /// Token store shared with this client
    pub fn tokens(&self) -> TokenStore {
        self.tokens.clone()
    }

    /// Audio transport for the player
    pub fn audio_transport(&self) -> HttpAudioTransport {
        HttpAudioTransport::new(self.stream_http.clone(), self.base_url.clone())
    }

    /// Listening-session and play-count reporter for the player
    pub fn session_reporter(&self) -> HttpSessionReporter {
        HttpSessionReporter::new(self.http.clone(), self.base_url.clone(), self.tokens.clone())
    }

    /// Fetch one song as a playable track.
    pub async fn song(&self, song_id: &str) -> Result<Track> {
        self.catalog()?.get_song(song_id).await
    }

    /// Fetch a playlist with its tracks.
    pub async fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        self.catalog()?.get_playlist(playlist_id).await
    }

    fn catalog(&self) -> Result<CatalogClient<'_>> {
        let access_token = self.tokens.get().ok_or(ClientError::AuthRequired)?;
        Ok(CatalogClient::new(&self.http, &self.base_url, access_token))
    }
}

/// Validate a base URL and strip trailing slashes
fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    let url = trimmed.trim_end_matches('/').to_string();
    debug!(url = %url, "Using backend");
    Ok(url)
}

/// Pass through a success response, or turn the status into an error
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else if status.as_u16() == 401 {
        Err(ClientError::AuthRequired)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

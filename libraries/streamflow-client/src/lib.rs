//! StreamFlow backend client
//!
//! HTTP client library for the StreamFlow backend API, and the
//! implementations of the playback core's collaborator traits.
//!
//! # Features
//!
//! - **Authentication**: Login with email/password, shared bearer token
//! - **Catalog**: Fetch songs and playlists as playable tracks
//! - **Streaming**: `AudioTransport` over the authenticated stream endpoint
//! - **Listening**: `SessionReporter` for listening sessions and play counts
//!
//! # Example
//!
//! ```ignore
//! use streamflow_client::{StreamFlowClient, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StreamFlowClient::new(ServerConfig::new("http://localhost:8000"))?;
//!     client.login("me@example.com", "secret").await?;
//!
//!     let playlist = client.playlist("p1").await?;
//!     println!("{}: {} tracks", playlist.name, playlist.tracks.len());
//!
//!     // Collaborators for the player
//!     let transport = client.audio_transport();
//!     let reporter = client.session_reporter();
//!     let tokens = client.tokens();
//!     Ok(())
//! }
//! ```

mod auth;
mod catalog;
mod client;
mod error;
mod listening;
mod stream;
mod types;

// Re-export main types
pub use client::{StreamFlowClient, TokenStore};
pub use error::{ClientError, Result};
pub use types::{
    LoginResponse, Playlist, PlaylistResponse, ServerConfig, SongResponse, DEFAULT_SERVER_URL,
};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use catalog::CatalogClient;
pub use listening::HttpSessionReporter;
pub use stream::HttpAudioTransport;

//! Song and playlist lookup.

use crate::client::check_status;
use crate::error::{ClientError, Result};
use crate::types::{Playlist, PlaylistResponse, SongResponse};
use reqwest::Client;
use streamflow_core::{PlaylistId, Track};
use tracing::debug;

/// Catalog client for songs and playlists.
pub struct CatalogClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: String,
}

impl<'a> CatalogClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: String) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Get a single song.
    pub async fn get_song(&self, song_id: &str) -> Result<Track> {
        let url = format!("{}/api/songs/{}/", self.base_url, song_id);
        debug!(url = %url, "Fetching song");

        let song: SongResponse = self.get_json(&url).await?;
        Ok(song.into_track(self.base_url))
    }

    /// Get a playlist with its songs resolved to tracks.
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let url = format!("{}/api/playlists/{}/", self.base_url, playlist_id);
        debug!(url = %url, "Fetching playlist");

        let playlist: PlaylistResponse = self.get_json(&url).await?;
        debug!(
            playlist_id = %playlist.id,
            songs = playlist.songs.len(),
            "Fetched playlist"
        );

        let tracks = playlist
            .songs
            .into_iter()
            .map(|song| song.into_track(self.base_url))
            .collect();

        Ok(Playlist {
            id: PlaylistId::new(playlist.id),
            name: playlist.name,
            tracks,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

//! Playlist operations on the catalog.

use crate::client::{send, send_json};
use crate::error::Result;
use crate::types::PlaylistDto;
use lyra_core::{Playlist, PlaylistId, TrackId, UserId};
use reqwest::Client;
use tracing::{debug, info};

/// Playlist client for a catalog server.
pub struct PlaylistClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> PlaylistClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Playlists owned by `owner`.
    pub async fn list_playlists(&self, owner: UserId) -> Result<Vec<Playlist>> {
        let url = format!("{}/api/playlists/user/{}", self.base_url, owner);
        debug!(url = %url, "Fetching playlists");

        let playlists: Vec<PlaylistDto> = send_json(self.http.get(&url), "playlists").await?;
        Ok(playlists.into_iter().map(Playlist::from).collect())
    }

    /// A playlist with its tracks in playback order.
    pub async fn get_playlist(&self, id: PlaylistId) -> Result<Playlist> {
        let url = format!("{}/api/playlists/{}", self.base_url, id);
        debug!(url = %url, "Fetching playlist");

        let playlist: PlaylistDto = send_json(self.http.get(&url), "playlist").await?;
        Ok(playlist.into())
    }

    pub async fn create_playlist(&self, owner: UserId, name: &str) -> Result<Playlist> {
        let url = format!("{}/api/playlists", self.base_url);
        let owner_param = owner.to_string();
        let request = self
            .http
            .post(&url)
            .query(&[("userId", owner_param.as_str()), ("name", name)]);

        let playlist: Playlist = send_json::<PlaylistDto>(request, "playlist")
            .await?
            .into();
        info!(playlist = %playlist.id, name = %playlist.name, "Playlist created");
        Ok(playlist)
    }

    pub async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()> {
        let url = format!("{}/api/playlists/{}/rename", self.base_url, id);
        debug!(url = %url, name = %name, "Renaming playlist");

        send(self.http.put(&url).query(&[("name", name)])).await?;
        Ok(())
    }

    pub async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        let url = format!("{}/api/playlists/{}", self.base_url, id);
        debug!(url = %url, "Deleting playlist");

        send(self.http.delete(&url)).await?;
        Ok(())
    }

    pub async fn add_track(&self, playlist: PlaylistId, track: TrackId) -> Result<()> {
        send(self.http.post(self.track_url(playlist, track))).await?;
        Ok(())
    }

    pub async fn remove_track(&self, playlist: PlaylistId, track: TrackId) -> Result<()> {
        send(self.http.delete(self.track_url(playlist, track))).await?;
        Ok(())
    }

    /// Replace the track order of a playlist.
    pub async fn reorder(&self, playlist: PlaylistId, track_ids: &[TrackId]) -> Result<()> {
        let url = format!("{}/api/playlists/{}/tracks/order", self.base_url, playlist);
        debug!(url = %url, tracks = track_ids.len(), "Reordering playlist");

        send(self.http.put(&url).json(track_ids)).await?;
        Ok(())
    }

    fn track_url(&self, playlist: PlaylistId, track: TrackId) -> String {
        format!(
            "{}/api/playlists/{}/tracks/{}",
            self.base_url, playlist, track
        )
    }
}

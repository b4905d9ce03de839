//! Track operations on the catalog.

use crate::client::{send, send_json};
use crate::error::Result;
use crate::types::TrackDto;
use lyra_core::{TrackId, TrackMetadataUpdate, TrackRef};
use reqwest::Client;
use tracing::debug;

/// Track client for a catalog server.
pub struct LibraryClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> LibraryClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Every track in the catalog.
    pub async fn list_tracks(&self) -> Result<Vec<TrackRef>> {
        let url = format!("{}/api/tracks", self.base_url);
        debug!(url = %url, "Fetching tracks");

        let tracks: Vec<TrackDto> = send_json(self.http.get(&url), "track list").await?;
        debug!(tracks = tracks.len(), "Fetched tracks");
        Ok(tracks.into_iter().map(TrackRef::from).collect())
    }

    /// Tracks matching `query` on title, artist or album.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<TrackRef>> {
        let url = format!("{}/api/tracks/search", self.base_url);
        debug!(url = %url, query = %query, "Searching tracks");

        let request = self.http.get(&url).query(&[("query", query)]);
        let tracks: Vec<TrackDto> = send_json(request, "search response").await?;
        debug!(results = tracks.len(), "Search complete");
        Ok(tracks.into_iter().map(TrackRef::from).collect())
    }

    /// Replace title, artist and album of a track.
    pub async fn update_track_metadata(
        &self,
        track_id: TrackId,
        update: &TrackMetadataUpdate,
    ) -> Result<()> {
        let url = format!("{}/api/tracks/{}", self.base_url, track_id);
        debug!(url = %url, track_id = %track_id, "Updating track metadata");

        send(self.http.put(&url).json(update)).await?;
        Ok(())
    }

    /// Delete a track from the catalog.
    pub async fn delete_track(&self, track_id: TrackId) -> Result<()> {
        let url = format!("{}/api/tracks/{}", self.base_url, track_id);
        debug!(url = %url, track_id = %track_id, "Deleting track");

        send(self.http.delete(&url)).await?;
        debug!(track_id = %track_id, "Track deleted");
        Ok(())
    }
}

//! `CatalogService` implementation over HTTP.

use crate::client::CatalogClient;
use async_trait::async_trait;
use lyra_core::{
    CatalogService, Playlist, PlaylistId, Result, TrackId, TrackMetadataUpdate, TrackRef,
    TrackUpload, UserId,
};

#[async_trait]
impl CatalogService for CatalogClient {
    async fn list_tracks(&self) -> Result<Vec<TrackRef>> {
        Ok(self.library().list_tracks().await?)
    }

    async fn search_tracks(&self, query: &str) -> Result<Vec<TrackRef>> {
        Ok(self.library().search_tracks(query).await?)
    }

    async fn update_track_metadata(
        &self,
        id: TrackId,
        update: &TrackMetadataUpdate,
    ) -> Result<()> {
        Ok(self.library().update_track_metadata(id, update).await?)
    }

    async fn upload_track(&self, upload: &TrackUpload) -> Result<()> {
        Ok(self.uploads().upload_track(upload).await?)
    }

    async fn delete_track(&self, id: TrackId) -> Result<()> {
        Ok(self.library().delete_track(id).await?)
    }

    async fn list_playlists(&self, owner: UserId) -> Result<Vec<Playlist>> {
        Ok(self.playlists().list_playlists(owner).await?)
    }

    async fn get_playlist(&self, id: PlaylistId) -> Result<Playlist> {
        Ok(self.playlists().get_playlist(id).await?)
    }

    async fn create_playlist(&self, owner: UserId, name: &str) -> Result<Playlist> {
        Ok(self.playlists().create_playlist(owner, name).await?)
    }

    async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()> {
        Ok(self.playlists().rename_playlist(id, name).await?)
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        Ok(self.playlists().delete_playlist(id).await?)
    }

    async fn add_track_to_playlist(&self, playlist: PlaylistId, track: TrackId) -> Result<()> {
        Ok(self.playlists().add_track(playlist, track).await?)
    }

    async fn remove_track_from_playlist(
        &self,
        playlist: PlaylistId,
        track: TrackId,
    ) -> Result<()> {
        Ok(self.playlists().remove_track(playlist, track).await?)
    }

    async fn reorder_playlist(&self, playlist: PlaylistId, track_ids: &[TrackId]) -> Result<()> {
        Ok(self.playlists().reorder(playlist, track_ids).await?)
    }
}

//! Catalog contract
//!
//! The catalog owns tracks and playlists. The playback engine never depends on
//! it: callers fetch a list of `TrackRef`s and hand it to the engine as a queue.

use crate::error::Result;
use crate::types::{
    Playlist, PlaylistId, TrackId, TrackMetadataUpdate, TrackRef, TrackUpload, UserId,
};
use async_trait::async_trait;

/// Remote catalog of tracks and playlists
///
/// Every call is a single request/response. Failures are reported as a
/// `LyraError` whose `Display` is the message to show the user.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// All tracks in the catalog
    async fn list_tracks(&self) -> Result<Vec<TrackRef>>;

    /// Tracks whose title, artist or album match `query`
    async fn search_tracks(&self, query: &str) -> Result<Vec<TrackRef>>;

    /// Update title/artist/album of a track
    async fn update_track_metadata(&self, id: TrackId, update: &TrackMetadataUpdate)
        -> Result<()>;

    /// Upload a new audio file
    async fn upload_track(&self, upload: &TrackUpload) -> Result<()>;

    /// Remove a track from the catalog
    async fn delete_track(&self, id: TrackId) -> Result<()>;

    /// Playlists owned by a user
    async fn list_playlists(&self, owner: UserId) -> Result<Vec<Playlist>>;

    /// A playlist with its tracks in order
    async fn get_playlist(&self, id: PlaylistId) -> Result<Playlist>;

    async fn create_playlist(&self, owner: UserId, name: &str) -> Result<Playlist>;

    async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()>;

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()>;

    async fn add_track_to_playlist(&self, playlist: PlaylistId, track: TrackId) -> Result<()>;

    async fn remove_track_from_playlist(&self, playlist: PlaylistId, track: TrackId)
        -> Result<()>;

    /// Replace the playlist order with `track_ids`
    async fn reorder_playlist(&self, playlist: PlaylistId, track_ids: &[TrackId]) -> Result<()>;
}

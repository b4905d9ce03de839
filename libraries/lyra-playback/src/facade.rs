//! Player facade
//!
//! The single entry point UIs use: every engine operation, the repeat/shuffle
//! toggles UIs show, and optional catalog access for loading playlists.

use crate::{
    engine::PlaybackEngine,
    equalizer::EqualizerGains,
    error::{PlaybackError, Result},
    observer::{ObserverId, PlaybackObserver},
    state::PlayerState,
    strategy::PlaybackStrategy,
};
use lyra_core::{CatalogService, LyraError, PlaylistId, TrackRef};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Repeat setting as shown by a UI toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatMode {
    Off,
    One,
    All,
}

impl From<RepeatMode> for PlaybackStrategy {
    fn from(mode: RepeatMode) -> Self {
        match mode {
            RepeatMode::Off => Self::Sequential,
            RepeatMode::One => Self::RepeatOne,
            RepeatMode::All => Self::RepeatAll,
        }
    }
}

/// Player facade
pub struct Player {
    engine: PlaybackEngine,
    catalog: Option<Arc<dyn CatalogService>>,
}

impl Player {
    pub fn new(engine: PlaybackEngine) -> Self {
        Self {
            engine,
            catalog: None,
        }
    }

    /// Attach a catalog for `list_tracks`, `search_tracks` and `play_playlist`
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogService>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PlaybackEngine {
        &mut self.engine
    }

    pub fn into_engine(self) -> PlaybackEngine {
        self.engine
    }

    // ===== Playback =====

    pub fn play_queue(&mut self, tracks: Vec<TrackRef>, start: usize) -> Result<()> {
        self.engine.play_queue(tracks, start)
    }

    pub fn play_track(&mut self, track: TrackRef) -> Result<()> {
        self.engine.play_track(track)
    }

    pub fn play_local_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.engine.play_local_file(path)
    }

    pub fn update_queue(&mut self, tracks: Vec<TrackRef>) {
        self.engine.update_queue(tracks);
    }

    pub fn play(&mut self) -> Result<()> {
        self.engine.play()
    }

    pub fn pause(&mut self) -> Result<()> {
        self.engine.pause()
    }

    pub fn play_pause(&mut self) -> Result<()> {
        self.engine.play_pause()
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        self.engine.next()
    }

    pub fn previous(&mut self) -> Result<()> {
        self.engine.previous()
    }

    pub fn seek(&mut self, position: Duration) -> Result<()> {
        self.engine.seek(position)
    }

    /// Seek in seconds, as UI sliders report it
    ///
    /// Negative, non-finite and unrepresentable values are ignored.
    pub fn seek_seconds(&mut self, seconds: f64) -> Result<()> {
        match Duration::try_from_secs_f64(seconds) {
            Ok(position) => self.engine.seek(position),
            Err(_) => Ok(()),
        }
    }

    /// Apply pending backend notifications
    pub fn process_backend_events(&mut self) -> usize {
        self.engine.process_backend_events()
    }

    // ===== Ordering =====

    pub fn set_strategy(&mut self, strategy: PlaybackStrategy) {
        self.engine.set_strategy(strategy);
    }

    pub fn strategy(&self) -> PlaybackStrategy {
        self.engine.strategy()
    }

    /// Shuffle on, or back to sequential order
    pub fn set_shuffle(&mut self, enabled: bool) {
        let strategy = if enabled {
            PlaybackStrategy::Shuffle
        } else {
            PlaybackStrategy::Sequential
        };
        self.engine.set_strategy(strategy);
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.engine.set_strategy(mode.into());
    }

    /// Short label for a repeat/shuffle indicator
    pub fn repeat_mode_label(&self) -> &'static str {
        match self.engine.strategy() {
            PlaybackStrategy::Shuffle => "SHUFFLE",
            PlaybackStrategy::RepeatOne => "ONE",
            PlaybackStrategy::RepeatAll => "ALL",
            PlaybackStrategy::Sequential => "NONE",
        }
    }

    // ===== Volume & Equalizer =====

    pub fn set_volume(&mut self, volume: f32) {
        self.engine.set_volume(volume);
    }

    pub fn volume(&self) -> f32 {
        self.engine.volume()
    }

    pub fn set_equalizer_band(&mut self, band: usize, gain_db: f32) {
        self.engine.set_equalizer_band(band, gain_db);
    }

    pub fn equalizer_band(&self, band: usize) -> f32 {
        self.engine.equalizer_band(band)
    }

    pub fn equalizer(&self) -> &EqualizerGains {
        self.engine.equalizer()
    }

    // ===== Queries =====

    pub fn state(&self) -> PlayerState {
        self.engine.state()
    }

    pub fn current_track(&self) -> Option<&TrackRef> {
        self.engine.current_track()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.engine.current_index()
    }

    pub fn queue(&self) -> &[TrackRef] {
        self.engine.queue()
    }

    pub fn position(&self) -> Duration {
        self.engine.position()
    }

    pub fn duration(&self) -> Duration {
        self.engine.duration()
    }

    pub fn is_loading(&self) -> bool {
        self.engine.is_loading()
    }

    // ===== Observers =====

    pub fn add_playback_observer(&mut self, observer: Arc<dyn PlaybackObserver>) -> ObserverId {
        self.engine.add_observer(observer)
    }

    pub fn remove_playback_observer(&mut self, id: ObserverId) -> bool {
        self.engine.remove_observer(id)
    }

    // ===== Catalog =====

    /// All catalog tracks
    pub async fn list_tracks(&self) -> Result<Vec<TrackRef>> {
        Ok(self.catalog()?.list_tracks().await?)
    }

    pub async fn search_tracks(&self, query: &str) -> Result<Vec<TrackRef>> {
        Ok(self.catalog()?.search_tracks(query).await?)
    }

    /// Fetch a playlist and play it from `start`
    ///
    /// Engine state is untouched when the catalog request fails.
    pub async fn play_playlist(&mut self, id: PlaylistId, start: usize) -> Result<()> {
        let catalog = self.catalog()?;
        let playlist = catalog.get_playlist(id).await?;
        tracing::info!(
            playlist = %id,
            name = %playlist.name,
            tracks = playlist.tracks.len(),
            "Playing playlist"
        );
        self.engine.play_queue(playlist.tracks, start)
    }

    fn catalog(&self) -> Result<Arc<dyn CatalogService>> {
        self.catalog.clone().ok_or_else(|| {
            PlaybackError::Catalog(LyraError::Other("No catalog configured".to_string()))
        })
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("engine", &self.engine)
            .field("catalog", &self.catalog.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MediaBackend, MediaSession, SessionNotifier};
    use crate::clock::ClockBackend;
    use lyra_core::{Playlist, TrackId, TrackMetadataUpdate, TrackUpload, UserId};

    struct NullBackend;

    impl MediaBackend for NullBackend {
        fn load(
            &mut self,
            track: &TrackRef,
            _notifier: SessionNotifier,
        ) -> Result<Box<dyn MediaSession>> {
            Err(PlaybackError::media_load(track.title(), "no audio output"))
        }
    }

    fn player() -> Player {
        Player::new(PlaybackEngine::new(NullBackend))
    }

    #[test]
    fn repeat_mode_labels() {
        let mut player = player();
        assert_eq!(player.repeat_mode_label(), "NONE");

        player.set_repeat_mode(RepeatMode::One);
        assert_eq!(player.repeat_mode_label(), "ONE");

        player.set_repeat_mode(RepeatMode::All);
        assert_eq!(player.repeat_mode_label(), "ALL");

        player.set_shuffle(true);
        assert_eq!(player.repeat_mode_label(), "SHUFFLE");

        player.set_shuffle(false);
        assert_eq!(player.strategy(), PlaybackStrategy::Sequential);
    }

    #[test]
    fn negative_seek_is_ignored() {
        let mut player = player();
        assert!(player.seek_seconds(-1.0).is_ok());
        assert!(player.seek_seconds(f64::NAN).is_ok());
    }

    #[test]
    fn oversized_seek_is_ignored() {
        let mut player = Player::new(PlaybackEngine::new(ClockBackend::new()));
        let track = TrackRef::catalog(TrackId::new(1), "Long", "Artist")
            .with_duration(Duration::from_secs(600));
        player.play_track(track).unwrap();
        player.process_backend_events();
        assert_eq!(player.state(), PlayerState::Playing);

        assert!(player.seek_seconds(1e30).is_ok());
        assert!(player.seek_seconds(f64::INFINITY).is_ok());
        assert_eq!(player.state(), PlayerState::Playing);
        assert!(player.position() < Duration::from_secs(600));
        player.stop();
    }

    /// Catalog serving one playlist; every other call is rejected
    struct OnePlaylist(Playlist);

    #[async_trait::async_trait]
    impl CatalogService for OnePlaylist {
        async fn list_tracks(&self) -> lyra_core::Result<Vec<TrackRef>> {
            Ok(self.0.tracks.clone())
        }

        async fn search_tracks(&self, query: &str) -> lyra_core::Result<Vec<TrackRef>> {
            Ok(self
                .0
                .tracks
                .iter()
                .filter(|t| t.title().contains(query))
                .cloned()
                .collect())
        }

        async fn update_track_metadata(
            &self,
            _id: TrackId,
            _update: &TrackMetadataUpdate,
        ) -> lyra_core::Result<()> {
            Err(LyraError::catalog("read-only"))
        }

        async fn upload_track(&self, _upload: &TrackUpload) -> lyra_core::Result<()> {
            Err(LyraError::catalog("read-only"))
        }

        async fn delete_track(&self, _id: TrackId) -> lyra_core::Result<()> {
            Err(LyraError::catalog("read-only"))
        }

        async fn list_playlists(&self, _owner: UserId) -> lyra_core::Result<Vec<Playlist>> {
            Ok(vec![self.0.clone()])
        }

        async fn get_playlist(&self, id: PlaylistId) -> lyra_core::Result<Playlist> {
            if id == self.0.id {
                Ok(self.0.clone())
            } else {
                Err(LyraError::not_found("Playlist", id.to_string()))
            }
        }

        async fn create_playlist(
            &self,
            _owner: UserId,
            _name: &str,
        ) -> lyra_core::Result<Playlist> {
            Err(LyraError::catalog("read-only"))
        }

        async fn rename_playlist(&self, _id: PlaylistId, _name: &str) -> lyra_core::Result<()> {
            Err(LyraError::catalog("read-only"))
        }

        async fn delete_playlist(&self, _id: PlaylistId) -> lyra_core::Result<()> {
            Err(LyraError::catalog("read-only"))
        }

        async fn add_track_to_playlist(
            &self,
            _playlist: PlaylistId,
            _track: TrackId,
        ) -> lyra_core::Result<()> {
            Err(LyraError::catalog("read-only"))
        }

        async fn remove_track_from_playlist(
            &self,
            _playlist: PlaylistId,
            _track: TrackId,
        ) -> lyra_core::Result<()> {
            Err(LyraError::catalog("read-only"))
        }

        async fn reorder_playlist(
            &self,
            _playlist: PlaylistId,
            _track_ids: &[TrackId],
        ) -> lyra_core::Result<()> {
            Err(LyraError::catalog("read-only"))
        }
    }

    fn catalog_player() -> Player {
        let playlist = Playlist {
            id: PlaylistId::new(7),
            name: "Evening".to_string(),
            owner_id: None,
            is_public: false,
            tracks: vec![
                TrackRef::catalog(TrackId::new(1), "Intro", "Band"),
                TrackRef::catalog(TrackId::new(2), "Outro", "Band"),
            ],
        };
        Player::new(PlaybackEngine::new(ClockBackend::new()))
            .with_catalog(Arc::new(OnePlaylist(playlist)))
    }

    #[tokio::test]
    async fn play_playlist_loads_queue_from_catalog() {
        let mut player = catalog_player();

        player.play_playlist(PlaylistId::new(7), 1).await.unwrap();
        player.process_backend_events();

        assert_eq!(player.queue().len(), 2);
        assert_eq!(player.current_track().unwrap().title(), "Outro");
        assert_eq!(player.state(), PlayerState::Playing);
        player.stop();
    }

    #[tokio::test]
    async fn catalog_failure_leaves_engine_untouched() {
        let mut player = catalog_player();

        let err = player.play_playlist(PlaylistId::new(99), 0).await.unwrap_err();
        assert_eq!(err.to_string(), "Playlist not found: 99");
        assert!(player.queue().is_empty());
        assert_eq!(player.state(), PlayerState::Stopped);

        let found = player.search_tracks("Out").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(player.list_tracks().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn catalog_calls_without_catalog_fail_cleanly() {
        let mut player = player();
        let err = player.list_tracks().await.unwrap_err();
        assert_eq!(err.to_string(), "No catalog configured");

        assert!(player.play_playlist(PlaylistId::new(1), 0).await.is_err());
        assert_eq!(player.state(), PlayerState::Stopped);
        assert!(player.queue().is_empty());
    }
}

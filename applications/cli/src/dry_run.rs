//! Simulated playback
//!
//! Runs a queue through the player controller on the clock backend and logs
//! every observer event until playback stops.

use clap::Args;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use lyra_catalog_client::CatalogClient;
use lyra_core::{PlaylistId, TrackRef};
use lyra_playback::{
    ChannelObserver, ClockBackend, PlaybackConfig, PlaybackEngine, PlaybackEvent,
    PlaybackStrategy, Player, PlayerController, PlayerHandle, PlayerState,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::catalog::format_duration;

/// Give up when the player is silent for this long
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Args, Debug, Clone)]
pub struct PlaybackArgs {
    /// Playback configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// sequential, repeat-one, repeat-all or shuffle
    #[arg(long)]
    pub strategy: Option<PlaybackStrategy>,

    /// Seconds of media per real second
    #[arg(long, default_value_t = 10.0)]
    pub speed: f64,

    /// Length in seconds of tracks without a known duration
    #[arg(long, default_value_t = 30)]
    pub length: u64,

    /// Stop after this many tracks (repeat strategies never end on their own)
    #[arg(long, default_value_t = 20)]
    pub max_tracks: usize,
}

impl PlaybackArgs {
    fn engine(&self) -> anyhow::Result<PlaybackEngine> {
        let mut config = PlaybackConfig::load(self.config.as_deref())?;
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }

        info!(
            strategy = %config.strategy,
            volume = config.volume,
            speed = self.speed,
            "Starting simulated playback"
        );

        let backend = ClockBackend::new()
            .with_speed(self.speed)
            .with_default_length(Duration::from_secs(self.length));
        Ok(PlaybackEngine::with_config(backend, &config))
    }
}

/// Play local files in order
pub fn play_files(files: &[PathBuf], args: &PlaybackArgs) -> anyhow::Result<()> {
    let tracks: Vec<TrackRef> = files.iter().map(|f| TrackRef::local(f.as_path())).collect();
    for missing in files.iter().filter(|f| !f.is_file()) {
        warn!(file = %missing.display(), "File does not exist and will fail to load");
    }

    let player = PlayerController::spawn(args.engine()?)?;
    let (observer, events) = subscribe();
    player.add_observer(observer.clone())?;
    player.play_queue(tracks, 0)?;

    let played = watch(&player, &events, args.max_tracks)?;
    player.shutdown()?;
    info!(tracks = played, "Dry run finished");
    Ok(())
}

/// Fetch a playlist from the catalog and play it
pub async fn play_playlist(
    client: CatalogClient,
    id: PlaylistId,
    args: PlaybackArgs,
) -> anyhow::Result<()> {
    let (observer, events) = subscribe();

    let mut player = Player::new(args.engine()?).with_catalog(Arc::new(client));
    player.add_playback_observer(observer.clone());
    player.play_playlist(id, 0).await?;
    let engine = player.into_engine();

    tokio::task::spawn_blocking(move || {
        let handle = PlayerController::spawn(engine)?;
        let played = watch(&handle, &events, args.max_tracks)?;
        handle.shutdown()?;
        drop(observer);
        info!(tracks = played, "Playlist finished");
        anyhow::Ok(())
    })
    .await??;
    Ok(())
}

fn subscribe() -> (Arc<ChannelObserver>, Receiver<PlaybackEvent>) {
    let (observer, rx) = ChannelObserver::channel();
    (Arc::new(observer), rx)
}

/// Log events until playback stops; returns the number of tracks started
fn watch(
    player: &PlayerHandle,
    events: &Receiver<PlaybackEvent>,
    max_tracks: usize,
) -> anyhow::Result<usize> {
    let mut started = 0;

    loop {
        let event = match events.recv_timeout(IDLE_TIMEOUT) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                warn!("No player events for {:?}, giving up", IDLE_TIMEOUT);
                player.stop()?;
                return Ok(started);
            }
            Err(RecvTimeoutError::Disconnected) => return Ok(started),
        };

        let check_finished = match &event {
            PlaybackEvent::TrackChanged { track } => {
                started += 1;
                let length = format_duration(track.duration_hint());
                info!(track = %track, %length, "Now playing");
                if started > max_tracks {
                    info!(max_tracks, "Track limit reached");
                    player.stop()?;
                    return Ok(started - 1);
                }
                false
            }
            PlaybackEvent::StateChanged { state } => {
                info!(%state, "State changed");
                *state == PlayerState::Stopped
            }
            PlaybackEvent::PositionChanged { position_ms } => {
                debug!(position_ms, "Position");
                false
            }
            PlaybackEvent::VolumeChanged { volume } => {
                info!(volume, "Volume changed");
                false
            }
            PlaybackEvent::Error { message } => {
                warn!(%message, "Playback error");
                true
            }
        };

        if check_finished {
            let snapshot = player.snapshot()?;
            if snapshot.state == PlayerState::Stopped && !snapshot.is_loading {
                return Ok(started);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fast_args(max_tracks: usize) -> PlaybackArgs {
        PlaybackArgs {
            config: None,
            strategy: None,
            speed: 200.0,
            length: 1,
            max_tracks,
        }
    }

    #[test]
    fn plays_files_until_stopped() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = ["one.flac", "two.mp3"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::write(&path, b"not really audio").unwrap();
                path
            })
            .collect();

        play_files(&files, &fast_args(20)).unwrap();
    }

    #[test]
    fn repeat_all_stops_at_track_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.ogg");
        fs::write(&path, b"x").unwrap();

        let mut args = fast_args(3);
        args.strategy = Some(PlaybackStrategy::RepeatAll);
        play_files(&[path], &args).unwrap();
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let mut args = fast_args(1);
        args.config = Some(PathBuf::from("/nonexistent/lyra/playback.toml"));
        assert!(play_files(&[PathBuf::from("a.flac")], &args).is_err());
    }
}

//! Single-writer player thread
//!
//! Moves a [`PlaybackEngine`] onto its own thread. Commands and backend
//! notifications are both channel messages, and the thread `select!`s over
//! the two, so the engine is only ever touched from that thread.

use crate::{
    engine::PlaybackEngine,
    error::{PlaybackError, Result},
    observer::{ObserverId, PlaybackObserver},
    state::PlayerState,
    strategy::PlaybackStrategy,
};
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use lyra_core::TrackRef;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Commands sent to the player thread
enum Command {
    PlayQueue { tracks: Vec<TrackRef>, start: usize },
    UpdateQueue(Vec<TrackRef>),
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Previous,
    Seek(Duration),
    SetVolume(f32),
    SetEqualizerBand { band: usize, gain_db: f32 },
    SetStrategy(PlaybackStrategy),
    AddObserver(Arc<dyn PlaybackObserver>, Sender<ObserverId>),
    RemoveObserver(ObserverId),
    Snapshot(Sender<PlayerSnapshot>),
    Shutdown,
}

/// Point-in-time view of the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    pub strategy: PlaybackStrategy,
    pub current_index: Option<usize>,
    pub current_track: Option<TrackRef>,
    pub queue_len: usize,
    pub volume: f32,
    pub position: Duration,
    pub duration: Duration,
    pub equalizer: Vec<f32>,
    pub is_loading: bool,
}

impl PlayerSnapshot {
    fn capture(engine: &PlaybackEngine) -> Self {
        Self {
            state: engine.state(),
            strategy: engine.strategy(),
            current_index: engine.current_index(),
            current_track: engine.current_track().cloned(),
            queue_len: engine.queue().len(),
            volume: engine.volume(),
            position: engine.position(),
            duration: engine.duration(),
            equalizer: engine.equalizer().as_slice().to_vec(),
            is_loading: engine.is_loading(),
        }
    }
}

/// Spawns the player thread
pub struct PlayerController;

impl PlayerController {
    /// Move `engine` onto a new thread
    ///
    /// The thread exits on [`PlayerHandle::shutdown`] or once every handle
    /// is dropped, stopping playback either way.
    pub fn spawn(engine: PlaybackEngine) -> Result<PlayerHandle> {
        let (command_tx, command_rx) = unbounded();

        let thread = thread::Builder::new()
            .name("lyra-player".to_string())
            .spawn(move || run(engine, &command_rx))
            .map_err(|e| PlaybackError::backend(format!("failed to spawn player thread: {e}")))?;

        Ok(PlayerHandle {
            commands: command_tx,
            thread: Arc::new(Mutex::new(Some(thread))),
        })
    }
}

fn run(mut engine: PlaybackEngine, commands: &Receiver<Command>) {
    let backend_events = engine.backend_events();
    info!("Player thread started");

    loop {
        select! {
            recv(commands) -> msg => match msg {
                Ok(Command::Shutdown) | Err(_) => break,
                Ok(command) => execute(&mut engine, command),
            },
            recv(backend_events) -> event => {
                if let Ok(event) = event {
                    engine.handle_backend_event(event);
                    engine.process_backend_events();
                }
            }
        }
    }

    engine.stop();
    info!("Player thread exiting");
}

fn execute(engine: &mut PlaybackEngine, command: Command) {
    let result = match command {
        Command::PlayQueue { tracks, start } => engine.play_queue(tracks, start),
        Command::UpdateQueue(tracks) => {
            engine.update_queue(tracks);
            Ok(())
        }
        Command::Play => engine.play(),
        Command::Pause => engine.pause(),
        Command::PlayPause => engine.play_pause(),
        Command::Stop => {
            engine.stop();
            Ok(())
        }
        Command::Next => engine.next(),
        Command::Previous => engine.previous(),
        Command::Seek(position) => engine.seek(position),
        Command::SetVolume(volume) => {
            engine.set_volume(volume);
            Ok(())
        }
        Command::SetEqualizerBand { band, gain_db } => {
            engine.set_equalizer_band(band, gain_db);
            Ok(())
        }
        Command::SetStrategy(strategy) => {
            engine.set_strategy(strategy);
            Ok(())
        }
        Command::AddObserver(observer, reply) => {
            let _ = reply.send(engine.add_observer(observer));
            Ok(())
        }
        Command::RemoveObserver(id) => {
            engine.remove_observer(id);
            Ok(())
        }
        Command::Snapshot(reply) => {
            let _ = reply.send(PlayerSnapshot::capture(engine));
            Ok(())
        }
        Command::Shutdown => Ok(()),
    };

    // Nobody is waiting on the result, so observers get it
    if let Err(err) = result {
        engine.report_error(&err);
    }
}

/// Cloneable handle to the player thread
///
/// Commands are fire-and-forget; failures reach observers through
/// `on_playback_error`. Every method returns `ControllerDisconnected` once the
/// thread is gone.
#[derive(Clone)]
pub struct PlayerHandle {
    commands: Sender<Command>,
    thread: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl PlayerHandle {
    pub fn play_queue(&self, tracks: Vec<TrackRef>, start: usize) -> Result<()> {
        self.send(Command::PlayQueue { tracks, start })
    }

    pub fn play_track(&self, track: TrackRef) -> Result<()> {
        self.play_queue(vec![track], 0)
    }

    pub fn update_queue(&self, tracks: Vec<TrackRef>) -> Result<()> {
        self.send(Command::UpdateQueue(tracks))
    }

    pub fn play(&self) -> Result<()> {
        self.send(Command::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    pub fn play_pause(&self) -> Result<()> {
        self.send(Command::PlayPause)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Result<()> {
        self.send(Command::Next)
    }

    pub fn previous(&self) -> Result<()> {
        self.send(Command::Previous)
    }

    pub fn seek(&self, position: Duration) -> Result<()> {
        self.send(Command::Seek(position))
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.send(Command::SetVolume(volume))
    }

    pub fn set_equalizer_band(&self, band: usize, gain_db: f32) -> Result<()> {
        self.send(Command::SetEqualizerBand { band, gain_db })
    }

    pub fn set_strategy(&self, strategy: PlaybackStrategy) -> Result<()> {
        self.send(Command::SetStrategy(strategy))
    }

    /// Register an observer on the player thread
    ///
    /// Only a weak reference is kept; hold on to the `Arc`.
    pub fn add_observer(&self, observer: Arc<dyn PlaybackObserver>) -> Result<ObserverId> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send(Command::AddObserver(observer, reply_tx))?;
        reply_rx
            .recv()
            .map_err(|_| PlaybackError::ControllerDisconnected)
    }

    pub fn remove_observer(&self, id: ObserverId) -> Result<()> {
        self.send(Command::RemoveObserver(id))
    }

    /// Current state, taken after every earlier command has run
    pub fn snapshot(&self) -> Result<PlayerSnapshot> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send(Command::Snapshot(reply_tx))?;
        reply_rx
            .recv()
            .map_err(|_| PlaybackError::ControllerDisconnected)
    }

    /// Stop playback and wait for the player thread to exit
    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)?;

        let thread = self
            .thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(thread) = thread {
            thread
                .join()
                .map_err(|_| PlaybackError::backend("player thread panicked"))?;
        }
        debug!("Player controller shut down");
        Ok(())
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::ControllerDisconnected)
    }
}

impl std::fmt::Debug for PlayerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerHandle").finish_non_exhaustive()
    }
}

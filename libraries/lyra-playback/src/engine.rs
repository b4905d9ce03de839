//! Playback engine - core orchestration
//!
//! Owns the queue, current index, navigation history, volume, equalizer and
//! player state. Audio is rendered by a [`MediaBackend`]; its notifications
//! arrive on a channel and are applied by [`PlaybackEngine::process_backend_events`]
//! (or by the controller thread), so all mutation happens on one thread.

use crate::{
    backend::{BackendEvent, MediaBackend, MediaSession, SessionId, SessionNotifier},
    config::PlaybackConfig,
    equalizer::EqualizerGains,
    error::{PlaybackError, Result},
    history::History,
    observer::{ObserverId, ObserverRegistry, PlaybackObserver},
    state::{PlayerState, SideEffect, TransportCommand},
    strategy::PlaybackStrategy,
    volume::Volume,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use lyra_core::TrackRef;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Session currently owned by the engine
struct ActiveSession {
    id: SessionId,
    handle: Box<dyn MediaSession>,
    /// Backend reported `ready`
    ready: bool,
    /// Start playing as soon as the session is ready
    autoplay: bool,
}

/// Playback engine
///
/// Not thread-safe by itself: commands must be serialized. Either drive it
/// from one thread and call [`process_backend_events`](Self::process_backend_events)
/// regularly, or hand it to [`PlayerController`](crate::PlayerController).
pub struct PlaybackEngine {
    backend: Box<dyn MediaBackend>,

    queue: Vec<TrackRef>,
    current: Option<usize>,
    history: History,
    strategy: PlaybackStrategy,
    state: PlayerState,
    volume: Volume,
    equalizer: EqualizerGains,
    restart_threshold: Duration,

    session: Option<ActiveSession>,
    next_session_id: u64,

    events_tx: Sender<BackendEvent>,
    events_rx: Receiver<BackendEvent>,

    observers: ObserverRegistry,
    rng: StdRng,
}

impl PlaybackEngine {
    /// Create an engine with default configuration
    pub fn new(backend: impl MediaBackend + 'static) -> Self {
        Self::with_config(backend, &PlaybackConfig::default())
    }

    /// Create an engine from configuration
    pub fn with_config(backend: impl MediaBackend + 'static, config: &PlaybackConfig) -> Self {
        let (events_tx, events_rx) = unbounded();
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            backend: Box::new(backend),
            queue: Vec::new(),
            current: None,
            history: History::with_limit(config.history_size),
            strategy: config.strategy,
            state: PlayerState::Stopped,
            volume: Volume::new(config.volume),
            equalizer: config.equalizer_gains(),
            restart_threshold: config.restart_threshold(),
            session: None,
            next_session_id: 0,
            events_tx,
            events_rx,
            observers: ObserverRegistry::new(),
            rng,
        }
    }

    // ===== Queue =====

    /// Replace the queue and start playing `start`
    ///
    /// An empty queue or an out-of-range `start` is ignored.
    pub fn play_queue(&mut self, tracks: Vec<TrackRef>, start: usize) -> Result<()> {
        if start >= tracks.len() {
            debug!(len = tracks.len(), start, "Ignoring play_queue outside queue bounds");
            return Ok(());
        }

        info!(len = tracks.len(), start, "Replacing queue");
        self.queue = tracks;
        self.history.clear();
        self.load_index(start, false)
    }

    /// Play a single track as a one-element queue
    pub fn play_track(&mut self, track: TrackRef) -> Result<()> {
        self.play_queue(vec![track], 0)
    }

    /// Play a file from the local filesystem
    pub fn play_local_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.play_track(TrackRef::local(path))
    }

    /// Replace the queue without interrupting playback
    ///
    /// The current index follows the current track if it is still in the
    /// queue, otherwise it is clamped to the new bounds. An empty queue stops
    /// playback.
    pub fn update_queue(&mut self, tracks: Vec<TrackRef>) {
        let current_key = self.current_track().and_then(TrackRef::key);
        let was_empty = self.queue.is_empty();

        self.queue = tracks;
        self.history.clear();

        self.current = if was_empty || self.queue.is_empty() {
            None
        } else {
            current_key
                .and_then(|key| self.queue.iter().position(|t| t.key().as_ref() == Some(&key)))
                .or_else(|| self.current.map(|i| i.min(self.queue.len() - 1)))
        };

        info!(len = self.queue.len(), current = ?self.current, "Queue updated");
        if self.queue.is_empty() {
            self.stop();
        }
    }

    // ===== Playback Control =====

    /// Start or resume playback
    pub fn play(&mut self) -> Result<()> {
        self.transport(TransportCommand::Play)
    }

    pub fn pause(&mut self) -> Result<()> {
        self.transport(TransportCommand::Pause)
    }

    /// Toggle between playing and paused
    pub fn play_pause(&mut self) -> Result<()> {
        self.transport(self.state.toggle_command())
    }

    /// Stop playback and release the session
    ///
    /// Also cancels a load that is still in flight.
    pub fn stop(&mut self) {
        self.release_session();
        self.set_state(PlayerState::Stopped);
        self.notify_position(Duration::ZERO);
    }

    /// Skip to the next track
    ///
    /// Under RepeatOne this still advances by one. At the end of a
    /// sequential queue the engine stops on the last track.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }
        let Some(current) = self.current else {
            return self.load_index(0, false);
        };

        let len = self.queue.len();
        let target = if self.strategy == PlaybackStrategy::RepeatOne {
            Some((current + 1) % len)
        } else {
            self.strategy.next_index(current, len, &mut self.rng)
        };

        self.go_to(target, current)
    }

    /// Go to the previous track
    ///
    /// Past the restart threshold this restarts the current track instead.
    pub fn previous(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }
        let Some(current) = self.current else {
            return self.load_index(0, false);
        };

        if self.restart_if_past_threshold()? {
            return Ok(());
        }

        let len = self.queue.len();
        if self.strategy.is_randomized() {
            if let Some(index) = self.history.pop().filter(|i| *i < len) {
                debug!(index, "Previous from history");
                return self.load_index(index, false);
            }
        }

        let target = if self.strategy == PlaybackStrategy::RepeatOne {
            (current + len - 1) % len
        } else if self.state == PlayerState::Stopped {
            current
        } else {
            // Shuffle with empty history replays the current track
            self.strategy.previous_index(current, len).unwrap_or(current)
        };

        debug!(from = current, to = target, "Previous");
        self.load_index(target, false)
    }

    /// Jump within the current track
    ///
    /// No-op when nothing is loaded.
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        if let Err(err) = session.handle.seek(position) {
            return Err(self.fail_session(err));
        }
        self.notify_position(position);
        Ok(())
    }

    // ===== Strategy =====

    /// Change the ordering policy
    ///
    /// Leaving a randomized strategy clears navigation history.
    pub fn set_strategy(&mut self, strategy: PlaybackStrategy) {
        if !strategy.is_randomized() {
            self.history.clear();
        }
        if strategy != self.strategy {
            info!(%strategy, "Playback strategy changed");
        }
        self.strategy = strategy;
    }

    pub fn strategy(&self) -> PlaybackStrategy {
        self.strategy
    }

    // ===== Volume & Equalizer =====

    /// Set volume, clamped into [0.0, 1.0]
    ///
    /// Observers are always notified, even if the value did not change.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = self.volume.set(volume);
        if let Some(session) = self.session.as_mut() {
            session.handle.set_volume(volume);
        }
        self.observers.notify(|o| o.on_volume_changed(volume));
    }

    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Set one equalizer band; out-of-range bands are ignored
    pub fn set_equalizer_band(&mut self, band: usize, gain_db: f32) {
        if !self.equalizer.set(band, gain_db) {
            debug!(band, "Ignoring out-of-range equalizer band");
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.handle.apply_equalizer(self.equalizer.as_slice());
        }
    }

    /// Gain of one band in dB (0 for out-of-range bands)
    pub fn equalizer_band(&self, band: usize) -> f32 {
        self.equalizer.get(band)
    }

    pub fn equalizer(&self) -> &EqualizerGains {
        &self.equalizer
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Track at the current index
    pub fn current_track(&self) -> Option<&TrackRef> {
        self.current.and_then(|i| self.queue.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.filter(|i| *i < self.queue.len())
    }

    pub fn queue(&self) -> &[TrackRef] {
        &self.queue
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// A session exists but has not reported `ready` yet
    pub fn is_loading(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.ready)
    }

    /// Elapsed time in the current track (zero when nothing is loaded)
    pub fn position(&self) -> Duration {
        self.session
            .as_ref()
            .map_or(Duration::ZERO, |s| s.handle.position())
    }

    /// Duration of the current track (zero when nothing is loaded)
    pub fn duration(&self) -> Duration {
        self.session
            .as_ref()
            .map_or(Duration::ZERO, |s| s.handle.duration())
    }

    pub fn restart_threshold(&self) -> Duration {
        self.restart_threshold
    }

    // ===== Observers =====

    /// Register an observer
    ///
    /// The engine keeps a weak reference only; keep your `Arc` alive.
    pub fn add_observer(&mut self, observer: Arc<dyn PlaybackObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Deliver an error with no synchronous caller to every observer
    pub fn report_error(&mut self, err: &PlaybackError) {
        warn!(error = %err, "Playback error");
        let message = err.to_string();
        self.observers.notify(|o| o.on_playback_error(&message));
    }

    // ===== Backend Events =====

    /// Receiver for backend notifications
    ///
    /// Only needed when the caller waits on several channels at once; pass
    /// received events to [`handle_backend_event`](Self::handle_backend_event).
    pub fn backend_events(&self) -> Receiver<BackendEvent> {
        self.events_rx.clone()
    }

    /// Apply every pending backend notification
    ///
    /// Consecutive position reports are collapsed to the latest one. Returns
    /// the number of events taken off the channel.
    pub fn process_backend_events(&mut self) -> usize {
        let events: Vec<BackendEvent> = self.events_rx.try_iter().collect();
        let count = events.len();

        let mut events = events.into_iter().peekable();
        while let Some(event) = events.next() {
            let superseded = matches!(event, BackendEvent::Position { .. })
                && matches!(events.peek(), Some(BackendEvent::Position { .. }));
            if !superseded {
                self.handle_backend_event(event);
            }
        }

        count
    }

    /// Apply one backend notification
    ///
    /// Events from sessions other than the active one are dropped.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        let is_active = self
            .session
            .as_ref()
            .is_some_and(|s| s.id == event.session());
        if !is_active {
            debug!(session = %event.session(), ?event, "Ignoring event from superseded session");
            return;
        }

        match event {
            BackendEvent::Ready { .. } => self.on_ready(),
            BackendEvent::EndOfMedia { .. } => {
                if let Err(err) = self.advance_after_end() {
                    self.report_error(&err);
                }
            }
            BackendEvent::Position { position, .. } => self.notify_position(position),
            BackendEvent::Failed { reason, .. } => {
                let track = self
                    .current_track()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                let err = self.fail_session(PlaybackError::media_load(track, reason));
                self.report_error(&err);
            }
        }
    }

    // ===== Internal =====

    fn transport(&mut self, command: TransportCommand) -> Result<()> {
        let Some(transition) = self.state.apply(command) else {
            return Ok(());
        };

        match transition.effect {
            SideEffect::Start => return self.start_current(),
            SideEffect::Resume => {
                if let Some(session) = self.session.as_mut() {
                    session.autoplay = true;
                    if session.ready {
                        if let Err(err) = session.handle.play() {
                            return Err(self.fail_session(err));
                        }
                    }
                }
            }
            SideEffect::Pause => {
                if let Some(session) = self.session.as_mut() {
                    session.autoplay = false;
                    if session.ready {
                        if let Err(err) = session.handle.pause() {
                            return Err(self.fail_session(err));
                        }
                    }
                }
            }
            SideEffect::Release => {
                self.stop();
                return Ok(());
            }
        }

        self.set_state(transition.to);
        Ok(())
    }

    /// Play from Stopped: load the current track or start a ready session
    fn start_current(&mut self) -> Result<()> {
        let Some(index) = self.current_index() else {
            return Ok(());
        };

        let Some(session) = self.session.as_mut() else {
            return self.load_index(index, false);
        };

        session.autoplay = true;
        if !session.ready {
            return Ok(());
        }
        if let Err(err) = session.handle.play() {
            return Err(self.fail_session(err));
        }
        self.set_state(PlayerState::Playing);
        Ok(())
    }

    /// Load a navigation target, or stop at the end of the queue
    fn go_to(&mut self, target: Option<usize>, current: usize) -> Result<()> {
        match target {
            Some(index) => {
                debug!(from = current, to = index, strategy = %self.strategy, "Next");
                self.load_index(index, true)
            }
            None => {
                debug!(index = current, "End of queue");
                self.stop();
                Ok(())
            }
        }
    }

    /// Natural end of the current track
    fn advance_after_end(&mut self) -> Result<()> {
        let Some(current) = self.current_index() else {
            self.stop();
            return Ok(());
        };

        let target = self
            .strategy
            .next_index(current, self.queue.len(), &mut self.rng);
        self.go_to(target, current)
    }

    /// Restart the current track if it has played past the threshold
    fn restart_if_past_threshold(&mut self) -> Result<bool> {
        let threshold = self.restart_threshold;
        let Some(session) = self.session.as_mut().filter(|s| s.ready) else {
            return Ok(false);
        };

        let position = session.handle.position();
        if position.is_zero() || position <= threshold {
            return Ok(false);
        }

        debug!(position_ms = position.as_millis() as u64, "Restarting current track");
        if let Err(err) = session.handle.seek(Duration::ZERO) {
            return Err(self.fail_session(err));
        }
        self.notify_position(Duration::ZERO);
        Ok(true)
    }

    /// Make `index` current and start loading it
    ///
    /// The previous session is released first, which is what makes any late
    /// callback from it stale.
    fn load_index(&mut self, index: usize, push_history: bool) -> Result<()> {
        let Some(track) = self.queue.get(index).cloned() else {
            return Ok(());
        };

        if push_history && self.strategy.is_randomized() {
            if let Some(current) = self.current {
                self.history.push(current);
            }
        }

        self.release_session();
        self.current = Some(index);

        let id = SessionId::new(self.next_session_id);
        self.next_session_id += 1;
        let notifier = SessionNotifier::new(id, self.events_tx.clone());

        match self.backend.load(&track, notifier) {
            Ok(mut handle) => {
                handle.set_volume(self.volume.level());
                handle.apply_equalizer(self.equalizer.as_slice());
                debug!(index, session = %id, track = %track, "Loading track");
                self.session = Some(ActiveSession {
                    id,
                    handle,
                    ready: false,
                    autoplay: true,
                });
                Ok(())
            }
            Err(err) => {
                warn!(index, track = %track, error = %err, "Failed to load track");
                self.set_state(PlayerState::Stopped);
                Err(match err {
                    PlaybackError::MediaLoad { .. } => err,
                    other => PlaybackError::media_load(track.to_string(), other.to_string()),
                })
            }
        }
    }

    fn on_ready(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.ready {
            return;
        }
        session.ready = true;

        if session.autoplay {
            if let Err(err) = session.handle.play() {
                let err = self.fail_session(err);
                self.report_error(&err);
                return;
            }
            self.set_state(PlayerState::Playing);
        }

        if let Some(track) = self.current_track().cloned() {
            info!(track = %track, index = ?self.current, "Now playing");
            self.observers.notify(|o| o.on_track_changed(&track));
        }
    }

    /// Drop the active session and force Stopped
    fn fail_session(&mut self, err: PlaybackError) -> PlaybackError {
        warn!(error = %err, "Media session failed");
        self.release_session();
        self.set_state(PlayerState::Stopped);
        err
    }

    fn release_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            debug!(session = %session.id, "Releasing session");
            session.handle.stop();
        }
    }

    fn set_state(&mut self, state: PlayerState) {
        if self.state == state {
            return;
        }
        debug!(from = %self.state, to = %state, "State changed");
        self.state = state;
        self.observers.notify(|o| o.on_state_changed(state));
    }

    fn notify_position(&mut self, position: Duration) {
        self.observers.notify(|o| o.on_position_changed(position));
    }
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("state", &self.state)
            .field("strategy", &self.strategy)
            .field("queue_len", &self.queue.len())
            .field("current", &self.current)
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

//! Playback events
//!
//! Owned, serializable mirror of the observer callbacks, for code that would
//! rather receive values than implement [`PlaybackObserver`]: UI bridges,
//! logs and tests.

use crate::observer::PlaybackObserver;
use crate::state::PlayerState;
use crossbeam_channel::{unbounded, Receiver, Sender};
use lyra_core::TrackRef;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Player state changed
    StateChanged { state: PlayerState },

    /// A new track is current and its media is ready
    TrackChanged { track: TrackRef },

    /// Position update (latest value only)
    PositionChanged { position_ms: u64 },

    /// Volume changed (0.0 - 1.0)
    VolumeChanged { volume: f32 },

    /// Error occurred during playback
    Error { message: String },
}

impl PlaybackEvent {
    pub fn position(position: Duration) -> Self {
        Self::PositionChanged {
            position_ms: u64::try_from(position.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Observer that keeps every event in memory
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<PlaybackEvent>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.lock().clone()
    }

    /// Take everything recorded so far
    pub fn drain(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Recorded state changes, in order
    pub fn states(&self) -> Vec<PlayerState> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                PlaybackEvent::StateChanged { state } => Some(*state),
                _ => None,
            })
            .collect()
    }

    /// Titles of recorded track changes, in order
    pub fn track_titles(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                PlaybackEvent::TrackChanged { track } => Some(track.title().to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                PlaybackEvent::Error { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: PlaybackEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PlaybackEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlaybackObserver for EventRecorder {
    fn on_state_changed(&self, state: PlayerState) {
        self.push(PlaybackEvent::StateChanged { state });
    }

    fn on_track_changed(&self, track: &TrackRef) {
        self.push(PlaybackEvent::TrackChanged {
            track: track.clone(),
        });
    }

    fn on_position_changed(&self, position: Duration) {
        self.push(PlaybackEvent::position(position));
    }

    fn on_volume_changed(&self, volume: f32) {
        self.push(PlaybackEvent::VolumeChanged { volume });
    }

    fn on_playback_error(&self, message: &str) {
        self.push(PlaybackEvent::Error {
            message: message.to_string(),
        });
    }
}

/// Observer that forwards events over a channel
///
/// The channel is always unbounded: observers run on the player thread, and
/// a full channel would block it while the receiver waits on the player.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: Sender<PlaybackEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel
    pub fn channel() -> (Self, Receiver<PlaybackEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    fn forward(&self, event: PlaybackEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Event receiver dropped");
        }
    }
}

impl PlaybackObserver for ChannelObserver {
    fn on_state_changed(&self, state: PlayerState) {
        self.forward(PlaybackEvent::StateChanged { state });
    }

    fn on_track_changed(&self, track: &TrackRef) {
        self.forward(PlaybackEvent::TrackChanged {
            track: track.clone(),
        });
    }

    fn on_position_changed(&self, position: Duration) {
        self.forward(PlaybackEvent::position(position));
    }

    fn on_volume_changed(&self, volume: f32) {
        self.forward(PlaybackEvent::VolumeChanged { volume });
    }

    fn on_playback_error(&self, message: &str) {
        self.forward(PlaybackEvent::Error {
            message: message.to_string(),
        });
    }
}

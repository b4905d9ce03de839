//! Lyra - Playback Engine
//!
//! Platform-agnostic playback control for Lyra.
//!
//! This crate provides:
//! - Player state machine (Stopped, Playing, Paused)
//! - Playback strategies (Sequential, Repeat One, Repeat All, Shuffle)
//! - Navigation history for "previous" under shuffle
//! - Volume and 10-band equalizer gains that survive track changes
//! - Observer fan-out for state, track, position, volume and error changes
//! - A single-writer controller thread and a simulated clock backend
//!
//! # Architecture
//!
//! `lyra-playback` never decodes audio. A [`MediaBackend`] produces a
//! [`MediaSession`] per track and reports `ready`, position ticks and
//! end-of-media through a channel the engine drains on its own thread. Late
//! notifications from a session the engine already replaced are discarded.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use lyra_core::{TrackId, TrackRef};
//! use lyra_playback::{ClockBackend, EventRecorder, PlaybackEngine, PlayerState};
//! use std::sync::Arc;
//!
//! let mut engine = PlaybackEngine::new(ClockBackend::new());
//! let recorder = Arc::new(EventRecorder::new());
//! engine.add_observer(recorder.clone());
//!
//! let queue = vec![
//!     TrackRef::catalog(TrackId::new(1), "So What", "Miles Davis"),
//!     TrackRef::catalog(TrackId::new(2), "Freddie Freeloader", "Miles Davis"),
//! ];
//! engine.play_queue(queue, 0).unwrap();
//!
//! // The clock backend reports `ready` straight away
//! engine.process_backend_events();
//! assert_eq!(engine.state(), PlayerState::Playing);
//! assert_eq!(recorder.track_titles(), vec!["So What".to_string()]);
//!
//! engine.set_volume(1.7);
//! assert_eq!(engine.volume(), 1.0);
//! engine.stop();
//! ```
//!
//! # Example: Controller Thread
//!
//! ```rust,no_run
//! use lyra_core::TrackRef;
//! use lyra_playback::{ClockBackend, PlaybackEngine, PlaybackStrategy, PlayerController};
//!
//! let engine = PlaybackEngine::new(ClockBackend::new().with_speed(20.0));
//! let player = PlayerController::spawn(engine).unwrap();
//!
//! player.set_strategy(PlaybackStrategy::RepeatAll).unwrap();
//! player.play_queue(vec![TrackRef::local("/music/take5.flac")], 0).unwrap();
//! println!("{:?}", player.snapshot().unwrap().state);
//! player.shutdown().unwrap();
//! ```

#![forbid(unsafe_code)]

mod backend;
mod clock;
pub mod config;
mod controller;
pub mod equalizer;
mod engine;
mod error;
mod events;
mod facade;
mod history;
mod observer;
mod state;
mod strategy;
mod volume;

// Public exports
pub use backend::{BackendEvent, MediaBackend, MediaSession, SessionId, SessionNotifier};
pub use clock::{ClockBackend, ClockSession};
pub use config::PlaybackConfig;
pub use controller::{PlayerController, PlayerHandle, PlayerSnapshot};
pub use engine::PlaybackEngine;
pub use equalizer::{EqualizerGains, BAND_COUNT};
pub use error::{PlaybackError, Result};
pub use events::{ChannelObserver, EventRecorder, PlaybackEvent};
pub use facade::{Player, RepeatMode};
pub use history::History;
pub use observer::{ObserverId, ObserverRegistry, PlaybackObserver};
pub use state::{PlayerState, SideEffect, Transition, TransportCommand};
pub use strategy::PlaybackStrategy;
pub use volume::{Volume, DEFAULT_VOLUME};

//! Media backend traits
//!
//! The engine never renders audio itself. A [`MediaBackend`] turns a
//! [`TrackRef`] into a [`MediaSession`]; the session reports back through a
//! [`SessionNotifier`] from whatever thread it likes. Notifications land on a
//! channel that the engine drains on its own thread, so callbacks never touch
//! engine state directly.

use crate::error::Result;
use crossbeam_channel::Sender;
use lyra_core::TrackRef;
use std::fmt;
use std::time::Duration;

/// Identifies one load of one track
///
/// Every `load` gets a fresh id, which is how the engine recognises
/// notifications from a session it already abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Asynchronous notification from a media session
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// Session can start playing
    Ready { session: SessionId },
    /// Playback reached the end of the media
    EndOfMedia { session: SessionId },
    /// Periodic position report
    Position {
        session: SessionId,
        position: Duration,
    },
    /// Session failed after `load` returned (decode error, stream dropped, ...)
    Failed { session: SessionId, reason: String },
}

impl BackendEvent {
    /// Session the event belongs to
    pub fn session(&self) -> SessionId {
        match self {
            Self::Ready { session }
            | Self::EndOfMedia { session }
            | Self::Position { session, .. }
            | Self::Failed { session, .. } => *session,
        }
    }
}

/// Callback handle given to a backend on `load`
///
/// Cheap to clone and safe to move to another thread. Sends after the engine
/// is gone are dropped silently.
#[derive(Debug, Clone)]
pub struct SessionNotifier {
    session: SessionId,
    tx: Sender<BackendEvent>,
}

impl SessionNotifier {
    pub fn new(session: SessionId, tx: Sender<BackendEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// The session can start playing
    pub fn ready(&self) {
        self.send(BackendEvent::Ready {
            session: self.session,
        });
    }

    /// Playback reached the end
    pub fn end_of_media(&self) {
        self.send(BackendEvent::EndOfMedia {
            session: self.session,
        });
    }

    /// Report the current position
    pub fn position(&self, position: Duration) {
        self.send(BackendEvent::Position {
            session: self.session,
            position,
        });
    }

    /// The session failed and cannot continue
    pub fn failed(&self, reason: impl Into<String>) {
        self.send(BackendEvent::Failed {
            session: self.session,
            reason: reason.into(),
        });
    }

    fn send(&self, event: BackendEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(session = %self.session, "Engine gone, dropping backend event");
        }
    }
}

/// Produces playable sessions from track references
///
/// Implementations: a desktop decoder, a streaming client, or the simulated
/// [`ClockBackend`](crate::ClockBackend).
pub trait MediaBackend: Send {
    /// Start loading `track`
    ///
    /// May return before the media is playable; the session calls
    /// `notifier.ready()` once it is. An `Err` means the source cannot be
    /// resolved at all.
    fn load(&mut self, track: &TrackRef, notifier: SessionNotifier)
        -> Result<Box<dyn MediaSession>>;
}

/// One loaded track
///
/// Dropping a session must release it as well; `stop` only makes the release
/// explicit.
pub trait MediaSession: Send {
    /// Start or resume playback
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Stop and release decoding resources
    fn stop(&mut self);

    /// Jump to `position` from the start of the track
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Volume in [0.0, 1.0]
    fn set_volume(&mut self, volume: f32);

    /// Gains in dB, one per band
    fn apply_equalizer(&mut self, gains: &[f32]);

    /// Elapsed time
    fn position(&self) -> Duration;

    /// Total duration (zero while unknown)
    fn duration(&self) -> Duration;
}

impl<B: MediaBackend + ?Sized> MediaBackend for Box<B> {
    fn load(
        &mut self,
        track: &TrackRef,
        notifier: SessionNotifier,
    ) -> Result<Box<dyn MediaSession>> {
        (**self).load(track, notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn notifier_tags_events_with_its_session() {
        let (tx, rx) = unbounded();
        let notifier = SessionNotifier::new(SessionId::new(3), tx);

        notifier.ready();
        notifier.position(Duration::from_secs(2));
        notifier.failed("decoder crashed");

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.session() == SessionId::new(3)));
        assert_eq!(
            events[2],
            BackendEvent::Failed {
                session: SessionId::new(3),
                reason: "decoder crashed".to_string()
            }
        );
    }

    #[test]
    fn sending_after_receiver_dropped_is_harmless() {
        let (tx, rx) = unbounded();
        drop(rx);
        let notifier = SessionNotifier::new(SessionId::new(1), tx);
        notifier.end_of_media();
    }
}

//! Simulated clock backend
//!
//! A [`MediaBackend`] with no audio output. Sessions are ready immediately and
//! a ticker thread advances a virtual play head, reporting positions and
//! signalling end-of-media when it reaches the track length. Useful for dry
//! runs and threaded tests.

use crate::backend::{MediaBackend, MediaSession, SessionNotifier};
use crate::error::{PlaybackError, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use lyra_core::TrackRef;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

/// Length used for tracks without a duration hint
pub const DEFAULT_TRACK_LENGTH: Duration = Duration::from_secs(30);

/// Default real-time interval between position reports
pub const DEFAULT_TICK: Duration = Duration::from_millis(250);

/// Media backend driven by a wall clock instead of a decoder
#[derive(Debug, Clone)]
pub struct ClockBackend {
    tick: Duration,
    speed: f64,
    default_length: Duration,
}

impl ClockBackend {
    pub fn new() -> Self {
        Self {
            tick: DEFAULT_TICK,
            speed: 1.0,
            default_length: DEFAULT_TRACK_LENGTH,
        }
    }

    /// Play `speed` seconds of media per real second
    ///
    /// Non-positive or non-finite values fall back to real time.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            1.0
        };
        self
    }

    /// Real-time interval between ticks
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    /// Length of tracks that carry no duration hint
    #[must_use]
    pub fn with_default_length(mut self, length: Duration) -> Self {
        self.default_length = length;
        self
    }
}

impl Default for ClockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaBackend for ClockBackend {
    fn load(
        &mut self,
        track: &TrackRef,
        notifier: SessionNotifier,
    ) -> Result<Box<dyn MediaSession>> {
        if let Some(path) = track.local_path() {
            if !path.is_file() {
                return Err(PlaybackError::media_load(
                    track.to_string(),
                    format!("file not found: {}", path.display()),
                ));
            }
        }

        let duration = if track.duration_hint().is_zero() {
            self.default_length
        } else {
            track.duration_hint()
        };

        let clock = Arc::new(Mutex::new(Clock {
            position: Duration::ZERO,
            playing: false,
            finished: false,
        }));

        // Dropping the sender (session stop or drop) ends the ticker
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let ticker = Ticker {
            clock: clock.clone(),
            notifier: notifier.clone(),
            stop: stop_rx,
            tick: self.tick,
            step: self.tick.mul_f64(self.speed),
            duration,
        };
        thread::Builder::new()
            .name(format!("lyra-clock-{}", notifier.session().get()))
            .spawn(move || ticker.run())
            .map_err(|e| PlaybackError::backend(format!("failed to start clock: {e}")))?;

        notifier.ready();

        Ok(Box::new(ClockSession {
            clock,
            duration,
            volume: 1.0,
            equalizer: Vec::new(),
            stop: Some(stop_tx),
        }))
    }
}

#[derive(Debug)]
struct Clock {
    position: Duration,
    playing: bool,
    finished: bool,
}

fn lock(clock: &Mutex<Clock>) -> MutexGuard<'_, Clock> {
    clock.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Ticker {
    clock: Arc<Mutex<Clock>>,
    notifier: SessionNotifier,
    stop: Receiver<()>,
    tick: Duration,
    step: Duration,
    duration: Duration,
}

impl Ticker {
    fn run(self) {
        loop {
            match self.stop.recv_timeout(self.tick) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            }

            let (position, finished) = {
                let mut clock = lock(&self.clock);
                if !clock.playing || clock.finished {
                    continue;
                }
                clock.position = (clock.position + self.step).min(self.duration);
                clock.finished = clock.position >= self.duration;
                (clock.position, clock.finished)
            };

            self.notifier.position(position);
            if finished {
                self.notifier.end_of_media();
                return;
            }
        }
    }
}

/// Session of the clock backend
#[derive(Debug)]
pub struct ClockSession {
    clock: Arc<Mutex<Clock>>,
    duration: Duration,
    volume: f32,
    equalizer: Vec<f32>,
    stop: Option<Sender<()>>,
}

impl ClockSession {
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn equalizer(&self) -> &[f32] {
        &self.equalizer
    }
}

impl MediaSession for ClockSession {
    fn play(&mut self) -> Result<()> {
        if self.stop.is_none() {
            return Err(PlaybackError::backend("session already stopped"));
        }
        lock(&self.clock).playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        lock(&self.clock).playing = false;
        Ok(())
    }

    fn stop(&mut self) {
        lock(&self.clock).playing = false;
        self.stop = None;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let mut clock = lock(&self.clock);
        if clock.finished {
            return Err(PlaybackError::backend("cannot seek after end of media"));
        }
        clock.position = position.min(self.duration);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn apply_equalizer(&mut self, gains: &[f32]) {
        self.equalizer = gains.to_vec();
    }

    fn position(&self) -> Duration {
        lock(&self.clock).position
    }

    fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendEvent, SessionId};
    use crossbeam_channel::unbounded;
    use lyra_core::TrackId;

    fn track(secs: u64) -> TrackRef {
        TrackRef::catalog(TrackId::new(1), "Clocked", "Tester")
            .with_duration(Duration::from_secs(secs))
    }

    #[test]
    fn missing_local_file_fails_to_load() {
        let (tx, _rx) = unbounded();
        let mut backend = ClockBackend::new();
        let result = backend.load(
            &TrackRef::local("/definitely/not/here.flac"),
            SessionNotifier::new(SessionId::new(0), tx),
        );
        assert!(matches!(result, Err(PlaybackError::MediaLoad { .. })));
    }

    #[test]
    fn session_is_ready_immediately_and_runs_to_the_end() {
        let (tx, rx) = unbounded();
        let mut backend = ClockBackend::new()
            .with_tick(Duration::from_millis(5))
            .with_speed(200.0);
        let mut session = backend
            .load(&track(2), SessionNotifier::new(SessionId::new(4), tx))
            .unwrap();

        assert_eq!(
            rx.recv_timeout(Duration::from_secs(1)).unwrap(),
            BackendEvent::Ready {
                session: SessionId::new(4)
            }
        );
        assert_eq!(session.duration(), Duration::from_secs(2));

        session.play().unwrap();
        let mut saw_end = false;
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(2)) {
            if event == (BackendEvent::EndOfMedia { session: SessionId::new(4) }) {
                saw_end = true;
                break;
            }
        }
        assert!(saw_end);
        assert_eq!(session.position(), Duration::from_secs(2));
    }

    #[test]
    fn paused_session_does_not_advance() {
        let (tx, rx) = unbounded();
        let mut backend = ClockBackend::new().with_tick(Duration::from_millis(2));
        let session = backend
            .load(&track(60), SessionNotifier::new(SessionId::new(0), tx))
            .unwrap();

        thread::sleep(Duration::from_millis(30));
        assert_eq!(session.position(), Duration::ZERO);
        // Only the ready notification
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn seek_is_clamped_to_duration() {
        let (tx, _rx) = unbounded();
        let mut backend = ClockBackend::new();
        let mut session = backend
            .load(&track(10), SessionNotifier::new(SessionId::new(0), tx))
            .unwrap();

        session.seek(Duration::from_secs(99)).unwrap();
        assert_eq!(session.position(), Duration::from_secs(10));
        session.stop();
        assert!(session.play().is_err());
    }

    #[test]
    fn tracks_without_hint_use_default_length() {
        let (tx, _rx) = unbounded();
        let mut backend = ClockBackend::new().with_default_length(Duration::from_secs(5));
        let session = backend
            .load(
                &TrackRef::catalog(TrackId::new(2), "No length", "X"),
                SessionNotifier::new(SessionId::new(0), tx),
            )
            .unwrap();
        assert_eq!(session.duration(), Duration::from_secs(5));
    }
}

//! Shared helpers for playback integration tests
//!
//! `ScriptedBackend` never produces sound. It records every command sent to
//! each session and lets the test decide when a session becomes ready, ends
//! or fails.

#![allow(dead_code)]

use lyra_core::{TrackId, TrackRef};
use lyra_playback::{
    MediaBackend, MediaSession, PlaybackEngine, PlaybackError, Result, SessionNotifier,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Command received by a scripted session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Volume(f32),
    Equalizer(Vec<f32>),
}

#[derive(Debug)]
pub struct SessionRecord {
    pub title: String,
    pub notifier: SessionNotifier,
    pub commands: Vec<SessionCommand>,
    pub position: Duration,
}

#[derive(Debug, Default)]
struct Script {
    sessions: Vec<SessionRecord>,
    failing: HashSet<String>,
}

/// Media backend driven by the test
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    /// Make every future load of `title` fail
    pub fn fail_loading(&self, title: &str) {
        self.script().failing.insert(title.to_string());
    }

    pub fn session_count(&self) -> usize {
        self.script().sessions.len()
    }

    /// Titles in load order
    pub fn loaded_titles(&self) -> Vec<String> {
        self.script().sessions.iter().map(|s| s.title.clone()).collect()
    }

    pub fn commands(&self, session: usize) -> Vec<SessionCommand> {
        self.script().sessions[session].commands.clone()
    }

    pub fn last_commands(&self) -> Vec<SessionCommand> {
        self.script()
            .sessions
            .last()
            .map(|s| s.commands.clone())
            .unwrap_or_default()
    }

    pub fn notifier(&self, session: usize) -> SessionNotifier {
        self.script().sessions[session].notifier.clone()
    }

    fn last_notifier(&self) -> SessionNotifier {
        self.script().sessions.last().unwrap().notifier.clone()
    }

    /// What the latest session reports as elapsed time
    pub fn set_position(&self, position: Duration) {
        if let Some(session) = self.script().sessions.last_mut() {
            session.position = position;
        }
    }

    pub fn ready(&self) {
        self.last_notifier().ready();
    }

    pub fn end_of_media(&self) {
        self.last_notifier().end_of_media();
    }

    pub fn tick(&self, position: Duration) {
        self.last_notifier().position(position);
    }

    pub fn fail(&self, reason: &str) {
        self.last_notifier().failed(reason);
    }
}

impl MediaBackend for ScriptedBackend {
    fn load(
        &mut self,
        track: &TrackRef,
        notifier: SessionNotifier,
    ) -> Result<Box<dyn MediaSession>> {
        let mut script = self.script();
        if script.failing.contains(track.title()) {
            return Err(PlaybackError::media_load(track.title(), "unsupported format"));
        }

        script.sessions.push(SessionRecord {
            title: track.title().to_string(),
            notifier,
            commands: Vec::new(),
            position: Duration::ZERO,
        });

        Ok(Box::new(ScriptedSession {
            script: self.script.clone(),
            index: script.sessions.len() - 1,
        }))
    }
}

struct ScriptedSession {
    script: Arc<Mutex<Script>>,
    index: usize,
}

impl ScriptedSession {
    fn record(&self, command: SessionCommand) {
        self.script.lock().unwrap().sessions[self.index]
            .commands
            .push(command);
    }
}

impl MediaSession for ScriptedSession {
    fn play(&mut self) -> Result<()> {
        self.record(SessionCommand::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.record(SessionCommand::Pause);
        Ok(())
    }

    fn stop(&mut self) {
        self.record(SessionCommand::Stop);
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.record(SessionCommand::Seek(position));
        self.script.lock().unwrap().sessions[self.index].position = position;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(SessionCommand::Volume(volume));
    }

    fn apply_equalizer(&mut self, gains: &[f32]) {
        self.record(SessionCommand::Equalizer(gains.to_vec()));
    }

    fn position(&self) -> Duration {
        self.script.lock().unwrap().sessions[self.index].position
    }

    fn duration(&self) -> Duration {
        Duration::from_secs(180)
    }
}

pub fn create_test_track(id: i64, title: &str) -> TrackRef {
    TrackRef::catalog(TrackId::new(id), title, "Test Artist")
        .with_duration(Duration::from_secs(180))
}

/// Queue of `n` tracks titled "A", "B", "C", ...
pub fn lettered_queue(n: usize) -> Vec<TrackRef> {
    (0..n)
        .map(|i| {
            let title = char::from(b'A' + i as u8).to_string();
            create_test_track(i as i64, &title)
        })
        .collect()
}

/// Engine plus a handle to its scripted backend
pub fn engine() -> (PlaybackEngine, ScriptedBackend) {
    let backend = ScriptedBackend::new();
    (PlaybackEngine::new(backend.clone()), backend)
}

/// Signal ready on the latest session and apply it
pub fn make_ready(engine: &mut PlaybackEngine, backend: &ScriptedBackend) {
    backend.ready();
    engine.process_backend_events();
}

/// Title of the engine's current track
pub fn current_title(engine: &PlaybackEngine) -> Option<String> {
    engine.current_track().map(|t| t.title().to_string())
}

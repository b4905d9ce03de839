//! Player state machine
//!
//! The transition table is a pure function so the engine can ask "what
//! happens if" before touching the media session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mode the player is in; exactly one is active at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// Nothing is playing (initial state)
    #[default]
    Stopped,
    /// Audio is playing
    Playing,
    /// Playing track is paused mid-way
    Paused,
}

/// Transport command applied to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    Play,
    Pause,
    Stop,
}

/// What the engine must ask the media session to do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Load and start the current track
    Start,
    /// Resume the paused session
    Resume,
    /// Pause the session
    Pause,
    /// Stop the session and release its resources
    Release,
}

/// Result of applying a command in a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: PlayerState,
    pub effect: SideEffect,
}

impl PlayerState {
    /// Apply `command`; `None` means the command is a no-op in this state
    pub fn apply(self, command: TransportCommand) -> Option<Transition> {
        use PlayerState::{Paused, Playing, Stopped};
        use TransportCommand as C;

        let (to, effect) = match (self, command) {
            (Stopped, C::Play) => (Playing, SideEffect::Start),
            (Playing, C::Pause) => (Paused, SideEffect::Pause),
            (Paused, C::Play) => (Playing, SideEffect::Resume),
            (Playing | Paused, C::Stop) => (Stopped, SideEffect::Release),
            (Stopped, C::Pause | C::Stop) | (Playing, C::Play) | (Paused, C::Pause) => {
                return None
            }
        };

        Some(Transition { to, effect })
    }

    /// Command `play_pause` maps to in this state
    pub fn toggle_command(self) -> TransportCommand {
        match self {
            Self::Playing => TransportCommand::Pause,
            Self::Stopped | Self::Paused => TransportCommand::Play,
        }
    }

    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "Stopped",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
        };
        f.write_str(name)
    }
}

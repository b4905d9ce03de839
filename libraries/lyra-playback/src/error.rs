//! Error types for playback

use lyra_core::LyraError;
use thiserror::Error;

/// Playback errors
///
/// Empty queues and out-of-range indices are not errors: those commands are
/// silently ignored by the engine.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The media backend could not resolve or decode a track
    #[error("Could not load '{track}': {reason}")]
    MediaLoad { track: String, reason: String },

    /// An active session rejected a command
    #[error("Media backend error: {0}")]
    Backend(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The controller thread is gone
    #[error("Player controller is no longer running")]
    ControllerDisconnected,

    /// Catalog request made through the player failed
    #[error(transparent)]
    Catalog(#[from] LyraError),
}

impl PlaybackError {
    /// Create a media load error
    pub fn media_load(track: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MediaLoad {
            track: track.into(),
            reason: reason.into(),
        }
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

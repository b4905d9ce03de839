/// Playback configuration
use crate::equalizer::EqualizerGains;
use crate::error::{PlaybackError, Result};
use crate::strategy::PlaybackStrategy;
use crate::volume::DEFAULT_VOLUME;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix, e.g. `LYRA_PLAYBACK_VOLUME=0.8`
pub const ENV_PREFIX: &str = "LYRA_PLAYBACK";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub strategy: PlaybackStrategy,

    /// Initial volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Maximum number of remembered shuffle steps; unbounded when unset
    #[serde(default)]
    pub history_size: Option<usize>,

    /// Past this point "previous" restarts the current track
    #[serde(default = "default_restart_threshold_ms")]
    pub restart_threshold_ms: u64,

    /// Initial equalizer gains in dB, lowest band first
    #[serde(default)]
    pub equalizer: Vec<f32>,

    /// Seed for reproducible shuffle order
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

impl PlaybackConfig {
    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables (prefixed with `LYRA_PLAYBACK_`) override the
    /// file. `LYRA_PLAYBACK_EQUALIZER` takes a comma separated list.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(PlaybackError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("equalizer"),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            strategy = %config.strategy,
            volume = config.volume,
            history_size = ?config.history_size,
            "Loaded playback configuration"
        );

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.volume.is_finite() {
            return Err(PlaybackError::Config(format!(
                "volume must be a finite number, got {}",
                self.volume
            )));
        }

        if self.history_size == Some(0) {
            return Err(PlaybackError::Config(
                "history_size must be at least 1".to_string(),
            ));
        }

        if let Some(band) = self.equalizer.iter().position(|g| !g.is_finite()) {
            return Err(PlaybackError::Config(format!(
                "equalizer band {band} is not a finite gain"
            )));
        }

        Ok(())
    }

    pub fn restart_threshold(&self) -> Duration {
        Duration::from_millis(self.restart_threshold_ms)
    }

    pub fn equalizer_gains(&self) -> EqualizerGains {
        EqualizerGains::from_slice(&self.equalizer)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            strategy: PlaybackStrategy::default(),
            volume: default_volume(),
            history_size: None,
            restart_threshold_ms: default_restart_threshold_ms(),
            equalizer: Vec::new(),
            shuffle_seed: None,
        }
    }
}

// Default values
fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_restart_threshold_ms() -> u64 {
    3000
}

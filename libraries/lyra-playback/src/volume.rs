//! Volume control
//!
//! Linear scalar in [0.0, 1.0] handed to the media session as-is. The backend
//! decides how to map it onto gain.

/// Initial volume for a new engine
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Volume level, always within [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f32,
}

impl Volume {
    /// Create a volume, clamping `level` into range
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level),
        }
    }

    /// Set the level, clamping into range
    ///
    /// Returns the stored value.
    pub fn set(&mut self, level: f32) -> f32 {
        self.level = Self::clamp(level);
        self.level
    }

    pub fn level(self) -> f32 {
        self.level
    }

    /// NaN is treated as silence
    fn clamp(level: f32) -> f32 {
        if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

//! Equalizer gains
//!
//! Ten fixed bands, gains in dB. The engine keeps these across track changes
//! and pushes the whole array to every newly loaded session.

/// Number of equalizer bands
pub const BAND_COUNT: usize = 10;

/// Centre frequency of each band in Hz
pub const BAND_FREQUENCIES: [f32; BAND_COUNT] = [
    32.0, 64.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
];

/// Lowest accepted gain in dB
pub const MIN_GAIN_DB: f32 = -24.0;

/// Highest accepted gain in dB
pub const MAX_GAIN_DB: f32 = 12.0;

/// Per-band gain values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EqualizerGains {
    bands: [f32; BAND_COUNT],
}

impl EqualizerGains {
    /// Flat response (all bands at 0 dB)
    pub fn flat() -> Self {
        Self::default()
    }

    /// Build from a list of gains
    ///
    /// Missing bands stay at 0 dB, extra values are ignored.
    pub fn from_slice(gains: &[f32]) -> Self {
        let mut eq = Self::flat();
        for (index, gain) in gains.iter().take(BAND_COUNT).enumerate() {
            eq.set(index, *gain);
        }
        eq
    }

    /// Set one band
    ///
    /// Returns `false` (and changes nothing) for an out-of-range index.
    pub fn set(&mut self, index: usize, gain_db: f32) -> bool {
        match self.bands.get_mut(index) {
            Some(band) => {
                *band = clamp_gain(gain_db);
                true
            }
            None => false,
        }
    }

    /// Gain of one band; 0 dB for an out-of-range index
    pub fn get(&self, index: usize) -> f32 {
        self.bands.get(index).copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.bands
    }

    pub fn is_flat(&self) -> bool {
        self.bands.iter().all(|g| *g == 0.0)
    }
}

fn clamp_gain(gain_db: f32) -> f32 {
    if gain_db.is_nan() {
        0.0
    } else {
        gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB)
    }
}

//! Playback strategies
//!
//! Pure index arithmetic: given the current index and queue length, pick the
//! next or previous index. The engine owns everything stateful (history,
//! the RepeatOne skip override, the scrub-back restart).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlaybackError;

/// Ordering policy for the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackStrategy {
    /// Play in order, stop after the last track
    #[default]
    Sequential,
    /// Replay the current track
    RepeatOne,
    /// Play in order, wrap around at both ends
    RepeatAll,
    /// Pick a random track, never the current one when there is a choice
    Shuffle,
}

impl PlaybackStrategy {
    /// Next index, or `None` for end-of-queue
    ///
    /// Returns `None` for an empty queue.
    pub fn next_index<R: Rng + ?Sized>(
        self,
        current: usize,
        len: usize,
        rng: &mut R,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }

        match self {
            Self::Sequential => {
                let next = current + 1;
                (next < len).then_some(next)
            }
            Self::RepeatOne => Some(current.min(len - 1)),
            Self::RepeatAll => Some((current + 1) % len),
            Self::Shuffle => Some(random_other(current, len, rng)),
        }
    }

    /// Previous index
    ///
    /// `None` only for an empty queue or for `Shuffle`, whose forward step
    /// cannot be inverted; the engine falls back to its history there.
    pub fn previous_index(self, current: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }

        match self {
            Self::Sequential => Some(current.saturating_sub(1).min(len - 1)),
            Self::RepeatOne => Some(current.min(len - 1)),
            Self::RepeatAll => Some((current % len + len - 1) % len),
            Self::Shuffle => None,
        }
    }

    /// Whether "previous" must be answered from navigation history
    pub fn is_randomized(self) -> bool {
        matches!(self, Self::Shuffle)
    }

    /// All strategies, in menu order
    pub const ALL: [Self; 4] = [
        Self::Sequential,
        Self::RepeatOne,
        Self::RepeatAll,
        Self::Shuffle,
    ];
}

/// Uniform pick in `[0, len)` excluding `current` when `len > 1`
fn random_other<R: Rng + ?Sized>(current: usize, len: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return 0;
    }
    if current >= len {
        return rng.gen_range(0..len);
    }

    // Draw from len - 1 slots and skip over the current one
    let pick = rng.gen_range(0..len - 1);
    if pick >= current {
        pick + 1
    } else {
        pick
    }
}

impl fmt::Display for PlaybackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sequential => "Sequential",
            Self::RepeatOne => "Repeat One",
            Self::RepeatAll => "Repeat All",
            Self::Shuffle => "Shuffle",
        };
        f.write_str(name)
    }
}

impl FromStr for PlaybackStrategy {
    type Err = PlaybackError;

    /// Parse the kebab-case name used in configuration files
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "repeat-one" => Ok(Self::RepeatOne),
            "repeat-all" => Ok(Self::RepeatAll),
            "shuffle" => Ok(Self::Shuffle),
            other => Err(PlaybackError::Config(format!(
                "unknown playback strategy '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn sequential_stops_at_the_end() {
        let s = PlaybackStrategy::Sequential;
        assert_eq!(s.next_index(0, 3, &mut rng()), Some(1));
        assert_eq!(s.next_index(2, 3, &mut rng()), None);
    }

    #[test]
    fn sequential_previous_clamps_to_zero() {
        let s = PlaybackStrategy::Sequential;
        assert_eq!(s.previous_index(2, 3), Some(1));
        assert_eq!(s.previous_index(0, 3), Some(0));
    }

    #[test]
    fn repeat_one_stays_put() {
        let s = PlaybackStrategy::RepeatOne;
        assert_eq!(s.next_index(1, 3, &mut rng()), Some(1));
        assert_eq!(s.previous_index(1, 3), Some(1));
    }

    #[test]
    fn repeat_all_wraps_both_ways() {
        let s = PlaybackStrategy::RepeatAll;
        assert_eq!(s.next_index(2, 3, &mut rng()), Some(0));
        assert_eq!(s.previous_index(0, 3), Some(2));
        assert_eq!(s.previous_index(2, 3), Some(1));
    }

    #[test]
    fn shuffle_never_repeats_immediately() {
        let s = PlaybackStrategy::Shuffle;
        let mut rng = rng();
        for current in 0..5 {
            for _ in 0..50 {
                let next = s.next_index(current, 5, &mut rng).unwrap();
                assert_ne!(next, current);
                assert!(next < 5);
            }
        }
    }

    #[test]
    fn shuffle_single_track_returns_zero() {
        let s = PlaybackStrategy::Shuffle;
        assert_eq!(s.next_index(0, 1, &mut rng()), Some(0));
    }

    #[test]
    fn shuffle_previous_is_undefined() {
        assert_eq!(PlaybackStrategy::Shuffle.previous_index(2, 4), None);
        assert!(PlaybackStrategy::Shuffle.is_randomized());
        assert!(!PlaybackStrategy::RepeatAll.is_randomized());
    }

    #[test]
    fn empty_queue_has_no_neighbours() {
        for s in PlaybackStrategy::ALL {
            assert_eq!(s.next_index(0, 0, &mut rng()), None);
            assert_eq!(s.previous_index(0, 0), None);
        }
    }

    #[test]
    fn serde_names_are_kebab_case() {
        let json = serde_json::to_string(&PlaybackStrategy::RepeatOne).unwrap();
        assert_eq!(json, "\"repeat-one\"");
        let parsed: PlaybackStrategy = serde_json::from_str("\"shuffle\"").unwrap();
        assert_eq!(parsed, PlaybackStrategy::Shuffle);
    }

    #[test]
    fn parse_from_config_names() {
        assert_eq!("Repeat-All".parse::<PlaybackStrategy>().unwrap(), PlaybackStrategy::RepeatAll);
        assert!("random".parse::<PlaybackStrategy>().is_err());
    }

    #[test]
    fn display_names() {
        assert_eq!(PlaybackStrategy::RepeatAll.to_string(), "Repeat All");
        assert_eq!(PlaybackStrategy::Sequential.to_string(), "Sequential");
    }
}

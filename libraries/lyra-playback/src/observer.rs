//! Observer registry
//!
//! Listeners are held weakly: the engine never keeps an observer alive. Each
//! registration gets an [`ObserverId`] so removal is a map lookup.

use crate::state::PlayerState;
use lyra_core::TrackRef;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Listener for engine changes
///
/// Every method has an empty default so observers only implement what they
/// care about. Calls happen synchronously on the engine's thread.
pub trait PlaybackObserver: Send + Sync {
    fn on_state_changed(&self, _state: PlayerState) {}

    /// Fired once the new track's media is ready
    fn on_track_changed(&self, _track: &TrackRef) {}

    /// Latest position; intermediate ticks may be skipped
    fn on_position_changed(&self, _position: Duration) {}

    fn on_volume_changed(&self, _volume: f32) {}

    /// Error with no synchronous caller to report it to
    fn on_playback_error(&self, _message: &str) {}
}

/// Registration handle returned by [`ObserverRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

struct Entry {
    observer: Weak<dyn PlaybackObserver>,
    /// Allocation address, used to spot duplicate registrations
    addr: usize,
}

/// Set of registered observers
#[derive(Default)]
pub struct ObserverRegistry {
    entries: BTreeMap<ObserverId, Entry>,
    next_id: u64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    ///
    /// Only a weak reference is kept, so the caller must hold on to its
    /// `Arc`. Registering the same observer again returns the existing id.
    pub fn add(&mut self, observer: Arc<dyn PlaybackObserver>) -> ObserverId {
        self.prune();

        let addr = address_of(&observer);
        if let Some((id, _)) = self.entries.iter().find(|(_, e)| e.addr == addr) {
            return *id;
        }

        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                observer: Arc::downgrade(&observer),
                addr,
            },
        );
        id
    }

    /// Unregister; unknown ids are ignored
    ///
    /// Returns whether something was removed.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Number of observers that are still alive
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.observer.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call `f` on every live observer
    ///
    /// Observers are collected before the first call so a callback cannot
    /// observe a half-iterated registry.
    pub fn notify(&mut self, f: impl Fn(&dyn PlaybackObserver)) {
        self.prune();
        let live: Vec<Arc<dyn PlaybackObserver>> = self
            .entries
            .values()
            .filter_map(|e| e.observer.upgrade())
            .collect();

        for observer in &live {
            f(observer.as_ref());
        }
    }

    fn prune(&mut self) {
        self.entries.retain(|_, e| e.observer.strong_count() > 0);
    }
}

fn address_of(observer: &Arc<dyn PlaybackObserver>) -> usize {
    Arc::as_ptr(observer).cast::<()>() as usize
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.entries.len())
            .finish()
    }
}

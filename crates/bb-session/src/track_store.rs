//! Fixed-capacity collection of track configuration records.

use bb_ir::{TrackConfig, MAX_TRACKS};

/// The sixteen track slots of a session.
///
/// Out-of-range ids resolve to `None`; callers treat that as a no-op
/// rather than an error, matching the tolerant load pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackStore {
    slots: [TrackConfig; MAX_TRACKS],
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, track: usize) -> Option<&TrackConfig> {
        self.slots.get(track)
    }

    pub fn get_mut(&mut self, track: usize) -> Option<&mut TrackConfig> {
        self.slots.get_mut(track)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackConfig> {
        self.slots.iter()
    }
}

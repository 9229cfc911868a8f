//! Per-track configuration records.

use alloc::string::String;
use arrayvec::ArrayString;

use crate::note::InstrumentKind;

/// Number of track slots in a session.
pub const MAX_TRACKS: usize = 16;

/// Capacity of the fixed track-name buffer.
pub const TRACK_NAME_CAPACITY: usize = 16;

/// ADSR applied when a synth voice is created (attack, decay, sustain, release).
pub const DEFAULT_ADSR: [f32; 4] = [0.0, 0.2, 0.3, 0.5];

/// Two-pole filter settings for one track.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FilterConfig {
    /// Filter type index (engine-defined: low-pass, high-pass, ...)
    pub kind: i32,
    /// Cutoff frequency in Hz
    pub frequency: i32,
    /// Resonance (0.0-1.0)
    pub resonance: f32,
    /// Wet/dry mix (0.0-1.0)
    pub mix: f32,
}

/// Delay-line settings for one track.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DelayConfig {
    pub feedback: f32,
    pub mix: f32,
}

/// Bit-crusher settings for one track.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CrusherConfig {
    pub amount: f32,
    pub mix: f32,
}

/// Mutable configuration for one track slot.
///
/// An effect block being `Some` means the effect is enabled and its engine
/// resource exists; the session guarantees the resource is allocated at most
/// once per track. `voice_allocated` is the matching guard for the voice
/// chain (channel + instrument + synth + sequencer track).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackConfig {
    /// Track name (truncated to fit the fixed buffer)
    pub name: ArrayString<TRACK_NAME_CAPACITY>,
    /// Sound source, set when the voice chain is created
    pub instrument: Option<InstrumentKind>,
    /// Last bound sample file name (sampler tracks)
    pub sample_name: Option<String>,
    /// Attack, decay, sustain, release
    pub adsr: [f32; 4],
    pub volume: f32,
    pub pan: f32,
    pub muted: bool,
    /// Chord tracks auto-harmonize inserted notes (3rd + 5th scale degree)
    pub chord: bool,
    /// Has the engine voice chain been created for this slot?
    pub voice_allocated: bool,
    pub filter: Option<FilterConfig>,
    pub delay: Option<DelayConfig>,
    pub crusher: Option<CrusherConfig>,
}

impl TrackConfig {
    /// Copy `name` into the fixed buffer, truncating rather than failing.
    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        for ch in name.chars() {
            if self.name.try_push(ch).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_name_truncates_long_names() {
        let mut track = TrackConfig::default();
        track.set_name("a-name-well-beyond-sixteen-chars");
        assert_eq!(track.name.len(), TRACK_NAME_CAPACITY);
        assert_eq!(&track.name[..4], "a-na");
    }

    #[test]
    fn set_name_replaces_previous() {
        let mut track = TrackConfig::default();
        track.set_name("kick");
        track.set_name("sn");
        assert_eq!(track.name.as_str(), "sn");
    }
}

//! Note events and instrument kinds.

/// A single note event.
///
/// Built incrementally while decoding one `notes` array element, then
/// consumed into the target track and reset for the next element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Note {
    /// MIDI-style pitch (0-127)
    pub pitch: u8,
    /// Length in sequencer steps
    pub len: u32,
    /// Velocity (0.0-1.0)
    pub velocity: f32,
}

impl Note {
    /// Reset all fields to zero (element-open callback).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Sound source for a track voice.
///
/// Order matches the beat file's `type` name table; `Sampler` selects
/// sample playback, every other kind is a synth waveform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstrumentKind {
    Sampler,
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Noise,
    Phase,
    Digital,
    Vosim,
    Wavetable,
}

/// All recognized instrument kinds, in name-table order.
pub const INSTRUMENT_KINDS: [InstrumentKind; 10] = [
    InstrumentKind::Sampler,
    InstrumentKind::Sine,
    InstrumentKind::Square,
    InstrumentKind::Sawtooth,
    InstrumentKind::Triangle,
    InstrumentKind::Noise,
    InstrumentKind::Phase,
    InstrumentKind::Digital,
    InstrumentKind::Vosim,
    InstrumentKind::Wavetable,
];

impl InstrumentKind {
    /// The name used in beat files (case-sensitive).
    pub fn name(&self) -> &'static str {
        match self {
            InstrumentKind::Sampler => "sampler",
            InstrumentKind::Sine => "sine",
            InstrumentKind::Square => "square",
            InstrumentKind::Sawtooth => "sawtooth",
            InstrumentKind::Triangle => "triangle",
            InstrumentKind::Noise => "noise",
            InstrumentKind::Phase => "phase",
            InstrumentKind::Digital => "digital",
            InstrumentKind::Vosim => "vosim",
            InstrumentKind::Wavetable => "wavetable",
        }
    }

    /// Case-sensitive exact lookup against the name table.
    pub fn from_name(name: &str) -> Option<InstrumentKind> {
        INSTRUMENT_KINDS.iter().find(|k| k.name() == name).copied()
    }

    /// Does this kind play back samples rather than a synth waveform?
    pub fn is_sampler(&self) -> bool {
        matches!(self, InstrumentKind::Sampler)
    }
}

//! Mirror types for engine calls.

use alloc::string::String;
use bb_ir::InstrumentKind;

/// A per-track engine resource, named for teardown bookkeeping.
///
/// Release order on teardown: `Filter`, `Delay`, `BitCrusher`, `Synth`,
/// `Instrument`, `Channel`, `SequencerTrack`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineResource {
    Filter,
    Delay,
    BitCrusher,
    Synth,
    Instrument,
    Channel,
    SequencerTrack,
}

/// One recorded engine call.
///
/// Variants mirror [`crate::AudioEngine`] one to one, so a recorded command
/// stream is a complete transcript of the side effects a load or session
/// operation produced.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCommand {
    SetTempo { steps_per_second: f32 },
    CreateVoiceChain { track: usize },
    SetWaveform { track: usize, kind: InstrumentKind },
    AddVoiceCopies { track: usize, copies: u8 },
    SetAdsr { track: usize, attack: f32, decay: f32, sustain: f32, release: f32 },
    LoadSample { track: usize, path: String },
    SetVolume { track: usize, volume: f32 },
    SetPan { track: usize, pan: f32 },
    SetMuted { track: usize, muted: bool },
    CreateFilter { track: usize },
    SetFilterParams { track: usize, kind: i32, frequency: i32, resonance: f32, mix: f32 },
    CreateDelay { track: usize },
    SetDelayParams { track: usize, feedback: f32, mix: f32 },
    CreateBitCrusher { track: usize },
    SetBitCrusherParams { track: usize, amount: f32, mix: f32 },
    AddNote { track: usize, step: u32, len: u32, pitch: u8, velocity: f32 },
    SetLoop { start: u32, end: u32, loops: u32 },
    SetCurrentStep { step: u32 },
    Play,
    Stop,
    Free { track: usize, resource: EngineResource },
}

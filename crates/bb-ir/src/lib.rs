//! Core IR types for the backbeat step sequencer.
//!
//! This crate defines the data model shared by the load pipeline and the
//! session layer: note events, instrument kinds, per-track configuration
//! records, and the scale/pitch-mapping engine.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod note;
pub mod scale;
mod track;

pub use note::{InstrumentKind, Note, INSTRUMENT_KINDS};
pub use scale::{
    PitchClass, Scale, ScaleTable, NOTE_MAX, NOTE_MIN, PITCH_CLASSES, SCALES,
    SEMITONES_PER_OCTAVE,
};
pub use track::{
    CrusherConfig, DelayConfig, FilterConfig, TrackConfig, DEFAULT_ADSR, MAX_TRACKS,
    TRACK_NAME_CAPACITY,
};

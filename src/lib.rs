//! backbeat: a scale-aware step sequencer core.
//!
//! Umbrella crate re-exporting the workspace members:
//!
//! - [`ir`]: notes, tracks, scales, and the pitch-mapping table
//! - [`engine`]: the audio engine boundary and a recording test double
//! - [`session`]: the live beat session over tracks, scale, and engine
//! - [`load`]: the streaming beat-file load pipeline

pub use bb_engine as engine;
pub use bb_ir as ir;
pub use bb_load as load;
pub use bb_session as session;

pub use bb_engine::{AudioEngine, CommandLog, EngineCommand, EngineResource};
pub use bb_ir::{InstrumentKind, Note, PitchClass, Scale, ScaleTable, TrackConfig, MAX_TRACKS};
pub use bb_load::{load_beat, BeatReader, DecodeEvent, EventSource, ScriptSource, Value};
pub use bb_session::{BeatSession, TrackStore};

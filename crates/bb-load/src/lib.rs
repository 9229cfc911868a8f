//! Streaming beat-file load pipeline.
//!
//! The external decoder walks a nested keyed/array document and pushes
//! events into a [`DecodeSink`]; this crate supplies the consumer side: a
//! depth-tracked section state machine ([`BeatReader`]) that accumulates
//! per-section builders and commits them into the session at section
//! boundaries. The decoder and storage themselves stay outside the core,
//! behind the [`EventSource`] seam.

mod event;
mod reader;
mod section;

pub use event::{DecodeEvent, DecodeSink, EventSource, ScriptSource, SourceError, Value};
pub use reader::{load_beat, BeatReader};
pub use section::{SectionFrame, SectionKind, MAX_SECTION_DEPTH};

//! Session layer for the backbeat step sequencer.
//!
//! A [`BeatSession`] owns the track store, the scale table, the global
//! tempo, and the engine handle; every mutation the load pipeline performs
//! goes through it. Per-track operations are tolerant: a bad track id or a
//! missing voice chain makes them a no-op, never an error.

mod session;
mod track_store;

pub use session::BeatSession;
pub use track_store::TrackStore;

//! Audio-engine boundary for the backbeat step sequencer.
//!
//! The sequencer core never renders audio itself; it drives an external
//! engine through the [`AudioEngine`] trait. Every call has a mirror
//! variant in [`EngineCommand`], and [`CommandLog`] is an engine that
//! records the call stream, which is how the load pipeline and session are
//! tested without a real audio backend.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod command;
mod command_log;
mod traits;

pub use command::{EngineCommand, EngineResource};
pub use command_log::CommandLog;
pub use traits::AudioEngine;

//! The engine trait consumed by the sequencer core.

use bb_ir::InstrumentKind;

use crate::command::EngineResource;

/// External audio engine driven by the session and load pipeline.
///
/// Tracks are addressed by slot index; the engine owns the actual voice and
/// effect resources. Callers (the session layer) guarantee that
/// `create_voice_chain` and the effect `create_*` calls are issued at most
/// once per track, and that every created resource is freed exactly once
/// via [`AudioEngine::free`].
pub trait AudioEngine {
    /// Set the sequencer clock rate in steps per second.
    fn set_tempo(&mut self, steps_per_second: f32);

    /// Allocate the per-track resources: channel, instrument, synth voice,
    /// and sequencer track.
    fn create_voice_chain(&mut self, track: usize);

    /// Assign a synth waveform to the track's voice.
    fn set_waveform(&mut self, track: usize, kind: InstrumentKind);

    /// Duplicate the track's synth voice to widen its polyphony.
    fn add_voice_copies(&mut self, track: usize, copies: u8);

    fn set_adsr(&mut self, track: usize, attack: f32, decay: f32, sustain: f32, release: f32);

    /// Load a sample resource and bind it to the track's voice.
    ///
    /// Returns `false` when the resource cannot be opened; the caller logs
    /// and carries on.
    fn load_sample(&mut self, track: usize, path: &str) -> bool;

    fn set_volume(&mut self, track: usize, volume: f32);
    fn set_pan(&mut self, track: usize, pan: f32);
    fn set_muted(&mut self, track: usize, muted: bool);

    /// Allocate the track's two-pole filter.
    fn create_filter(&mut self, track: usize);
    fn set_filter_params(&mut self, track: usize, kind: i32, frequency: i32, resonance: f32, mix: f32);

    /// Allocate the track's delay line.
    fn create_delay(&mut self, track: usize);
    fn set_delay_params(&mut self, track: usize, feedback: f32, mix: f32);

    /// Allocate the track's bit crusher.
    fn create_bit_crusher(&mut self, track: usize);
    fn set_bit_crusher_params(&mut self, track: usize, amount: f32, mix: f32);

    /// Add a note event to the track's sequencer lane.
    fn add_note(&mut self, track: usize, step: u32, len: u32, pitch: u8, velocity: f32);

    /// Set the transport loop region and loop count (0 = forever).
    fn set_loop(&mut self, start: u32, end: u32, loops: u32);
    fn set_current_step(&mut self, step: u32);
    fn play(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    fn current_step(&self) -> u32;

    /// Release one per-track engine resource.
    fn free(&mut self, track: usize, resource: EngineResource);
}

impl<E: AudioEngine + ?Sized> AudioEngine for &mut E {
    fn set_tempo(&mut self, steps_per_second: f32) {
        (**self).set_tempo(steps_per_second);
    }

    fn create_voice_chain(&mut self, track: usize) {
        (**self).create_voice_chain(track);
    }

    fn set_waveform(&mut self, track: usize, kind: InstrumentKind) {
        (**self).set_waveform(track, kind);
    }

    fn add_voice_copies(&mut self, track: usize, copies: u8) {
        (**self).add_voice_copies(track, copies);
    }

    fn set_adsr(&mut self, track: usize, attack: f32, decay: f32, sustain: f32, release: f32) {
        (**self).set_adsr(track, attack, decay, sustain, release);
    }

    fn load_sample(&mut self, track: usize, path: &str) -> bool {
        (**self).load_sample(track, path)
    }

    fn set_volume(&mut self, track: usize, volume: f32) {
        (**self).set_volume(track, volume);
    }

    fn set_pan(&mut self, track: usize, pan: f32) {
        (**self).set_pan(track, pan);
    }

    fn set_muted(&mut self, track: usize, muted: bool) {
        (**self).set_muted(track, muted);
    }

    fn create_filter(&mut self, track: usize) {
        (**self).create_filter(track);
    }

    fn set_filter_params(&mut self, track: usize, kind: i32, frequency: i32, resonance: f32, mix: f32) {
        (**self).set_filter_params(track, kind, frequency, resonance, mix);
    }

    fn create_delay(&mut self, track: usize) {
        (**self).create_delay(track);
    }

    fn set_delay_params(&mut self, track: usize, feedback: f32, mix: f32) {
        (**self).set_delay_params(track, feedback, mix);
    }

    fn create_bit_crusher(&mut self, track: usize) {
        (**self).create_bit_crusher(track);
    }

    fn set_bit_crusher_params(&mut self, track: usize, amount: f32, mix: f32) {
        (**self).set_bit_crusher_params(track, amount, mix);
    }

    fn add_note(&mut self, track: usize, step: u32, len: u32, pitch: u8, velocity: f32) {
        (**self).add_note(track, step, len, pitch, velocity);
    }

    fn set_loop(&mut self, start: u32, end: u32, loops: u32) {
        (**self).set_loop(start, end, loops);
    }

    fn set_current_step(&mut self, step: u32) {
        (**self).set_current_step(step);
    }

    fn play(&mut self) {
        (**self).play();
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }

    fn current_step(&self) -> u32 {
        (**self).current_step()
    }

    fn free(&mut self, track: usize, resource: EngineResource) {
        (**self).free(track, resource);
    }
}

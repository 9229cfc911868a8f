//! A recording engine for headless runs and tests.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use bb_ir::InstrumentKind;

use crate::command::{EngineCommand, EngineResource};
use crate::traits::AudioEngine;

/// An [`AudioEngine`] that records every call in order.
///
/// Besides the transcript it models just enough transport state
/// (playing flag, current step) for the session's play/stop paths to be
/// observable. Sample paths registered via [`CommandLog::fail_sample`]
/// report as missing, which is how resource-open failures are simulated.
#[derive(Clone, Debug, Default)]
pub struct CommandLog {
    commands: Vec<EngineCommand>,
    missing_samples: Vec<String>,
    playing: bool,
    step: u32,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `load_sample` report failure for this exact path.
    pub fn fail_sample(&mut self, path: &str) {
        self.missing_samples.push(path.to_string());
    }

    /// The full recorded call transcript.
    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    /// Drop the transcript (keeps transport state and failure config).
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Note events recorded for one track, as (step, len, pitch, velocity).
    pub fn notes_for(&self, track: usize) -> Vec<(u32, u32, u8, f32)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                EngineCommand::AddNote { track: t, step, len, pitch, velocity } if *t == track => {
                    Some((*step, *len, *pitch, *velocity))
                }
                _ => None,
            })
            .collect()
    }

    /// Resources freed for one track, in release order.
    pub fn frees_for(&self, track: usize) -> Vec<EngineResource> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                EngineCommand::Free { track: t, resource } if *t == track => Some(*resource),
                _ => None,
            })
            .collect()
    }

    /// How many commands match the predicate.
    pub fn count_where<F: Fn(&EngineCommand) -> bool>(&self, f: F) -> usize {
        self.commands.iter().filter(|c| f(c)).count()
    }
}

impl AudioEngine for CommandLog {
    fn set_tempo(&mut self, steps_per_second: f32) {
        self.commands.push(EngineCommand::SetTempo { steps_per_second });
    }

    fn create_voice_chain(&mut self, track: usize) {
        self.commands.push(EngineCommand::CreateVoiceChain { track });
    }

    fn set_waveform(&mut self, track: usize, kind: InstrumentKind) {
        self.commands.push(EngineCommand::SetWaveform { track, kind });
    }

    fn add_voice_copies(&mut self, track: usize, copies: u8) {
        self.commands.push(EngineCommand::AddVoiceCopies { track, copies });
    }

    fn set_adsr(&mut self, track: usize, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.commands.push(EngineCommand::SetAdsr { track, attack, decay, sustain, release });
    }

    fn load_sample(&mut self, track: usize, path: &str) -> bool {
        self.commands.push(EngineCommand::LoadSample { track, path: path.to_string() });
        !self.missing_samples.iter().any(|p| p == path)
    }

    fn set_volume(&mut self, track: usize, volume: f32) {
        self.commands.push(EngineCommand::SetVolume { track, volume });
    }

    fn set_pan(&mut self, track: usize, pan: f32) {
        self.commands.push(EngineCommand::SetPan { track, pan });
    }

    fn set_muted(&mut self, track: usize, muted: bool) {
        self.commands.push(EngineCommand::SetMuted { track, muted });
    }

    fn create_filter(&mut self, track: usize) {
        self.commands.push(EngineCommand::CreateFilter { track });
    }

    fn set_filter_params(&mut self, track: usize, kind: i32, frequency: i32, resonance: f32, mix: f32) {
        self.commands
            .push(EngineCommand::SetFilterParams { track, kind, frequency, resonance, mix });
    }

    fn create_delay(&mut self, track: usize) {
        self.commands.push(EngineCommand::CreateDelay { track });
    }

    fn set_delay_params(&mut self, track: usize, feedback: f32, mix: f32) {
        self.commands.push(EngineCommand::SetDelayParams { track, feedback, mix });
    }

    fn create_bit_crusher(&mut self, track: usize) {
        self.commands.push(EngineCommand::CreateBitCrusher { track });
    }

    fn set_bit_crusher_params(&mut self, track: usize, amount: f32, mix: f32) {
        self.commands.push(EngineCommand::SetBitCrusherParams { track, amount, mix });
    }

    fn add_note(&mut self, track: usize, step: u32, len: u32, pitch: u8, velocity: f32) {
        self.commands.push(EngineCommand::AddNote { track, step, len, pitch, velocity });
    }

    fn set_loop(&mut self, start: u32, end: u32, loops: u32) {
        self.commands.push(EngineCommand::SetLoop { start, end, loops });
    }

    fn set_current_step(&mut self, step: u32) {
        self.step = step;
        self.commands.push(EngineCommand::SetCurrentStep { step });
    }

    fn play(&mut self) {
        self.playing = true;
        self.commands.push(EngineCommand::Play);
    }

    fn stop(&mut self) {
        self.playing = false;
        self.commands.push(EngineCommand::Stop);
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn current_step(&self) -> u32 {
        self.step
    }

    fn free(&mut self, track: usize, resource: EngineResource) {
        self.commands.push(EngineCommand::Free { track, resource });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut log = CommandLog::new();
        log.set_tempo(8.0);
        log.create_voice_chain(3);
        log.add_note(3, 0, 2, 60, 0.5);

        assert_eq!(
            log.commands(),
            &[
                EngineCommand::SetTempo { steps_per_second: 8.0 },
                EngineCommand::CreateVoiceChain { track: 3 },
                EngineCommand::AddNote { track: 3, step: 0, len: 2, pitch: 60, velocity: 0.5 },
            ]
        );
    }

    #[test]
    fn notes_for_filters_by_track() {
        let mut log = CommandLog::new();
        log.add_note(0, 0, 1, 36, 1.0);
        log.add_note(1, 4, 2, 60, 0.8);
        log.add_note(0, 8, 1, 38, 1.0);

        assert_eq!(log.notes_for(0), vec![(0, 1, 36, 1.0), (8, 1, 38, 1.0)]);
        assert_eq!(log.notes_for(1), vec![(4, 2, 60, 0.8)]);
    }

    #[test]
    fn missing_sample_reports_failure() {
        let mut log = CommandLog::new();
        log.fail_sample("samples/missing.wav");

        assert!(log.load_sample(0, "samples/kick.wav"));
        assert!(!log.load_sample(0, "samples/missing.wav"));
        // Both attempts are still recorded.
        assert_eq!(log.count_where(|c| matches!(c, EngineCommand::LoadSample { .. })), 2);
    }

    #[test]
    fn transport_state_tracks_play_stop() {
        let mut log = CommandLog::new();
        assert!(!log.is_playing());
        log.play();
        assert!(log.is_playing());
        log.set_current_step(7);
        assert_eq!(log.current_step(), 7);
        log.stop();
        assert!(!log.is_playing());
    }
}

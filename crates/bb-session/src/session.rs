//! The beat session: composition root over tracks, scale, and engine.

use bb_engine::{AudioEngine, EngineResource};
use bb_ir::{InstrumentKind, Note, PitchClass, Scale, ScaleTable, DEFAULT_ADSR};

use crate::track_store::TrackStore;

/// Steps per beat of the sequencer clock (16th-note grid).
pub const STEPS_PER_BEAT: f32 = 4.0;

/// A live beat session.
///
/// Owns the engine handle for its lifetime; on drop, every engine resource
/// the session allocated is released exactly once, effects first, then the
/// voice chain.
pub struct BeatSession<E: AudioEngine> {
    engine: E,
    tracks: TrackStore,
    scale: ScaleTable,
    bpm: i32,
    step_rate: f32,
    beat_length: u32,
    beat_name: Option<String>,
    version: i32,
}

impl<E: AudioEngine> BeatSession<E> {
    /// Create a session with defaults: 120 BPM, Major scale rooted at C,
    /// empty tracks.
    pub fn new(engine: E) -> Self {
        let mut session = Self {
            engine,
            tracks: TrackStore::new(),
            scale: ScaleTable::new(),
            bpm: 0,
            step_rate: 0.0,
            beat_length: 0,
            beat_name: None,
            version: 1,
        };
        session.set_tempo(120);
        session
    }

    // --- Accessors ---

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn tracks(&self) -> &TrackStore {
        &self.tracks
    }

    pub fn scale(&self) -> &ScaleTable {
        &self.scale
    }

    pub fn bpm(&self) -> i32 {
        self.bpm
    }

    /// Sequencer clock rate in steps per second.
    pub fn step_rate(&self) -> f32 {
        self.step_rate
    }

    /// Loop length in steps: the largest `step + len` over inserted notes.
    pub fn beat_length(&self) -> u32 {
        self.beat_length
    }

    pub fn beat_name(&self) -> Option<&str> {
        self.beat_name.as_deref()
    }

    /// File-format version of the last loaded beat.
    pub fn version(&self) -> i32 {
        self.version
    }

    // --- Global configuration ---

    /// Set the tempo. Non-positive BPM values are ignored, leaving the
    /// previous tempo in effect.
    pub fn set_tempo(&mut self, bpm: i32) {
        if bpm <= 0 {
            return;
        }
        self.bpm = bpm;
        self.step_rate = bpm as f32 / 60.0 * STEPS_PER_BEAT;
        self.engine.set_tempo(self.step_rate);
    }

    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    /// Rebuild the pitch mapping for a new (scale, root) pair.
    pub fn set_scale(&mut self, scale: Scale, root: PitchClass) {
        self.scale.rebuild(scale, root);
    }

    /// Resolve scale and base-note names and rebuild; unknown names leave
    /// the active mapping untouched.
    pub fn set_scale_by_name(&mut self, scale_name: &str, base_name: &str) {
        self.scale.rebuild_by_name(scale_name, base_name);
    }

    /// Replace the session's beat name. The load pipeline calls this once
    /// per load, before streaming.
    pub fn begin_load(&mut self, name: &str) {
        self.beat_name = Some(name.to_string());
    }

    // --- Voice creation ---

    /// Create a synth voice chain on a track and assign its waveform.
    ///
    /// The chain (channel, instrument, synth, sequencer track) is
    /// allocated at most once per slot; repeat calls only reassign the
    /// waveform. Either way the default ADSR is (re)applied.
    pub fn create_synth(&mut self, track: usize, kind: InstrumentKind) {
        if self.tracks.get(track).is_none() {
            return;
        }
        self.ensure_voice_chain(track);
        self.engine.set_waveform(track, kind);

        let [a, d, s, r] = DEFAULT_ADSR;
        self.engine.set_adsr(track, a, d, s, r);

        if let Some(config) = self.tracks.get_mut(track) {
            config.instrument = Some(kind);
            config.adsr = DEFAULT_ADSR;
        }
    }

    /// Create a sampler voice chain on a track.
    pub fn create_sampler(&mut self, track: usize) {
        if self.tracks.get(track).is_none() {
            return;
        }
        self.ensure_voice_chain(track);
        if let Some(config) = self.tracks.get_mut(track) {
            config.instrument = Some(InstrumentKind::Sampler);
        }
    }

    /// Resolve an instrument-kind name and create the matching voice.
    /// Unrecognized names are silently ignored.
    pub fn create_voice_by_name(&mut self, track: usize, name: &str) {
        match InstrumentKind::from_name(name) {
            Some(InstrumentKind::Sampler) => self.create_sampler(track),
            Some(kind) => self.create_synth(track, kind),
            None => {}
        }
    }

    fn ensure_voice_chain(&mut self, track: usize) {
        let Some(config) = self.tracks.get_mut(track) else {
            return;
        };
        if !config.voice_allocated {
            self.engine.create_voice_chain(track);
            config.voice_allocated = true;
        }
    }

    // --- Per-track configuration ---

    /// Copy a name into the track's fixed buffer, truncating on overflow.
    pub fn set_track_name(&mut self, track: usize, name: &str) {
        if let Some(config) = self.tracks.get_mut(track) {
            config.set_name(name);
        }
    }

    pub fn set_envelope(&mut self, track: usize, attack: f32, decay: f32, sustain: f32, release: f32) {
        let Some(config) = self.tracks.get_mut(track) else {
            return;
        };
        self.engine.set_adsr(track, attack, decay, sustain, release);
        config.adsr = [attack, decay, sustain, release];
    }

    /// Load the named sample from the fixed `samples/` prefix and bind it
    /// to the track's voice. A missing resource is logged and tolerated;
    /// the sample name still replaces the previous one.
    pub fn bind_sample(&mut self, track: usize, name: &str) {
        let Some(config) = self.tracks.get_mut(track) else {
            return;
        };
        let path = format!("samples/{name}");
        if !self.engine.load_sample(track, &path) {
            log::warn!("could not open sample resource {path}");
        }
        config.sample_name = Some(name.to_string());
    }

    pub fn set_volume(&mut self, track: usize, volume: f32) {
        let Some(config) = self.tracks.get_mut(track) else {
            return;
        };
        self.engine.set_volume(track, volume);
        config.volume = volume;
    }

    pub fn set_pan(&mut self, track: usize, pan: f32) {
        let Some(config) = self.tracks.get_mut(track) else {
            return;
        };
        self.engine.set_pan(track, pan);
        config.pan = pan;
    }

    pub fn set_muted(&mut self, track: usize, muted: bool) {
        let Some(config) = self.tracks.get_mut(track) else {
            return;
        };
        self.engine.set_muted(track, muted);
        config.muted = muted;
    }

    /// Mark a track as a chord track and widen its voice to 3-note
    /// polyphony. A false flag is a no-op: chord tracks are not un-marked
    /// mid-session.
    pub fn set_chord_track(&mut self, track: usize, flag: bool) {
        if !flag {
            return;
        }
        let Some(config) = self.tracks.get_mut(track) else {
            return;
        };
        self.engine.add_voice_copies(track, 2);
        config.chord = true;
    }

    // --- Effects ---

    /// Enable the track's filter, creating the engine resource on first
    /// use; later calls only update parameters.
    pub fn enable_filter(&mut self, track: usize, kind: i32, frequency: i32, resonance: f32, mix: f32) {
        let Some(config) = self.tracks.get_mut(track) else {
            return;
        };
        if config.filter.is_none() {
            self.engine.create_filter(track);
        }
        self.engine.set_filter_params(track, kind, frequency, resonance, mix);
        config.filter = Some(bb_ir::FilterConfig { kind, frequency, resonance, mix });
    }

    /// Enable the track's delay line; resource created on first use.
    pub fn enable_delay(&mut self, track: usize, feedback: f32, mix: f32) {
        let Some(config) = self.tracks.get_mut(track) else {
            return;
        };
        if config.delay.is_none() {
            self.engine.create_delay(track);
        }
        self.engine.set_delay_params(track, feedback, mix);
        config.delay = Some(bb_ir::DelayConfig { feedback, mix });
    }

    /// Enable the track's bit crusher; resource created on first use.
    pub fn enable_bit_crusher(&mut self, track: usize, amount: f32, mix: f32) {
        let Some(config) = self.tracks.get_mut(track) else {
            return;
        };
        if config.crusher.is_none() {
            self.engine.create_bit_crusher(track);
        }
        self.engine.set_bit_crusher_params(track, amount, mix);
        config.crusher = Some(bb_ir::CrusherConfig { amount, mix });
    }

    // --- Notes ---

    /// Insert a note event on a track and grow the beat length to cover
    /// it. Chord tracks also receive the 3rd and 5th scale-degree
    /// companions at the same step, length, and velocity (unless the
    /// chromatic scale is active). No-op without an allocated voice chain.
    pub fn insert_note(&mut self, track: usize, step: u32, note: Note) {
        let Some(config) = self.tracks.get(track) else {
            return;
        };
        if !config.voice_allocated {
            return;
        }
        let chord = config.chord;

        self.engine.add_note(track, step, note.len, note.pitch, note.velocity);

        let end = step.saturating_add(note.len);
        if end > self.beat_length {
            self.beat_length = end;
        }

        if chord {
            if let Some((third, fifth)) = self.scale.chord_companions(note.pitch) {
                self.engine.add_note(track, step, note.len, third, note.velocity);
                self.engine.add_note(track, step, note.len, fifth, note.velocity);
            }
        }
    }

    // --- Transport ---

    /// Loop the beat `loops` times (0 = forever) from step zero.
    pub fn play(&mut self, loops: u32) {
        self.engine.set_loop(0, self.beat_length, loops);
        self.engine.set_current_step(0);
        self.engine.play();
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    /// The step the external clock is currently on.
    pub fn current_step(&self) -> u32 {
        self.engine.current_step()
    }
}

impl<E: AudioEngine> Drop for BeatSession<E> {
    fn drop(&mut self) {
        if self.engine.is_playing() {
            self.engine.stop();
        }

        for track in 0..bb_ir::MAX_TRACKS {
            let Some(config) = self.tracks.get(track) else {
                continue;
            };
            let (has_filter, has_delay, has_crusher, has_voice) = (
                config.filter.is_some(),
                config.delay.is_some(),
                config.crusher.is_some(),
                config.voice_allocated,
            );

            if has_filter {
                self.engine.free(track, EngineResource::Filter);
            }
            if has_delay {
                self.engine.free(track, EngineResource::Delay);
            }
            if has_crusher {
                self.engine.free(track, EngineResource::BitCrusher);
            }
            if has_voice {
                self.engine.free(track, EngineResource::Synth);
                self.engine.free(track, EngineResource::Instrument);
                self.engine.free(track, EngineResource::Channel);
                self.engine.free(track, EngineResource::SequencerTrack);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_engine::{CommandLog, EngineCommand};

    #[test]
    fn new_session_pushes_default_tempo() {
        let mut log = CommandLog::new();
        let session = BeatSession::new(&mut log);
        assert_eq!(session.bpm(), 120);
        assert_eq!(session.step_rate(), 8.0);
        drop(session);
        assert_eq!(log.commands()[0], EngineCommand::SetTempo { steps_per_second: 8.0 });
    }

    #[test]
    fn non_positive_bpm_keeps_previous_tempo() {
        let mut log = CommandLog::new();
        let mut session = BeatSession::new(&mut log);
        session.set_tempo(90);
        session.set_tempo(0);
        session.set_tempo(-30);
        assert_eq!(session.bpm(), 90);
        assert_eq!(session.step_rate(), 6.0);
    }

    #[test]
    fn voice_chain_created_once() {
        let mut log = CommandLog::new();
        {
            let mut session = BeatSession::new(&mut log);
            session.create_synth(2, bb_ir::InstrumentKind::Square);
            session.create_synth(2, bb_ir::InstrumentKind::Sawtooth);
        }
        assert_eq!(
            log.count_where(|c| matches!(c, EngineCommand::CreateVoiceChain { track: 2 })),
            1
        );
        assert_eq!(
            log.count_where(|c| matches!(c, EngineCommand::SetWaveform { .. })),
            2
        );
    }

    #[test]
    fn create_synth_applies_default_adsr() {
        let mut log = CommandLog::new();
        let mut session = BeatSession::new(&mut log);
        session.create_synth(0, bb_ir::InstrumentKind::Sine);
        let track = session.tracks().get(0).unwrap();
        assert_eq!(track.adsr, DEFAULT_ADSR);
        assert_eq!(track.instrument, Some(bb_ir::InstrumentKind::Sine));
        assert!(track.voice_allocated);
    }

    #[test]
    fn create_voice_by_name_routes_sampler_and_synths() {
        let mut log = CommandLog::new();
        let mut session = BeatSession::new(&mut log);
        session.create_voice_by_name(0, "sampler");
        session.create_voice_by_name(1, "triangle");
        session.create_voice_by_name(2, "theremin");

        assert_eq!(
            session.tracks().get(0).unwrap().instrument,
            Some(bb_ir::InstrumentKind::Sampler)
        );
        assert_eq!(
            session.tracks().get(1).unwrap().instrument,
            Some(bb_ir::InstrumentKind::Triangle)
        );
        assert_eq!(session.tracks().get(2).unwrap().instrument, None);
    }

    #[test]
    fn out_of_range_track_ids_are_no_ops() {
        let mut log = CommandLog::new();
        {
            let mut session = BeatSession::new(&mut log);
            session.create_synth(99, bb_ir::InstrumentKind::Sine);
            session.set_volume(16, 0.5);
            session.set_envelope(100, 0.1, 0.2, 0.3, 0.4);
            session.enable_delay(42, 0.5, 0.5);
            session.insert_note(17, 0, Note { pitch: 60, len: 1, velocity: 1.0 });
        }
        // Only the constructor's tempo push reaches the engine.
        assert_eq!(log.commands().len(), 1);
    }

    #[test]
    fn insert_note_requires_voice_chain() {
        let mut log = CommandLog::new();
        let mut session = BeatSession::new(&mut log);
        session.insert_note(0, 4, Note { pitch: 60, len: 2, velocity: 0.8 });
        assert_eq!(session.beat_length(), 0);
    }

    #[test]
    fn beat_length_is_monotone_max_of_note_ends() {
        let mut log = CommandLog::new();
        let mut session = BeatSession::new(&mut log);
        session.create_synth(0, bb_ir::InstrumentKind::Sine);

        session.insert_note(0, 4, Note { pitch: 60, len: 4, velocity: 1.0 });
        assert_eq!(session.beat_length(), 8);
        session.insert_note(0, 10, Note { pitch: 62, len: 3, velocity: 1.0 });
        assert_eq!(session.beat_length(), 13);
        session.insert_note(0, 1, Note { pitch: 64, len: 1, velocity: 1.0 });
        assert_eq!(session.beat_length(), 13);
    }

    #[test]
    fn beat_length_saturates_at_the_top_of_the_step_range() {
        let mut log = CommandLog::new();
        let mut session = BeatSession::new(&mut log);
        session.create_synth(0, bb_ir::InstrumentKind::Sine);

        session.insert_note(0, u32::MAX, Note { pitch: 60, len: 4, velocity: 1.0 });
        assert_eq!(session.beat_length(), u32::MAX);
        session.insert_note(0, 0, Note { pitch: 62, len: 1, velocity: 1.0 });
        assert_eq!(session.beat_length(), u32::MAX);
    }

    #[test]
    fn chord_track_inserts_three_notes() {
        let mut log = CommandLog::new();
        {
            let mut session = BeatSession::new(&mut log);
            session.create_synth(3, bb_ir::InstrumentKind::Sine);
            session.set_chord_track(3, true);
            session.insert_note(3, 4, Note { pitch: 60, len: 2, velocity: 0.8 });
        }
        let notes = log.notes_for(3);
        assert_eq!(
            notes,
            vec![(4, 2, 60, 0.8), (4, 2, 64, 0.8), (4, 2, 67, 0.8)]
        );
    }

    #[test]
    fn chord_track_under_chromatic_scale_inserts_one_note() {
        let mut log = CommandLog::new();
        {
            let mut session = BeatSession::new(&mut log);
            session.create_synth(3, bb_ir::InstrumentKind::Sine);
            session.set_chord_track(3, true);
            session.set_scale(Scale::Chromatic, PitchClass::C);
            session.insert_note(3, 4, Note { pitch: 60, len: 2, velocity: 0.8 });
        }
        assert_eq!(log.notes_for(3).len(), 1);
    }

    #[test]
    fn chord_flag_false_is_a_no_op() {
        let mut log = CommandLog::new();
        {
            let mut session = BeatSession::new(&mut log);
            session.create_synth(0, bb_ir::InstrumentKind::Sine);
            session.set_chord_track(0, false);
        }
        assert_eq!(
            log.count_where(|c| matches!(c, EngineCommand::AddVoiceCopies { .. })),
            0
        );
    }

    #[test]
    fn effects_allocate_engine_resources_once() {
        let mut log = CommandLog::new();
        {
            let mut session = BeatSession::new(&mut log);
            session.create_synth(1, bb_ir::InstrumentKind::Noise);
            session.enable_filter(1, 0, 800, 0.3, 0.5);
            session.enable_filter(1, 1, 1200, 0.4, 0.6);
            session.enable_delay(1, 0.4, 0.3);
            session.enable_delay(1, 0.5, 0.2);
        }
        assert_eq!(log.count_where(|c| matches!(c, EngineCommand::CreateFilter { .. })), 1);
        assert_eq!(log.count_where(|c| matches!(c, EngineCommand::CreateDelay { .. })), 1);
        assert_eq!(
            log.count_where(|c| matches!(c, EngineCommand::SetFilterParams { .. })),
            2
        );
    }

    #[test]
    fn enable_filter_updates_config() {
        let mut log = CommandLog::new();
        let mut session = BeatSession::new(&mut log);
        session.enable_filter(0, 1, 900, 0.25, 0.75);
        assert_eq!(
            session.tracks().get(0).unwrap().filter,
            Some(bb_ir::FilterConfig { kind: 1, frequency: 900, resonance: 0.25, mix: 0.75 })
        );
    }

    #[test]
    fn bind_sample_logs_missing_resource_but_keeps_name() {
        let mut log = CommandLog::new();
        log.fail_sample("samples/ghost.wav");
        let mut session = BeatSession::new(&mut log);
        session.create_sampler(0);
        session.bind_sample(0, "ghost.wav");
        assert_eq!(
            session.tracks().get(0).unwrap().sample_name.as_deref(),
            Some("ghost.wav")
        );
    }

    #[test]
    fn bind_sample_replaces_previous_name() {
        let mut log = CommandLog::new();
        let mut session = BeatSession::new(&mut log);
        session.create_sampler(0);
        session.bind_sample(0, "kick.wav");
        session.bind_sample(0, "snare.wav");
        assert_eq!(
            session.tracks().get(0).unwrap().sample_name.as_deref(),
            Some("snare.wav")
        );
    }

    #[test]
    fn play_sets_loop_region_and_rewinds() {
        let mut log = CommandLog::new();
        {
            let mut session = BeatSession::new(&mut log);
            session.create_synth(0, bb_ir::InstrumentKind::Sine);
            session.insert_note(0, 0, Note { pitch: 60, len: 16, velocity: 1.0 });
            session.play(2);
        }
        let cmds = log.commands();
        let pos = cmds
            .iter()
            .position(|c| matches!(c, EngineCommand::SetLoop { start: 0, end: 16, loops: 2 }))
            .expect("loop region set");
        assert_eq!(cmds[pos + 1], EngineCommand::SetCurrentStep { step: 0 });
        assert_eq!(cmds[pos + 2], EngineCommand::Play);
    }

    #[test]
    fn drop_frees_resources_in_fixed_order_exactly_once() {
        let mut log = CommandLog::new();
        {
            let mut session = BeatSession::new(&mut log);
            session.create_synth(5, bb_ir::InstrumentKind::Sine);
            session.enable_filter(5, 0, 500, 0.1, 0.5);
            session.enable_bit_crusher(5, 0.3, 0.4);
        }
        assert_eq!(
            log.frees_for(5),
            vec![
                EngineResource::Filter,
                EngineResource::BitCrusher,
                EngineResource::Synth,
                EngineResource::Instrument,
                EngineResource::Channel,
                EngineResource::SequencerTrack,
            ]
        );
        // Untouched tracks free nothing.
        assert!(log.frees_for(4).is_empty());
    }

    #[test]
    fn drop_stops_a_running_transport_first() {
        let mut log = CommandLog::new();
        {
            let mut session = BeatSession::new(&mut log);
            session.play(0);
        }
        assert!(!log.is_playing());
        assert_eq!(log.count_where(|c| matches!(c, EngineCommand::Stop)), 1);
    }
}

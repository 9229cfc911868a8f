//! The beat document reader: a [`DecodeSink`] over a [`BeatSession`].

use bb_engine::AudioEngine;
use bb_ir::Note;
use bb_session::BeatSession;

use crate::event::{DecodeSink, EventSource, Value};
use crate::section::{SectionFrame, SectionKind, MAX_SECTION_DEPTH};

/// Load the named beat into a session.
///
/// Resolves the document under the fixed `beats/` prefix, replaces the
/// session's beat name, and streams the source through a fresh
/// [`BeatReader`]. A source failure is logged and leaves the session with
/// whatever had been applied up to that point; loading is cumulative and
/// never rolls back.
pub fn load_beat<E: AudioEngine>(
    session: &mut BeatSession<E>,
    name: &str,
    source: &mut dyn EventSource,
) {
    session.begin_load(name);
    let path = format!("beats/{name}");
    let mut reader = BeatReader::new(session);
    if let Err(err) = source.stream(&path, &mut reader) {
        log::warn!("could not stream beat resource {path}: {err}");
    }
}

/// Applies decoder events to a session.
///
/// Tracks the open sections on a fixed-depth stack. Keyed values dispatch
/// against the innermost open section; builder-backed sections (envelope,
/// effects, scale) accumulate in their stack frame and commit on exit.
/// Track-targeted sections all share one current-track cursor, set by the
/// `id` key of a `tracks` entry.
pub struct BeatReader<'a, E: AudioEngine> {
    session: &'a mut BeatSession<E>,
    stack: heapless::Vec<SectionFrame, MAX_SECTION_DEPTH>,
    track: usize,
    step: u32,
    note: Note,
    element: Option<usize>,
}

impl<'a, E: AudioEngine> BeatReader<'a, E> {
    pub fn new(session: &'a mut BeatSession<E>) -> Self {
        Self {
            session,
            stack: heapless::Vec::new(),
            track: 0,
            step: 0,
            note: Note::default(),
            element: None,
        }
    }

    /// Nesting depth of currently open recognized sections.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<E: AudioEngine> DecodeSink for BeatReader<'_, E> {
    fn enter_section(&mut self, name: &str) {
        let Some(kind) = SectionKind::for_name(name) else {
            return;
        };
        if self.stack.push(SectionFrame::open(kind)).is_err() {
            log::warn!("section stack full, ignoring nested section {name}");
        }
    }

    fn value(&mut self, key: &str, value: &Value) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        match frame {
            SectionFrame::Header => match key {
                "ver" => self.session.set_version(value.as_int() as i32),
                "BPM" => self.session.set_tempo(value.as_int() as i32),
                _ => {}
            },
            SectionFrame::TrackInfo => match key {
                // Negative ids map past the end of the store so every
                // per-track call on them stays a no-op.
                "id" => self.track = usize::try_from(value.as_int()).unwrap_or(usize::MAX),
                "name" => self.session.set_track_name(self.track, value.as_str()),
                "type" => self.session.create_voice_by_name(self.track, value.as_str()),
                "sample" => self.session.bind_sample(self.track, value.as_str()),
                "vol" => self.session.set_volume(self.track, value.as_float()),
                "pan" => self.session.set_pan(self.track, value.as_float()),
                "mute" => self.session.set_muted(self.track, value.truthy()),
                "chord" => self.session.set_chord_track(self.track, value.truthy()),
                // Display color, meaningless to playback.
                "color" => {}
                _ => {}
            },
            SectionFrame::Notes => match key {
                "step" => self.step = value.as_int().clamp(0, u32::MAX as i64) as u32,
                "pitch" => self.note.pitch = value.as_int().clamp(0, 127) as u8,
                "len" => self.note.len = value.as_int().clamp(0, u32::MAX as i64) as u32,
                "vel" => self.note.velocity = value.as_float(),
                _ => {}
            },
            SectionFrame::Envelope(env) => match key {
                "a" => env.attack = value.as_float(),
                "d" => env.decay = value.as_float(),
                "s" => env.sustain = value.as_float(),
                "r" => env.release = value.as_float(),
                _ => {}
            },
            SectionFrame::Filter(filter) => match key {
                "type" => filter.kind = value.as_int() as i32,
                "freq" => filter.frequency = value.as_int() as i32,
                "resn" => filter.resonance = value.as_float(),
                "mix" => filter.mix = value.as_float(),
                _ => {}
            },
            SectionFrame::Delay(delay) => match key {
                "feedback" => delay.feedback = value.as_float(),
                "mix" => delay.mix = value.as_float(),
                _ => {}
            },
            SectionFrame::BitCrusher(crusher) => match key {
                "amount" => crusher.amount = value.as_float(),
                "mix" => crusher.mix = value.as_float(),
                _ => {}
            },
            SectionFrame::Scale(scale) => match key {
                "type" => scale.set_name(value.as_str()),
                "base" => scale.set_base(value.as_str()),
                _ => {}
            },
            SectionFrame::Loop | SectionFrame::Options | SectionFrame::Labels => {}
        }
    }

    fn should_decode_element(&mut self, index: usize) -> bool {
        match self.stack.last() {
            Some(SectionFrame::Notes) => {
                self.note.clear();
                self.step = 0;
                self.element = Some(index);
                true
            }
            Some(SectionFrame::Labels) => {
                self.element = Some(index);
                true
            }
            _ => true,
        }
    }

    fn element_done(&mut self, index: usize) {
        if matches!(self.stack.last(), Some(SectionFrame::Notes)) && self.element == Some(index) {
            self.session.insert_note(self.track, self.step, self.note);
            self.element = None;
        }
    }

    fn exit_section(&mut self, name: &str) {
        let Some(kind) = SectionKind::for_name(name) else {
            return;
        };
        if self.stack.last().map(SectionFrame::kind) != Some(kind) {
            // Mismatched close, most likely inside an unrecognized
            // section that was never pushed. Leave the stack alone.
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            SectionFrame::Envelope(env) => {
                self.session
                    .set_envelope(self.track, env.attack, env.decay, env.sustain, env.release);
            }
            SectionFrame::Filter(filter) => {
                self.session.enable_filter(
                    self.track,
                    filter.kind,
                    filter.frequency,
                    filter.resonance,
                    filter.mix,
                );
            }
            SectionFrame::Delay(delay) => {
                self.session.enable_delay(self.track, delay.feedback, delay.mix);
            }
            SectionFrame::BitCrusher(crusher) => {
                self.session
                    .enable_bit_crusher(self.track, crusher.amount, crusher.mix);
            }
            SectionFrame::Scale(scale) => {
                self.session.set_scale_by_name(&scale.name, &scale.base);
            }
            SectionFrame::Header
            | SectionFrame::TrackInfo
            | SectionFrame::Loop
            | SectionFrame::Options
            | SectionFrame::Notes
            | SectionFrame::Labels => {}
        }
    }
}

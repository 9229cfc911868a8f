//! Section kinds and per-section builder frames.
//!
//! Each recognized sub-document of a beat file maps to a [`SectionKind`];
//! sections that accumulate fields before committing carry a builder in
//! their [`SectionFrame`]. Everything commits at section exit, so a
//! truncated document never half-applies an effect or scale change.

use arrayvec::ArrayString;

/// Maximum nesting depth the reader tracks. Pushes past this are dropped;
/// real beat files nest three levels deep at most.
pub const MAX_SECTION_DEPTH: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    TrackInfo,
    Envelope,
    Filter,
    Delay,
    BitCrusher,
    Notes,
    Labels,
    Scale,
    Loop,
    Options,
}

impl SectionKind {
    /// Map a document section name to its kind. Both `"filter"` and
    /// `"lpf"` name the filter section; files in the wild carry either.
    /// Unknown names get `None` and are skipped by the reader.
    pub fn for_name(name: &str) -> Option<SectionKind> {
        match name {
            "beat" => Some(SectionKind::Header),
            "tracks" => Some(SectionKind::TrackInfo),
            "env" => Some(SectionKind::Envelope),
            "filter" | "lpf" => Some(SectionKind::Filter),
            "delay" => Some(SectionKind::Delay),
            "bitcrush" => Some(SectionKind::BitCrusher),
            "notes" => Some(SectionKind::Notes),
            "labels" => Some(SectionKind::Labels),
            "scale" => Some(SectionKind::Scale),
            "loop" => Some(SectionKind::Loop),
            "options" => Some(SectionKind::Options),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EnvelopeBuilder {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FilterBuilder {
    pub kind: i32,
    pub frequency: i32,
    pub resonance: f32,
    pub mix: f32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DelayBuilder {
    pub feedback: f32,
    pub mix: f32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CrusherBuilder {
    pub amount: f32,
    pub mix: f32,
}

/// Pending scale change; committed at section exit so that `type` and
/// `base` may arrive in either order.
#[derive(Clone, Debug, Default)]
pub struct ScaleBuilder {
    pub name: ArrayString<128>,
    pub base: ArrayString<32>,
}

impl ScaleBuilder {
    pub fn set_name(&mut self, name: &str) {
        copy_truncated(&mut self.name, name);
    }

    pub fn set_base(&mut self, base: &str) {
        copy_truncated(&mut self.base, base);
    }
}

fn copy_truncated<const N: usize>(dst: &mut ArrayString<N>, src: &str) {
    dst.clear();
    for ch in src.chars() {
        if dst.try_push(ch).is_err() {
            break;
        }
    }
}

/// One entry of the reader's section stack.
#[derive(Clone, Debug)]
pub enum SectionFrame {
    Header,
    TrackInfo,
    Loop,
    Options,
    Notes,
    Labels,
    Envelope(EnvelopeBuilder),
    Filter(FilterBuilder),
    Delay(DelayBuilder),
    BitCrusher(CrusherBuilder),
    Scale(ScaleBuilder),
}

impl SectionFrame {
    pub fn open(kind: SectionKind) -> SectionFrame {
        match kind {
            SectionKind::Header => SectionFrame::Header,
            SectionKind::TrackInfo => SectionFrame::TrackInfo,
            SectionKind::Loop => SectionFrame::Loop,
            SectionKind::Options => SectionFrame::Options,
            SectionKind::Notes => SectionFrame::Notes,
            SectionKind::Labels => SectionFrame::Labels,
            SectionKind::Envelope => SectionFrame::Envelope(EnvelopeBuilder::default()),
            SectionKind::Filter => SectionFrame::Filter(FilterBuilder::default()),
            SectionKind::Delay => SectionFrame::Delay(DelayBuilder::default()),
            SectionKind::BitCrusher => SectionFrame::BitCrusher(CrusherBuilder::default()),
            SectionKind::Scale => SectionFrame::Scale(ScaleBuilder::default()),
        }
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            SectionFrame::Header => SectionKind::Header,
            SectionFrame::TrackInfo => SectionKind::TrackInfo,
            SectionFrame::Loop => SectionKind::Loop,
            SectionFrame::Options => SectionKind::Options,
            SectionFrame::Notes => SectionKind::Notes,
            SectionFrame::Labels => SectionKind::Labels,
            SectionFrame::Envelope(_) => SectionKind::Envelope,
            SectionFrame::Filter(_) => SectionKind::Filter,
            SectionFrame::Delay(_) => SectionKind::Delay,
            SectionFrame::BitCrusher(_) => SectionKind::BitCrusher,
            SectionFrame::Scale(_) => SectionKind::Scale,
        }
    }
}

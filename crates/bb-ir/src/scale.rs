//! Scale catalogue and pitch-mapping tables.
//!
//! A [`ScaleTable`] maps absolute note numbers to 1-based positions within
//! the active scale's repeating pattern across the whole supported note
//! range, and back. Chord tracks use it to derive harmonized companion
//! pitches at note-insertion time.

/// Semitones per octave.
pub const SEMITONES_PER_OCTAVE: u8 = 12;

/// Lowest note covered by the mapping tables (C1).
pub const NOTE_MIN: u8 = 24;

/// Highest note covered by the mapping tables.
pub const NOTE_MAX: u8 = 119;

const TABLE_SIZE: usize = 128;

/// A pitch class, 0 = C through 11 = B.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

/// All pitch classes in semitone order.
pub const PITCH_CLASSES: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::Cs,
    PitchClass::D,
    PitchClass::Ds,
    PitchClass::E,
    PitchClass::F,
    PitchClass::Fs,
    PitchClass::G,
    PitchClass::Gs,
    PitchClass::A,
    PitchClass::As,
    PitchClass::B,
];

impl PitchClass {
    /// Display name, as used by the beat file's `scale.base` key.
    pub fn name(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Semitone offset from C (0-11).
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Case-sensitive exact lookup.
    pub fn from_name(name: &str) -> Option<PitchClass> {
        PITCH_CLASSES.iter().find(|p| p.name() == name).copied()
    }
}

/// A named scale or mode from the fixed catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    Chromatic,
    Major,
    NaturalMinor,
    MelodicMinor,
    HarmonicMinor,
    Dorian,
    Mixolydian,
    Lydian,
    LydianDominant,
    LydianAugmented,
    LydianDiminished,
    Phrygian,
    Locrian,
    SuperLocrian,
    Persian,
    MajorPentatonic,
    MinorPentatonic,
    Iwato,
}

/// All catalogued scales, in catalogue order.
pub const SCALES: [Scale; 18] = [
    Scale::Chromatic,
    Scale::Major,
    Scale::NaturalMinor,
    Scale::MelodicMinor,
    Scale::HarmonicMinor,
    Scale::Dorian,
    Scale::Mixolydian,
    Scale::Lydian,
    Scale::LydianDominant,
    Scale::LydianAugmented,
    Scale::LydianDiminished,
    Scale::Phrygian,
    Scale::Locrian,
    Scale::SuperLocrian,
    Scale::Persian,
    Scale::MajorPentatonic,
    Scale::MinorPentatonic,
    Scale::Iwato,
];

impl Scale {
    /// Ascending semitone offsets from the root, one per scale degree.
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            Scale::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            Scale::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            Scale::LydianDominant => &[0, 2, 4, 6, 7, 9, 10],
            Scale::LydianAugmented => &[0, 2, 4, 6, 8, 9, 11],
            Scale::LydianDiminished => &[0, 2, 3, 6, 7, 9, 11],
            Scale::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Scale::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            Scale::SuperLocrian => &[0, 1, 3, 4, 6, 8, 10],
            Scale::Persian => &[0, 1, 4, 5, 6, 8, 11],
            Scale::MajorPentatonic => &[0, 2, 4, 7, 9],
            Scale::MinorPentatonic => &[0, 3, 5, 7, 10],
            Scale::Iwato => &[0, 1, 5, 6, 10],
        }
    }

    /// Full display name, as used by the beat file's `scale.type` key.
    pub fn name(&self) -> &'static str {
        match self {
            Scale::Chromatic => "Chromatic",
            Scale::Major => "Major",
            Scale::NaturalMinor => "Natural Minor",
            Scale::MelodicMinor => "Melodic Minor",
            Scale::HarmonicMinor => "Harmonic Minor",
            Scale::Dorian => "Dorian",
            Scale::Mixolydian => "Mixolydian",
            Scale::Lydian => "Lydian",
            Scale::LydianDominant => "Lydian Dominant",
            Scale::LydianAugmented => "Lydian Augmented",
            Scale::LydianDiminished => "Lydian Diminished",
            Scale::Phrygian => "Phrygian",
            Scale::Locrian => "Locrian",
            Scale::SuperLocrian => "Super Locrian",
            Scale::Persian => "Persian",
            Scale::MajorPentatonic => "Major Pentatonic",
            Scale::MinorPentatonic => "Minor Pentatonic",
            Scale::Iwato => "Iwato",
        }
    }

    /// Abbreviated name for narrow displays.
    pub fn short_name(&self) -> &'static str {
        match self {
            Scale::Chromatic => "Chromatic",
            Scale::Major => "Maj",
            Scale::NaturalMinor => "Natu Min",
            Scale::MelodicMinor => "Melo Min",
            Scale::HarmonicMinor => "Harm Min",
            Scale::Dorian => "Dorian",
            Scale::Mixolydian => "Mixolydian",
            Scale::Lydian => "Lydian",
            Scale::LydianDominant => "Lydin Dom",
            Scale::LydianAugmented => "Lydin Aug",
            Scale::LydianDiminished => "Lydin Dim",
            Scale::Phrygian => "Phrygian",
            Scale::Locrian => "Locrian",
            Scale::SuperLocrian => "S Locrian",
            Scale::Persian => "Persian",
            Scale::MajorPentatonic => "Maj Penta",
            Scale::MinorPentatonic => "Min Penta",
            Scale::Iwato => "Iwato",
        }
    }

    /// Number of pitch classes in one octave of this scale.
    pub fn pitch_count(&self) -> u8 {
        self.intervals().len() as u8
    }

    /// Case-sensitive exact lookup against the full names.
    pub fn from_name(name: &str) -> Option<Scale> {
        SCALES.iter().find(|s| s.name() == name).copied()
    }
}

/// Bidirectional pitch <-> scale-index mapping for one (scale, root) pair.
///
/// Relative indices are 1-based; 0 means "no mapping" (a pitch outside the
/// covered range or not part of the scale).
#[derive(Clone, Debug)]
pub struct ScaleTable {
    pitch_to_index: [u8; TABLE_SIZE],
    index_to_pitch: [u8; TABLE_SIZE],
    scale: Scale,
    root: PitchClass,
    pitch_count: u8,
    max_index: u8,
}

impl ScaleTable {
    /// Create a table with the default mapping (Major rooted at C).
    pub fn new() -> Self {
        let mut table = Self {
            pitch_to_index: [0; TABLE_SIZE],
            index_to_pitch: [0; TABLE_SIZE],
            scale: Scale::Major,
            root: PitchClass::C,
            pitch_count: 0,
            max_index: 0,
        };
        table.rebuild(Scale::Major, PitchClass::C);
        table
    }

    /// Rebuild both lookup tables for a new (scale, root) pair.
    ///
    /// Walks the whole note range low-to-high, octave by octave, degree by
    /// degree, handing out consecutive 1-based indices. A degree whose
    /// absolute note lands above [`NOTE_MAX`] is skipped, but the octave
    /// walk continues, so the index sequence never has gaps even when some
    /// boundary notes stay unmapped.
    pub fn rebuild(&mut self, scale: Scale, root: PitchClass) {
        self.pitch_to_index = [0; TABLE_SIZE];
        self.index_to_pitch = [0; TABLE_SIZE];

        let intervals = scale.intervals();

        let mut octave_base = (NOTE_MIN + root.index()) as usize;
        let mut next_index = 1usize;
        while octave_base <= NOTE_MAX as usize {
            for &interval in intervals {
                let note = octave_base + interval as usize;
                if note <= NOTE_MAX as usize {
                    self.pitch_to_index[note] = next_index as u8;
                    self.index_to_pitch[next_index] = note as u8;
                    next_index += 1;
                }
            }
            octave_base += SEMITONES_PER_OCTAVE as usize;
        }

        self.scale = scale;
        self.root = root;
        self.pitch_count = scale.pitch_count();
        self.max_index = (next_index - 1) as u8;
    }

    /// Resolve scale and base-note names, then rebuild.
    ///
    /// A tolerated no-op when either name is unknown: the previous mapping
    /// stays active and no diagnostic is raised.
    pub fn rebuild_by_name(&mut self, scale_name: &str, base_name: &str) {
        if let (Some(scale), Some(root)) =
            (Scale::from_name(scale_name), PitchClass::from_name(base_name))
        {
            self.rebuild(scale, root);
        }
    }

    /// The active scale.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// The active root pitch class.
    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// Pitch classes per octave in the active scale.
    pub fn pitch_count(&self) -> u8 {
        self.pitch_count
    }

    /// Highest valid relative index.
    pub fn max_index(&self) -> u8 {
        self.max_index
    }

    /// 1-based relative index for a pitch, or 0 when unmapped.
    pub fn index_of(&self, pitch: u8) -> u8 {
        self.pitch_to_index
            .get(pitch as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Absolute pitch for a 1-based relative index, or 0 when unmapped.
    pub fn pitch_at(&self, index: u8) -> u8 {
        self.index_to_pitch[index as usize]
    }

    /// Relative index a cursor starts at (three octaves above the bottom).
    pub fn default_index(&self) -> u8 {
        self.pitch_count * 3 + 1
    }

    /// Octave number for a pitch: 0 below [`NOTE_MIN`], then 1-based per
    /// twelve semitones.
    pub fn octave_of(&self, pitch: u8) -> u8 {
        if pitch < NOTE_MIN {
            0
        } else {
            (pitch - NOTE_MIN) / SEMITONES_PER_OCTAVE + 1
        }
    }

    /// Companion pitches for a chord track: the 3rd and 5th scale degree
    /// above `pitch`.
    ///
    /// A companion index past the top of the mapping wraps backward by the
    /// scale's pitch-class count. That is a degree wrap, not an octave
    /// wrap, so near the top of the range a companion can land *below* the
    /// base note; this mirrors the long-standing sequencer behavior and is
    /// kept as-is.
    ///
    /// Returns `None` for the chromatic scale (chromatic tracks never
    /// auto-harmonize) and for unmapped base pitches. The latter is a
    /// deliberate change: earlier sequencer builds harmonized an unmapped
    /// base from table slots 2 and 4 of the bottom octave, which was an
    /// artifact of the zero index, not a musical choice.
    pub fn chord_companions(&self, pitch: u8) -> Option<(u8, u8)> {
        if self.scale == Scale::Chromatic {
            return None;
        }

        let base_index = self.index_of(pitch);
        if base_index == 0 {
            return None;
        }

        let third = self.wrap_degree(base_index as i32 + 2);
        let fifth = self.wrap_degree(base_index as i32 + 4);
        Some((self.pitch_at(third), self.pitch_at(fifth)))
    }

    fn wrap_degree(&self, index: i32) -> u8 {
        let wrapped = if index > self.max_index as i32 {
            index - self.pitch_count as i32
        } else {
            index
        };
        wrapped.clamp(0, (TABLE_SIZE - 1) as i32) as u8
    }
}

impl Default for ScaleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_gap_free_and_bijective_for_all_scales() {
        let mut table = ScaleTable::new();
        for scale in SCALES {
            for root in PITCH_CLASSES {
                table.rebuild(scale, root);

                assert!(table.max_index() > 0, "{:?}/{:?}", scale, root);

                // Every index 1..=max maps to a pitch, and back.
                for index in 1..=table.max_index() {
                    let pitch = table.pitch_at(index);
                    assert_ne!(pitch, 0, "{:?}/{:?} index {}", scale, root, index);
                    assert_eq!(table.index_of(pitch), index);
                }

                // Mapped pitches ascend with their indices.
                let mut last_pitch = 0;
                for index in 1..=table.max_index() {
                    let pitch = table.pitch_at(index);
                    assert!(pitch > last_pitch);
                    last_pitch = pitch;
                }

                // Nothing mapped outside the covered range.
                for pitch in 0..NOTE_MIN {
                    assert_eq!(table.index_of(pitch), 0);
                }
                for pitch in (NOTE_MAX + 1)..=127 {
                    assert_eq!(table.index_of(pitch), 0);
                }
            }
        }
    }

    #[test]
    fn major_c_maps_eight_octaves() {
        let mut table = ScaleTable::new();
        table.rebuild(Scale::Major, PitchClass::C);
        assert_eq!(table.max_index(), 56); // 8 octaves x 7 degrees
        assert_eq!(table.index_of(24), 1);
        assert_eq!(table.index_of(26), 2);
        assert_eq!(table.index_of(25), 0); // C# is not in C major
        assert_eq!(table.pitch_at(56), 119);
    }

    #[test]
    fn boundary_degrees_are_skipped_without_index_gaps() {
        // B-rooted pentatonic: the last octave base is 119, so only its
        // root degree fits; the other four degrees are skipped.
        let mut table = ScaleTable::new();
        table.rebuild(Scale::MajorPentatonic, PitchClass::B);
        assert_eq!(table.max_index(), 36); // 7 full octaves x 5 + 1
        assert_eq!(table.pitch_at(36), 119);
        for index in 1..=36 {
            assert_ne!(table.pitch_at(index), 0);
        }
    }

    #[test]
    fn chord_companions_in_c_major() {
        let table = ScaleTable::new(); // Major / C
        // C-E-G triad from middle C.
        assert_eq!(table.chord_companions(60), Some((64, 67)));
    }

    #[test]
    fn chord_companions_degree_wrap_can_drop_below_base() {
        let table = ScaleTable::new(); // Major / C, max_index 56
        // A at index 55: 55+2 and 55+4 both exceed 56 and wrap back by 7.
        assert_eq!(table.index_of(117), 55);
        assert_eq!(table.chord_companions(117), Some((108, 112)));
    }

    #[test]
    fn chromatic_scale_never_harmonizes() {
        let mut table = ScaleTable::new();
        table.rebuild(Scale::Chromatic, PitchClass::C);
        assert_eq!(table.chord_companions(60), None);
    }

    #[test]
    fn unmapped_pitch_has_no_companions() {
        let table = ScaleTable::new(); // Major / C
        assert_eq!(table.chord_companions(25), None); // C#, not in scale
        assert_eq!(table.chord_companions(0), None); // below NOTE_MIN
        assert_eq!(table.chord_companions(127), None); // above NOTE_MAX
    }

    #[test]
    fn rebuild_overwrites_previous_mapping() {
        let mut table = ScaleTable::new();
        table.rebuild(Scale::Major, PitchClass::C);
        table.rebuild(Scale::MinorPentatonic, PitchClass::A);

        // 26 = D, in C major but not in A minor pentatonic.
        assert_eq!(table.index_of(26), 0);
        assert_eq!(table.scale(), Scale::MinorPentatonic);
        assert_eq!(table.root(), PitchClass::A);
        assert_eq!(table.pitch_count(), 5);
    }

    #[test]
    fn rebuild_by_name_resolves_known_names() {
        let mut table = ScaleTable::new();
        table.rebuild_by_name("Natural Minor", "D#");
        assert_eq!(table.scale(), Scale::NaturalMinor);
        assert_eq!(table.root(), PitchClass::Ds);
    }

    #[test]
    fn rebuild_by_name_ignores_unknown_names() {
        let mut table = ScaleTable::new();
        table.rebuild_by_name("Blues", "C");
        assert_eq!(table.scale(), Scale::Major);
        table.rebuild_by_name("Major", "H");
        assert_eq!(table.root(), PitchClass::C);
    }

    #[test]
    fn scale_names_round_trip() {
        for scale in SCALES {
            assert_eq!(Scale::from_name(scale.name()), Some(scale));
        }
        assert_eq!(Scale::from_name("major"), None); // case-sensitive
    }

    #[test]
    fn default_index_sits_three_octaves_up() {
        let table = ScaleTable::new();
        assert_eq!(table.default_index(), 22);
        assert_eq!(table.pitch_at(table.default_index()), 60);
    }

    #[test]
    fn octave_numbering() {
        let table = ScaleTable::new();
        assert_eq!(table.octave_of(0), 0);
        assert_eq!(table.octave_of(23), 0);
        assert_eq!(table.octave_of(24), 1);
        assert_eq!(table.octave_of(36), 2);
        assert_eq!(table.octave_of(119), 8);
    }
}

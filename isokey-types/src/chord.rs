//! Chord vocabulary: chord qualities, their interval sets and ranking weights.

use serde::{Deserialize, Serialize};

use crate::pitch::{Note, PitchClass};

/// Chord quality. Closed set; vocabularies are tables keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordType {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Power,
    Major6,
    Minor6,
    Dominant7,
    Major7,
    Minor7,
    Diminished7,
    HalfDiminished7,
    MinorMajor7,
    Augmented7,
    Dominant7Sus4,
    Add9,
    MinorAdd9,
    SixNine,
    Dominant9,
    Major9,
    Minor9,
    Dominant11,
    Minor11,
    Dominant13,
}

impl ChordType {
    pub const ALL: [ChordType; 26] = [
        ChordType::Major,
        ChordType::Minor,
        ChordType::Diminished,
        ChordType::Augmented,
        ChordType::Sus2,
        ChordType::Sus4,
        ChordType::Power,
        ChordType::Major6,
        ChordType::Minor6,
        ChordType::Dominant7,
        ChordType::Major7,
        ChordType::Minor7,
        ChordType::Diminished7,
        ChordType::HalfDiminished7,
        ChordType::MinorMajor7,
        ChordType::Augmented7,
        ChordType::Dominant7Sus4,
        ChordType::Add9,
        ChordType::MinorAdd9,
        ChordType::SixNine,
        ChordType::Dominant9,
        ChordType::Major9,
        ChordType::Minor9,
        ChordType::Dominant11,
        ChordType::Minor11,
        ChordType::Dominant13,
    ];

    /// Stable identifier used in config files and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            ChordType::Major => "major",
            ChordType::Minor => "minor",
            ChordType::Diminished => "dim",
            ChordType::Augmented => "aug",
            ChordType::Sus2 => "sus2",
            ChordType::Sus4 => "sus4",
            ChordType::Power => "power",
            ChordType::Major6 => "maj6",
            ChordType::Minor6 => "min6",
            ChordType::Dominant7 => "dom7",
            ChordType::Major7 => "maj7",
            ChordType::Minor7 => "min7",
            ChordType::Diminished7 => "dim7",
            ChordType::HalfDiminished7 => "halfdim7",
            ChordType::MinorMajor7 => "minmaj7",
            ChordType::Augmented7 => "aug7",
            ChordType::Dominant7Sus4 => "7sus4",
            ChordType::Add9 => "add9",
            ChordType::MinorAdd9 => "madd9",
            ChordType::SixNine => "6/9",
            ChordType::Dominant9 => "dom9",
            ChordType::Major9 => "maj9",
            ChordType::Minor9 => "min9",
            ChordType::Dominant11 => "dom11",
            ChordType::Minor11 => "min11",
            ChordType::Dominant13 => "dom13",
        }
    }

    pub fn from_key(key: &str) -> Option<ChordType> {
        ChordType::ALL.iter().copied().find(|t| t.key() == key)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChordType::Major => "Major",
            ChordType::Minor => "Minor",
            ChordType::Diminished => "Diminished",
            ChordType::Augmented => "Augmented",
            ChordType::Sus2 => "Suspended 2nd",
            ChordType::Sus4 => "Suspended 4th",
            ChordType::Power => "Power",
            ChordType::Major6 => "Major 6th",
            ChordType::Minor6 => "Minor 6th",
            ChordType::Dominant7 => "Dominant 7th",
            ChordType::Major7 => "Major 7th",
            ChordType::Minor7 => "Minor 7th",
            ChordType::Diminished7 => "Diminished 7th",
            ChordType::HalfDiminished7 => "Half-diminished 7th",
            ChordType::MinorMajor7 => "Minor-major 7th",
            ChordType::Augmented7 => "Augmented 7th",
            ChordType::Dominant7Sus4 => "Dominant 7th sus4",
            ChordType::Add9 => "Add 9",
            ChordType::MinorAdd9 => "Minor add 9",
            ChordType::SixNine => "Six-nine",
            ChordType::Dominant9 => "Dominant 9th",
            ChordType::Major9 => "Major 9th",
            ChordType::Minor9 => "Minor 9th",
            ChordType::Dominant11 => "Dominant 11th",
            ChordType::Minor11 => "Minor 11th",
            ChordType::Dominant13 => "Dominant 13th",
        }
    }

    /// Default semitone offsets from the root. Compound intervals (14, 16,
    /// 17, 21) mark ninths, tenths, elevenths and thirteenths.
    pub fn default_intervals(&self) -> &'static [u8] {
        match self {
            ChordType::Major => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Diminished => &[0, 3, 6],
            ChordType::Augmented => &[0, 4, 8],
            ChordType::Sus2 => &[0, 2, 7],
            ChordType::Sus4 => &[0, 5, 7],
            ChordType::Power => &[0, 7],
            ChordType::Major6 => &[0, 4, 7, 9],
            ChordType::Minor6 => &[0, 3, 7, 9],
            ChordType::Dominant7 => &[0, 4, 7, 10],
            ChordType::Major7 => &[0, 4, 7, 11],
            ChordType::Minor7 => &[0, 3, 7, 10],
            ChordType::Diminished7 => &[0, 3, 6, 9],
            ChordType::HalfDiminished7 => &[0, 3, 6, 10],
            ChordType::MinorMajor7 => &[0, 3, 7, 11],
            ChordType::Augmented7 => &[0, 4, 8, 10],
            ChordType::Dominant7Sus4 => &[0, 5, 7, 10],
            ChordType::Add9 => &[0, 4, 7, 14],
            ChordType::MinorAdd9 => &[0, 3, 7, 14],
            ChordType::SixNine => &[0, 4, 7, 9, 14],
            ChordType::Dominant9 => &[0, 4, 7, 10, 14],
            ChordType::Major9 => &[0, 4, 7, 11, 14],
            ChordType::Minor9 => &[0, 3, 7, 10, 14],
            ChordType::Dominant11 => &[0, 4, 7, 10, 14, 17],
            ChordType::Minor11 => &[0, 3, 7, 10, 14, 17],
            ChordType::Dominant13 => &[0, 4, 7, 10, 14, 21],
        }
    }

    /// Display suffix appended to the root name (`"m7"` in `Am7`).
    pub fn default_suffix(&self) -> &'static str {
        match self {
            ChordType::Major => "",
            ChordType::Minor => "m",
            ChordType::Diminished => "dim",
            ChordType::Augmented => "aug",
            ChordType::Sus2 => "sus2",
            ChordType::Sus4 => "sus4",
            ChordType::Power => "5",
            ChordType::Major6 => "6",
            ChordType::Minor6 => "m6",
            ChordType::Dominant7 => "7",
            ChordType::Major7 => "maj7",
            ChordType::Minor7 => "m7",
            ChordType::Diminished7 => "dim7",
            ChordType::HalfDiminished7 => "m7b5",
            ChordType::MinorMajor7 => "mMaj7",
            ChordType::Augmented7 => "aug7",
            ChordType::Dominant7Sus4 => "7sus4",
            ChordType::Add9 => "add9",
            ChordType::MinorAdd9 => "madd9",
            ChordType::SixNine => "6/9",
            ChordType::Dominant9 => "9",
            ChordType::Major9 => "maj9",
            ChordType::Minor9 => "m9",
            ChordType::Dominant11 => "11",
            ChordType::Minor11 => "m11",
            ChordType::Dominant13 => "13",
        }
    }

    /// Default ranking weight; higher wins when interpretations compete.
    pub fn default_commonness(&self) -> i32 {
        match self {
            ChordType::Major | ChordType::Minor => 10,
            ChordType::Dominant7 => 9,
            ChordType::Major7 | ChordType::Minor7 => 8,
            ChordType::Sus4 => 7,
            ChordType::Diminished
            | ChordType::Sus2
            | ChordType::Major6
            | ChordType::Diminished7
            | ChordType::HalfDiminished7
            | ChordType::Add9
            | ChordType::Dominant9 => 6,
            ChordType::Augmented
            | ChordType::Minor6
            | ChordType::Dominant7Sus4
            | ChordType::MinorAdd9
            | ChordType::Major9
            | ChordType::Minor9 => 5,
            ChordType::Power | ChordType::MinorMajor7 | ChordType::SixNine => 4,
            ChordType::Augmented7
            | ChordType::Dominant11
            | ChordType::Minor11
            | ChordType::Dominant13 => 3,
        }
    }

    /// Qualities whose root is ambiguous by symmetry or that get the smaller
    /// bass bonus.
    pub fn is_diminished_family(&self) -> bool {
        matches!(
            self,
            ChordType::Diminished | ChordType::Diminished7 | ChordType::HalfDiminished7
        )
    }
}

/// One vocabulary row: a quality with its intervals, suffix and weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordTypeSpec {
    pub chord_type: ChordType,
    /// Sorted, deduplicated semitone offsets from the root.
    pub intervals: Vec<u8>,
    pub suffix: String,
    pub commonness: i32,
}

impl ChordTypeSpec {
    pub fn new(chord_type: ChordType, intervals: &[u8], suffix: &str, commonness: i32) -> Self {
        let mut spec = Self {
            chord_type,
            intervals: intervals.to_vec(),
            suffix: suffix.to_string(),
            commonness,
        };
        spec.normalize();
        spec
    }

    /// Sort and dedup `intervals` after they were set by hand.
    pub fn normalize(&mut self) {
        self.intervals.sort_unstable();
        self.intervals.dedup();
    }

    pub fn standard(chord_type: ChordType) -> Self {
        Self::new(
            chord_type,
            chord_type.default_intervals(),
            chord_type.default_suffix(),
            chord_type.default_commonness(),
        )
    }

    /// Exactly root plus fifth, in any order.
    pub fn is_power(&self) -> bool {
        self.intervals.iter().all(|&iv| iv == 0 || iv == 7)
            && self.intervals.contains(&0)
            && self.intervals.contains(&7)
    }

    /// Pitch classes of this chord built on `root`.
    pub fn pitch_classes(&self, root: PitchClass) -> Vec<PitchClass> {
        let mut pcs: Vec<PitchClass> = self
            .intervals
            .iter()
            .map(|&iv| (root + iv % 12) % 12)
            .collect();
        pcs.sort_unstable();
        pcs.dedup();
        pcs
    }
}

/// Ordered table of chord qualities consulted by detection.
///
/// Every entry's intervals are kept sorted and deduplicated, whether the
/// table was built in code or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VocabularyEntries")]
pub struct ChordVocabulary {
    entries: Vec<ChordTypeSpec>,
}

#[derive(Deserialize)]
struct VocabularyEntries {
    entries: Vec<ChordTypeSpec>,
}

impl From<VocabularyEntries> for ChordVocabulary {
    fn from(raw: VocabularyEntries) -> Self {
        Self::from_specs(raw.entries)
    }
}

impl ChordVocabulary {
    /// Every [`ChordType`] with its default intervals, suffix and weight.
    pub fn standard() -> Self {
        Self {
            entries: ChordType::ALL.iter().map(|&t| ChordTypeSpec::standard(t)).collect(),
        }
    }

    pub fn from_specs(mut entries: Vec<ChordTypeSpec>) -> Self {
        for entry in &mut entries {
            entry.normalize();
        }
        Self { entries }
    }

    pub fn get(&self, chord_type: ChordType) -> Option<&ChordTypeSpec> {
        self.entries.iter().find(|e| e.chord_type == chord_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChordTypeSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns false if the quality is not in this vocabulary.
    pub fn set_commonness(&mut self, chord_type: ChordType, commonness: i32) -> bool {
        match self.entries.iter_mut().find(|e| e.chord_type == chord_type) {
            Some(entry) => {
                entry.commonness = commonness;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, chord_type: ChordType) {
        self.entries.retain(|e| e.chord_type != chord_type);
    }
}

/// One interpretation of a set of notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordMatch {
    pub root_note: Note,
    pub chord_type: ChordType,
    pub display_name: String,
    pub commonness: i32,
    pub is_slash_chord: bool,
    pub bass_note: Option<Note>,
    /// Interval set of the matched vocabulary entry.
    pub intervals: Vec<u8>,
}

impl ChordMatch {
    /// Pitch classes of the chord itself (without any slash bass).
    pub fn chord_tones(&self) -> Vec<PitchClass> {
        let root = self.root_note.pitch_class();
        let mut pcs: Vec<PitchClass> = self
            .intervals
            .iter()
            .map(|&iv| (root + iv % 12) % 12)
            .collect();
        pcs.sort_unstable();
        pcs.dedup();
        pcs
    }
}

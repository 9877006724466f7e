//! Key and scale vocabulary.

use serde::{Deserialize, Serialize};

use crate::pitch::PitchClass;

/// Scale/mode a key is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    Major,
    Minor,
    HarmonicMinor,
    MelodicMinor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
    MajorPentatonic,
    MinorPentatonic,
    Blues,
}

impl KeyType {
    pub const ALL: [KeyType; 12] = [
        KeyType::Major,
        KeyType::Minor,
        KeyType::HarmonicMinor,
        KeyType::MelodicMinor,
        KeyType::Dorian,
        KeyType::Phrygian,
        KeyType::Lydian,
        KeyType::Mixolydian,
        KeyType::Locrian,
        KeyType::MajorPentatonic,
        KeyType::MinorPentatonic,
        KeyType::Blues,
    ];

    /// Stable identifier used in config files and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            KeyType::Major => "major",
            KeyType::Minor => "minor",
            KeyType::HarmonicMinor => "harmonic_minor",
            KeyType::MelodicMinor => "melodic_minor",
            KeyType::Dorian => "dorian",
            KeyType::Phrygian => "phrygian",
            KeyType::Lydian => "lydian",
            KeyType::Mixolydian => "mixolydian",
            KeyType::Locrian => "locrian",
            KeyType::MajorPentatonic => "major_pentatonic",
            KeyType::MinorPentatonic => "minor_pentatonic",
            KeyType::Blues => "blues",
        }
    }

    pub fn from_key(key: &str) -> Option<KeyType> {
        KeyType::ALL.iter().copied().find(|t| t.key() == key)
    }

    pub fn name(&self) -> &'static str {
        match self {
            KeyType::Major => "Major",
            KeyType::Minor => "Minor",
            KeyType::HarmonicMinor => "Harmonic Minor",
            KeyType::MelodicMinor => "Melodic Minor",
            KeyType::Dorian => "Dorian",
            KeyType::Phrygian => "Phrygian",
            KeyType::Lydian => "Lydian",
            KeyType::Mixolydian => "Mixolydian",
            KeyType::Locrian => "Locrian",
            KeyType::MajorPentatonic => "Major Pentatonic",
            KeyType::MinorPentatonic => "Minor Pentatonic",
            KeyType::Blues => "Blues",
        }
    }

    /// Semitone intervals from the tonic for each degree.
    pub fn default_intervals(&self) -> &'static [u8] {
        match self {
            KeyType::Major => &[0, 2, 4, 5, 7, 9, 11],
            KeyType::Minor => &[0, 2, 3, 5, 7, 8, 10],
            KeyType::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            KeyType::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            KeyType::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            KeyType::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            KeyType::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            KeyType::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            KeyType::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            KeyType::MajorPentatonic => &[0, 2, 4, 7, 9],
            KeyType::MinorPentatonic => &[0, 3, 5, 7, 10],
            KeyType::Blues => &[0, 3, 5, 6, 7, 10],
        }
    }

    /// Semitones from this key's tonic up to the tonic of the major key that
    /// shares its signature.
    pub fn relative_major_offset(&self) -> u8 {
        match self {
            KeyType::Major | KeyType::MajorPentatonic => 0,
            KeyType::Minor
            | KeyType::HarmonicMinor
            | KeyType::MelodicMinor
            | KeyType::MinorPentatonic
            | KeyType::Blues => 3,
            KeyType::Dorian => 10,
            KeyType::Phrygian => 8,
            KeyType::Lydian => 7,
            KeyType::Mixolydian => 5,
            KeyType::Locrian => 1,
        }
    }
}

/// One key-vocabulary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    pub key_type: KeyType,
    /// Ascending degrees in 0..=11, at most seven.
    pub intervals: Vec<u8>,
}

impl KeySpec {
    pub fn standard(key_type: KeyType) -> Self {
        Self {
            key_type,
            intervals: key_type.default_intervals().to_vec(),
        }
    }
}

/// Table of scales consulted by key utilities and Roman-numeral analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyVocabulary {
    entries: Vec<KeySpec>,
}

impl KeyVocabulary {
    pub fn standard() -> Self {
        Self {
            entries: KeyType::ALL.iter().map(|&t| KeySpec::standard(t)).collect(),
        }
    }

    pub fn from_specs(entries: Vec<KeySpec>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key_type: KeyType) -> Option<&KeySpec> {
        self.entries.iter().find(|e| e.key_type == key_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeySpec> {
        self.entries.iter()
    }
}

/// A concrete key: tonic pitch class plus scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub root: PitchClass,
    pub key_type: KeyType,
}

impl Key {
    pub fn new(root: PitchClass, key_type: KeyType) -> Self {
        Self {
            root: root % 12,
            key_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_type_keys_unique() {
        let keys: HashSet<&str> = KeyType::ALL.iter().map(|t| t.key()).collect();
        assert_eq!(keys.len(), KeyType::ALL.len());
        for t in KeyType::ALL {
            assert_eq!(KeyType::from_key(t.key()), Some(t));
        }
    }

    #[test]
    fn intervals_ascending_and_bounded() {
        for t in KeyType::ALL {
            let iv = t.default_intervals();
            assert!(iv.len() <= 7, "{:?}", t);
            assert_eq!(iv[0], 0);
            assert!(iv.windows(2).all(|w| w[0] < w[1]), "{:?}", t);
            assert!(iv.iter().all(|&i| i < 12));
        }
    }

    #[test]
    fn relative_major_of_modes_lands_on_ionian() {
        // Every diatonic mode rotated to its relative major must equal the major scale.
        let major: HashSet<u8> = KeyType::Major.default_intervals().iter().copied().collect();
        for t in [
            KeyType::Minor,
            KeyType::Dorian,
            KeyType::Phrygian,
            KeyType::Lydian,
            KeyType::Mixolydian,
            KeyType::Locrian,
        ] {
            let off = t.relative_major_offset();
            let rotated: HashSet<u8> = t
                .default_intervals()
                .iter()
                .map(|&iv| (iv + 12 - off) % 12)
                .collect();
            assert_eq!(rotated, major, "{:?}", t);
        }
    }

    #[test]
    fn key_normalises_root() {
        assert_eq!(Key::new(14, KeyType::Major).root, 2);
    }
}

//! Chords built on each degree of a seven-note key.

use serde::Serialize;

use isokey_types::{ChordMatch, ChordVocabulary, Key, KeyVocabulary, Note, PitchClass};

use super::chord_detect::detect_chord;
use super::keys::should_use_flats;
use super::roman::roman_numeral;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiatonicChord {
    /// 1-based scale degree.
    pub degree: usize,
    pub root: PitchClass,
    pub chord: ChordMatch,
    pub roman: String,
}

/// Triads (or seventh chords) stacked in thirds on every degree.
///
/// Only keys with exactly seven degrees are supported; others give an empty
/// list. A degree whose stack matches nothing in `chords` is left out.
pub fn diatonic_chords(
    key: &Key,
    keys: &KeyVocabulary,
    chords: &ChordVocabulary,
    with_sevenths: bool,
) -> Vec<DiatonicChord> {
    let Some(spec) = keys.get(key.key_type) else {
        return Vec::new();
    };
    if spec.intervals.len() != 7 {
        log::debug!(
            target: "theory",
            "{} has {} degrees, no diatonic chords",
            key.key_type.name(),
            spec.intervals.len()
        );
        return Vec::new();
    }

    let use_flats = should_use_flats(key.root, key.key_type);
    let stack_size = if with_sevenths { 4 } else { 3 };
    let mut result = Vec::with_capacity(7);
    for degree in 0..7 {
        let notes: Vec<Note> = (0..stack_size)
            .map(|i| {
                let iv = spec.intervals[(degree + 2 * i) % 7];
                Note::for_pitch((key.root + iv) as i32, use_flats)
            })
            .collect();
        let root = notes[0].pitch_class();
        let Some(chord) = detect_chord(&notes, chords, None)
            .into_iter()
            .find(|m| m.root_note.pitch_class() == root)
        else {
            continue;
        };
        let Some(roman) = roman_numeral(root, chord.chord_type, key, keys) else {
            continue;
        };
        result.push(DiatonicChord {
            degree: degree + 1,
            root,
            chord,
            roman,
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use isokey_types::KeyType;

    fn romans(key: Key, sevenths: bool) -> Vec<String> {
        diatonic_chords(&key, &KeyVocabulary::standard(), &ChordVocabulary::standard(), sevenths)
            .into_iter()
            .map(|c| c.roman)
            .collect()
    }

    #[test]
    fn c_major_triads() {
        assert_eq!(
            romans(Key::new(0, KeyType::Major), false),
            vec!["I", "ii", "iii", "IV", "V", "vi", "vii\u{b0}"]
        );
    }

    #[test]
    fn c_major_sevenths() {
        assert_eq!(
            romans(Key::new(0, KeyType::Major), true),
            vec!["Imaj7", "ii7", "iii7", "IVmaj7", "V7", "vi7", "vii\u{f8}7"]
        );
    }

    #[test]
    fn a_minor_triads() {
        assert_eq!(
            romans(Key::new(9, KeyType::Minor), false),
            vec!["i", "ii\u{b0}", "III", "iv", "v", "VI", "VII"]
        );
    }

    #[test]
    fn flat_key_spelling() {
        let chords = diatonic_chords(
            &Key::new(5, KeyType::Major),
            &KeyVocabulary::standard(),
            &ChordVocabulary::standard(),
            false,
        );
        assert_eq!(chords[3].chord.display_name, "Bb");
        assert_eq!(chords[3].degree, 4);
    }

    #[test]
    fn pentatonic_has_none() {
        assert!(romans(Key::new(0, KeyType::MajorPentatonic), false).is_empty());
    }
}

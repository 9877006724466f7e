//! Roman-numeral analysis of a chord against a key.

use isokey_types::{ChordType, Key, KeyVocabulary, PitchClass};

const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
}

/// Numeral case and the suffix written after it.
fn numeral_style(chord_type: ChordType) -> (Case, &'static str) {
    use Case::*;
    match chord_type {
        ChordType::Major => (Upper, ""),
        ChordType::Major6 => (Upper, "6"),
        ChordType::Major7 => (Upper, "maj7"),
        ChordType::Major9 => (Upper, "maj9"),
        ChordType::Add9 => (Upper, "add9"),
        ChordType::SixNine => (Upper, "6/9"),
        ChordType::Minor => (Lower, ""),
        ChordType::Minor6 => (Lower, "6"),
        ChordType::Minor7 => (Lower, "7"),
        ChordType::Minor9 => (Lower, "9"),
        ChordType::Minor11 => (Lower, "11"),
        ChordType::MinorMajor7 => (Lower, "maj7"),
        ChordType::MinorAdd9 => (Lower, "add9"),
        ChordType::Diminished => (Lower, "\u{b0}"),
        ChordType::Diminished7 => (Lower, "\u{b0}7"),
        ChordType::HalfDiminished7 => (Lower, "\u{f8}7"),
        ChordType::Dominant7 => (Upper, "7"),
        ChordType::Dominant9 => (Upper, "9"),
        ChordType::Dominant11 => (Upper, "11"),
        ChordType::Dominant13 => (Upper, "13"),
        ChordType::Augmented => (Upper, "+"),
        ChordType::Augmented7 => (Upper, "+7"),
        ChordType::Sus2 => (Upper, "sus2"),
        ChordType::Sus4 => (Upper, "sus4"),
        ChordType::Dominant7Sus4 => (Upper, "7sus4"),
        ChordType::Power => (Upper, "5"),
    }
}

/// Accidental for a root `offset` semitones from the nearest scale degree.
fn accidental(offset: i32) -> &'static str {
    match offset {
        1 | -11 => "#",
        -1 | -2 | 10 => "b",
        _ => "",
    }
}

/// Numeral for a chord rooted on `root` in `key`, e.g. `"V7"`, `"ii"`,
/// `"vii°"` or `"bIV"`.
///
/// Roots off the scale borrow the nearest degree (the lower-numbered one on
/// a tie) with an accidental. `None` when the key type is missing from the
/// vocabulary.
pub fn roman_numeral(root: PitchClass, chord_type: ChordType, key: &Key, keys: &KeyVocabulary) -> Option<String> {
    let spec = keys.get(key.key_type)?;
    let relative = ((root % 12) + 12 - key.root % 12) % 12;

    let (degree, accidental) = match spec.intervals.iter().position(|&iv| iv == relative) {
        Some(degree) => (degree, ""),
        None => {
            let (degree, iv) = spec
                .intervals
                .iter()
                .enumerate()
                .min_by_key(|(_, iv)| (relative as i32 - **iv as i32).abs())?;
            (degree, accidental(relative as i32 - *iv as i32))
        }
    };

    let numeral = NUMERALS.get(degree)?;
    let (case, suffix) = numeral_style(chord_type);
    let numeral = match case {
        Case::Upper => numeral.to_string(),
        Case::Lower => numeral.to_lowercase(),
    };
    Some(format!("{}{}{}", accidental, numeral, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use isokey_types::KeyType;

    fn roman(root: PitchClass, chord_type: ChordType, key_root: PitchClass, key_type: KeyType) -> String {
        roman_numeral(root, chord_type, &Key::new(key_root, key_type), &KeyVocabulary::standard()).unwrap()
    }

    #[test]
    fn dominant_seventh_in_c() {
        assert_eq!(roman(7, ChordType::Dominant7, 0, KeyType::Major), "V7");
    }

    #[test]
    fn diatonic_triads_in_c() {
        assert_eq!(roman(0, ChordType::Major, 0, KeyType::Major), "I");
        assert_eq!(roman(2, ChordType::Minor, 0, KeyType::Major), "ii");
        assert_eq!(roman(11, ChordType::Diminished, 0, KeyType::Major), "vii\u{b0}");
        assert_eq!(roman(2, ChordType::Minor7, 0, KeyType::Major), "ii7");
        assert_eq!(roman(11, ChordType::HalfDiminished7, 0, KeyType::Major), "vii\u{f8}7");
    }

    #[test]
    fn transposed_key() {
        // D major in G major is V.
        assert_eq!(roman(2, ChordType::Major, 7, KeyType::Major), "V");
        assert_eq!(roman(4, ChordType::Minor, 7, KeyType::Major), "vi");
    }

    #[test]
    fn chromatic_roots_take_nearest_degree() {
        // Eb in C major: nearest degrees D and E tie, D (II) wins, one above.
        assert_eq!(roman(3, ChordType::Major, 0, KeyType::Major), "#II");
        // F# in C major pentatonic sits one below G, the fourth scale entry.
        assert_eq!(roman(6, ChordType::Major, 0, KeyType::MajorPentatonic), "bIV");
        // D in C blues: one below Eb, the second degree.
        assert_eq!(roman(2, ChordType::Minor, 0, KeyType::Blues), "bii");
    }

    #[test]
    fn two_above_has_no_accidental() {
        // B in C major pentatonic is two above A.
        assert_eq!(roman(11, ChordType::Major, 0, KeyType::MajorPentatonic), "V");
    }

    #[test]
    fn suffix_table() {
        assert_eq!(roman(0, ChordType::Augmented, 0, KeyType::Major), "I+");
        assert_eq!(roman(7, ChordType::Dominant7Sus4, 0, KeyType::Major), "V7sus4");
        assert_eq!(roman(9, ChordType::MinorMajor7, 0, KeyType::Major), "vimaj7");
        assert_eq!(roman(0, ChordType::SixNine, 0, KeyType::Major), "I6/9");
        assert_eq!(roman(7, ChordType::Power, 0, KeyType::Major), "V5");
    }

    #[test]
    fn missing_key_type() {
        let keys = KeyVocabulary::from_specs(Vec::new());
        assert_eq!(roman_numeral(0, ChordType::Major, &Key::new(0, KeyType::Major), &keys), None);
    }
}

//! Pitch arithmetic: absolute pitch, pitch class, note spelling and octave.
//!
//! Everything follows the MIDI convention: C4 = 60, and pitch 0..11 is
//! octave -1.

use std::fmt;

use serde::Serialize;

use crate::error::TheoryError;

/// Absolute semitone number (MIDI convention).
pub type Pitch = i32;

/// Pitch modulo 12, in 0..=11.
pub type PitchClass = u8;

pub const MIN_PITCH: Pitch = 0;
pub const MAX_PITCH: Pitch = 127;

/// Pitch at lattice cell (0, 0) when the caller asks for the default (C2).
pub const DEFAULT_ORIGIN_PITCH: Pitch = 36;

/// Default accidental preference for spelling pitch classes.
pub const DEFAULT_USE_FLATS: bool = false;

pub const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// A spelled note name with its pitch class.
///
/// Equality compares spelling too; use [`Note::is_enharmonic_with`] for
/// pitch equivalence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Note {
    name: &'static str,
    pitch_class: PitchClass,
}

impl Note {
    /// Parse a spelling such as `"C"`, `"F#"`, `"Bb"` or `"E#"`.
    ///
    /// The spelling is canonicalised to the sharp or flat table depending on
    /// the accidental used, so `"E#"` becomes `F` and `"Cb"` becomes `B`.
    pub fn parse(name: &str) -> Result<Self, TheoryError> {
        let (pitch_class, accidental) = parse_spelling(name)?;
        let use_flats = accidental < 0;
        Ok(Self::from_pitch_class_unchecked(pitch_class, use_flats))
    }

    pub fn from_pitch_class(pitch_class: PitchClass, use_flats: bool) -> Result<Self, TheoryError> {
        validate_pitch_class(pitch_class as i32)?;
        Ok(Self::from_pitch_class_unchecked(pitch_class, use_flats))
    }

    /// Spelling of any pitch's class; unlike [`pitch_to_note`] the pitch
    /// need not lie in the MIDI range.
    pub fn for_pitch(pitch: Pitch, use_flats: bool) -> Self {
        Self::from_pitch_class_unchecked(pitch_class_of(pitch), use_flats)
    }

    fn from_pitch_class_unchecked(pitch_class: PitchClass, use_flats: bool) -> Self {
        let table = if use_flats { &FLAT_NAMES } else { &SHARP_NAMES };
        Self {
            name: table[pitch_class as usize],
            pitch_class,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pitch_class(&self) -> PitchClass {
        self.pitch_class
    }

    /// True when both notes sound the same pitch class, whatever the spelling.
    pub fn is_enharmonic_with(&self, other: &Note) -> bool {
        self.pitch_class == other.pitch_class
    }

    /// Same pitch class spelled with the requested accidental.
    pub fn respelled(&self, use_flats: bool) -> Note {
        Self::from_pitch_class_unchecked(self.pitch_class, use_flats)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Returns (pitch class, accidental direction).
fn parse_spelling(name: &str) -> Result<(PitchClass, i32), TheoryError> {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    let letter = chars
        .next()
        .ok_or_else(|| TheoryError::invalid("empty note name"))?;
    let natural: i32 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(TheoryError::invalid(format!("unknown note name {:?}", name))),
    };
    let accidental = match chars.as_str() {
        "" => 0,
        "#" | "\u{266f}" => 1,
        "b" | "\u{266d}" => -1,
        _ => return Err(TheoryError::invalid(format!("unknown note name {:?}", name))),
    };
    Ok(((natural + accidental).rem_euclid(12) as PitchClass, accidental))
}

pub fn validate_pitch(pitch: Pitch) -> Result<Pitch, TheoryError> {
    if (MIN_PITCH..=MAX_PITCH).contains(&pitch) {
        Ok(pitch)
    } else {
        Err(TheoryError::invalid(format!(
            "pitch {} outside {}..={}",
            pitch, MIN_PITCH, MAX_PITCH
        )))
    }
}

pub fn validate_pitch_class(pitch_class: i32) -> Result<PitchClass, TheoryError> {
    if (0..12).contains(&pitch_class) {
        Ok(pitch_class as PitchClass)
    } else {
        Err(TheoryError::invalid(format!(
            "pitch class {} outside 0..=11",
            pitch_class
        )))
    }
}

pub fn note_to_pitch_class(name: &str) -> Result<PitchClass, TheoryError> {
    parse_spelling(name).map(|(pc, _)| pc)
}

pub fn pitch_class_to_note(pitch_class: i32, use_flats: bool) -> Result<&'static str, TheoryError> {
    let pc = validate_pitch_class(pitch_class)?;
    let table = if use_flats { &FLAT_NAMES } else { &SHARP_NAMES };
    Ok(table[pc as usize])
}

/// Absolute pitch of a note in an octave: `(octave + 1) * 12 + pitch_class`.
pub fn note_to_pitch(name: &str, octave: i32) -> Result<Pitch, TheoryError> {
    let pc = note_to_pitch_class(name)? as i32;
    let out_of_range = || TheoryError::invalid(format!("{}{} is outside the MIDI range", name, octave));
    let pitch = octave
        .checked_add(1)
        .and_then(|o| o.checked_mul(12))
        .and_then(|v| v.checked_add(pc))
        .ok_or_else(out_of_range)?;
    validate_pitch(pitch).map_err(|_| out_of_range())
}

/// Spelled note and octave for an absolute pitch.
pub fn pitch_to_note(pitch: Pitch, use_flats: bool) -> Result<(Note, i32), TheoryError> {
    validate_pitch(pitch)?;
    let note = Note::from_pitch_class_unchecked(pitch_class_of(pitch), use_flats);
    Ok((note, octave_of(pitch)))
}

pub fn pitch_class_of(pitch: Pitch) -> PitchClass {
    pitch.rem_euclid(12) as PitchClass
}

pub fn octave_of(pitch: Pitch) -> i32 {
    pitch.div_euclid(12) - 1
}

/// Compact name with octave, e.g. `"C4"` or `"Eb3"`.
pub fn pitch_label(pitch: Pitch, use_flats: bool) -> String {
    let table = if use_flats { &FLAT_NAMES } else { &SHARP_NAMES };
    format!(
        "{}{}",
        table[pitch_class_of(pitch) as usize],
        octave_of(pitch)
    )
}

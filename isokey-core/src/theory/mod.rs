//! Chord and key recognition: detection, key utilities, Roman numerals.
//!
//! Pure functions over the vocabularies in `isokey_types`; nothing here
//! touches the lattice.

pub mod chord_detect;
pub mod diatonic;
pub mod keys;
pub mod roman;

pub use chord_detect::{detect_chord, detect_chord_from_pitches, detect_chord_names};
pub use diatonic::{diatonic_chords, DiatonicChord};
pub use keys::{
    detect_keys, generate_key_pitch_classes, is_pitch_class_in_key, key_name, should_use_flats,
    KeyMatch,
};
pub use roman::roman_numeral;

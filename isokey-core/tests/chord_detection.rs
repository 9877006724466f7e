//! Recognition regressions: detection, key utilities and Roman numerals.

use isokey_core::grid::Grid;
use isokey_core::theory::{
    detect_chord, detect_chord_from_pitches, detect_chord_names, diatonic_chords,
    generate_key_pitch_classes, roman_numeral,
};
use isokey_types::{ChordType, ChordVocabulary, Coord, Key, KeyType, KeyVocabulary, Note};

fn vocab() -> ChordVocabulary {
    ChordVocabulary::standard()
}

fn notes(names: &[&str]) -> Vec<Note> {
    names.iter().map(|n| Note::parse(n).unwrap()).collect()
}

#[test]
fn power_chord_not_reported_under_foreign_bass() {
    let matches = detect_chord(&notes(&["B", "C", "G", "C"]), &vocab(), Some(&[47, 48, 55, 60]));
    assert!(matches.iter().all(|m| m.display_name != "C5"));
    assert!(matches.iter().all(|m| m.chord_type != ChordType::Power));
}

#[test]
fn second_inversion_is_a_slash_chord() {
    let matches = detect_chord(&notes(&["C", "E", "G"]), &vocab(), Some(&[60, 64, 55]));
    let top = &matches[0];
    assert!(top.is_slash_chord);
    assert_eq!(top.root_note.pitch_class(), 0);
    assert_eq!(top.bass_note.map(|n| n.pitch_class()), Some(7));
}

#[test]
fn diminished_seventh_rooted_on_lowest_pitch() {
    for (bass_name, bass_pitch) in [("C", 48), ("Eb", 51), ("Gb", 54), ("A", 45)] {
        let matches = detect_chord(
            &notes(&["C", "Eb", "Gb", "A"]),
            &vocab(),
            Some(&[bass_pitch, 60, 63, 66, 69]),
        );
        assert_eq!(matches[0].chord_type, ChordType::Diminished7);
        assert_eq!(matches[0].root_note.name(), bass_name);
    }
}

#[test]
fn dominant_seventh_is_v7_in_c() {
    let numeral = roman_numeral(7, ChordType::Dominant7, &Key::new(0, KeyType::Major), &KeyVocabulary::standard());
    assert_eq!(numeral.as_deref(), Some("V7"));
}

#[test]
fn c_major_scale() {
    let mut pcs = generate_key_pitch_classes(0, KeyType::Major, &KeyVocabulary::standard());
    pcs.sort_unstable();
    assert_eq!(pcs, vec![0, 2, 4, 5, 7, 9, 11]);
}

#[test]
fn grid_selection_feeds_detection() {
    let mut grid = Grid::new(12, 8, 36).unwrap();
    // G3, C4, E4 around the middle of the keyboard.
    for coord in [Coord::new(4, 1), Coord::new(6, 0), Coord::new(7, 0)] {
        assert!(grid.set_active(coord, true));
    }
    assert_eq!(grid.active_pitches(), vec![55, 60, 64]);
    let matches = detect_chord_from_pitches(&grid.active_pitches(), &vocab(), grid.use_flats());
    assert_eq!(matches[0].display_name, "C/G");
}

#[test]
fn every_vocabulary_entry_detects_itself() {
    for spec in vocab().iter() {
        let root = Note::parse("D").unwrap();
        let chord_notes: Vec<Note> = spec
            .pitch_classes(root.pitch_class())
            .into_iter()
            .map(|pc| Note::for_pitch(pc as i32, false))
            .collect();
        // Root first so the root spelling is the one reported.
        let mut ordered = vec![root];
        ordered.extend(chord_notes.into_iter().filter(|n| n.pitch_class() != root.pitch_class()));
        let matches = detect_chord(&ordered, &vocab(), None);
        assert!(
            matches
                .iter()
                .any(|m| m.chord_type == spec.chord_type && m.root_note.pitch_class() == 2),
            "{} not detected",
            spec.chord_type.name()
        );
    }
}

#[test]
fn diatonic_sevenths_in_f() {
    let chords = diatonic_chords(&Key::new(5, KeyType::Major), &KeyVocabulary::standard(), &vocab(), true);
    let names: Vec<&str> = chords.iter().map(|c| c.chord.display_name.as_str()).collect();
    assert_eq!(names, vec!["Fmaj7", "Gm7", "Am7", "Bbmaj7", "C7", "Dm7", "Em7b5"]);
}

#[test]
fn names_and_notes_agree() {
    let by_name = detect_chord_names(&["A", "C#", "E", "G"], &vocab(), None).unwrap();
    let by_note = detect_chord(&notes(&["A", "C#", "E", "G"]), &vocab(), None);
    assert_eq!(by_name, by_note);
    assert_eq!(by_name[0].display_name, "A7");
}

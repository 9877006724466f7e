//! Chord detection from a set of played notes.
//!
//! Every distinct note is tried as the root. The intervals of the other notes
//! above it (mod 12, deduplicated, sorted) must equal a vocabulary entry's
//! interval set exactly. Larger clusters are also re-read with seconds,
//! thirds, fourths and sixths lifted an octave so they can match ninth,
//! eleventh and thirteenth chords.
//!
//! When the sounding pitches are known, the lowest one (the bass) steers the
//! ranking: readings rooted on the bass are preferred, diminished sevenths are
//! ordered starting from the bass, and one slash-chord reading is added.

use isokey_types::pitch::{pitch_class_of, validate_pitch};
use isokey_types::{
    ChordMatch, ChordType, ChordTypeSpec, ChordVocabulary, Note, Pitch, PitchClass, TheoryError,
};

/// Bonus for a reading rooted on the bass note.
pub const BASS_ROOT_BONUS: i32 = 2;
/// Smaller bonus for diminished readings rooted on the bass.
pub const DIMINISHED_BASS_BONUS: i32 = 1;
/// Penalty for a chord recovered above a foreign bass note.
pub const SLASH_RECOVERY_PENALTY: i32 = 3;
/// Bonus for naming an inversion whose bass is a chord tone.
pub const INVERSION_BONUS: i32 = 1;

/// Intervals that may be read an octave higher (2nd, 3rd, 4th, 6th).
const EXTENDABLE_INTERVALS: [u8; 4] = [2, 4, 5, 9];
/// Compound readings are only tried on clusters of at least this many notes.
const MIN_NOTES_FOR_EXTENDED: usize = 4;

/// All interpretations of `notes`, best first.
///
/// `actual_pitches`, when given, are the sounding pitches; only their lowest
/// value matters. Returns an empty Vec for fewer than two distinct pitch
/// classes or when nothing matches.
pub fn detect_chord(
    notes: &[Note],
    vocabulary: &ChordVocabulary,
    actual_pitches: Option<&[Pitch]>,
) -> Vec<ChordMatch> {
    let distinct = distinct_notes(notes);
    if distinct.len() < 2 {
        return Vec::new();
    }

    let bass = actual_pitches
        .and_then(lowest_pitch)
        .map(pitch_class_of)
        .and_then(|pc| distinct.iter().find(|n| n.pitch_class() == pc).copied());

    let mut matches = standard_matches(&distinct, vocabulary);
    if let Some(bass) = bass {
        apply_bass_bias(&mut matches, bass.pitch_class());
    }
    sort_by_commonness(&mut matches);

    if let (Some(bass), Some(pitches)) = (bass, actual_pitches) {
        if let Some(slash) = slash_reading(&distinct, &matches, vocabulary, bass, pitches) {
            matches.push(slash);
            sort_by_commonness(&mut matches);
        }
    }

    log::debug!(
        target: "chord",
        "{} notes -> {} readings{}",
        distinct.len(),
        matches.len(),
        matches
            .first()
            .map(|m| format!(", best {}", m.display_name))
            .unwrap_or_default()
    );
    matches
}

/// [`detect_chord`] on note spellings such as `["C", "E", "G"]`.
pub fn detect_chord_names(
    names: &[&str],
    vocabulary: &ChordVocabulary,
    actual_pitches: Option<&[Pitch]>,
) -> Result<Vec<ChordMatch>, TheoryError> {
    let notes = names
        .iter()
        .map(|n| Note::parse(n))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(detect_chord(&notes, vocabulary, actual_pitches))
}

/// [`detect_chord`] on sounding pitches, spelled with the given preference.
pub fn detect_chord_from_pitches(
    pitches: &[Pitch],
    vocabulary: &ChordVocabulary,
    use_flats: bool,
) -> Vec<ChordMatch> {
    let valid: Vec<Pitch> = pitches
        .iter()
        .copied()
        .filter(|&p| validate_pitch(p).is_ok())
        .collect();
    let mut sorted = valid.clone();
    sorted.sort_unstable();
    let notes: Vec<Note> = sorted.iter().map(|&p| Note::for_pitch(p, use_flats)).collect();
    detect_chord(&notes, vocabulary, Some(&valid))
}

fn distinct_notes(notes: &[Note]) -> Vec<Note> {
    let mut seen = [false; 12];
    let mut distinct = Vec::with_capacity(notes.len());
    for note in notes {
        let pc = note.pitch_class() as usize;
        if !seen[pc] {
            seen[pc] = true;
            distinct.push(*note);
        }
    }
    distinct
}

fn lowest_pitch(pitches: &[Pitch]) -> Option<Pitch> {
    pitches
        .iter()
        .copied()
        .filter(|&p| validate_pitch(p).is_ok())
        .min()
}

fn sort_by_commonness(matches: &mut [ChordMatch]) {
    // Stable: equal weights keep discovery order.
    matches.sort_by(|a, b| b.commonness.cmp(&a.commonness));
}

/// Sorted distinct intervals (mod 12) of `notes` above `root`.
fn intervals_above(root: PitchClass, notes: &[Note]) -> Vec<u8> {
    let mut intervals: Vec<u8> = notes
        .iter()
        .map(|n| (n.pitch_class() + 12 - root) % 12)
        .collect();
    intervals.sort_unstable();
    intervals.dedup();
    intervals
}

fn standard_matches(distinct: &[Note], vocabulary: &ChordVocabulary) -> Vec<ChordMatch> {
    let mut found = Vec::new();
    for root in distinct {
        let intervals = intervals_above(root.pitch_class(), distinct);
        push_matches(&mut found, *root, &intervals, vocabulary);
    }
    if distinct.len() >= MIN_NOTES_FOR_EXTENDED {
        for root in distinct {
            let intervals = intervals_above(root.pitch_class(), distinct);
            for lifted in extended_readings(&intervals, distinct.len()) {
                push_matches(&mut found, *root, &lifted, vocabulary);
            }
        }
    }
    found
}

fn push_matches(found: &mut Vec<ChordMatch>, root: Note, intervals: &[u8], vocabulary: &ChordVocabulary) {
    for spec in vocabulary.iter() {
        // A bare fifth only names a chord when nothing else sounds.
        if spec.is_power() && intervals.len() != 2 {
            continue;
        }
        if spec.intervals != intervals {
            continue;
        }
        let duplicate = found
            .iter()
            .any(|m| m.root_note.pitch_class() == root.pitch_class() && m.chord_type == spec.chord_type);
        if !duplicate {
            found.push(chord_match(root, spec));
        }
    }
}

fn chord_match(root: Note, spec: &ChordTypeSpec) -> ChordMatch {
    ChordMatch {
        root_note: root,
        chord_type: spec.chord_type,
        display_name: format!("{}{}", root.name(), spec.suffix),
        commonness: spec.commonness,
        is_slash_chord: false,
        bass_note: None,
        intervals: spec.intervals.clone(),
    }
}

/// Every non-empty combination of extendable intervals lifted by an octave.
///
/// Enumerated as a bitmask over the qualifying positions; there are at most
/// four of them, so at most fifteen readings.
fn extended_readings(intervals: &[u8], note_count: usize) -> Vec<Vec<u8>> {
    let qualifying: Vec<usize> = intervals
        .iter()
        .enumerate()
        .filter(|(_, iv)| EXTENDABLE_INTERVALS.contains(iv))
        .map(|(i, _)| i)
        .take(note_count)
        .collect();

    (1u32..(1 << qualifying.len()))
        .map(|mask| {
            let mut lifted = intervals.to_vec();
            for (bit, &idx) in qualifying.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    lifted[idx] += 12;
                }
            }
            lifted.sort_unstable();
            lifted
        })
        .collect()
}

fn apply_bass_bias(matches: &mut Vec<ChordMatch>, bass: PitchClass) {
    for m in matches.iter_mut() {
        if m.root_note.pitch_class() == bass {
            m.commonness += if m.chord_type.is_diminished_family() {
                DIMINISHED_BASS_BONUS
            } else {
                BASS_ROOT_BONUS
            };
        }
    }

    // Diminished sevenths repeat every minor third, so any tone can be the
    // root. List them starting at the bass and climbing by minor thirds.
    let Some(first) = matches
        .iter()
        .position(|m| m.chord_type == ChordType::Diminished7)
    else {
        return;
    };
    let (mut dim7, rest): (Vec<ChordMatch>, Vec<ChordMatch>) = std::mem::take(matches)
        .into_iter()
        .partition(|m| m.chord_type == ChordType::Diminished7);
    dim7.sort_by_key(|m| (m.root_note.pitch_class() + 12 - bass) % 12);
    *matches = rest;
    matches.splice(first..first, dim7);
}

fn slash_reading(
    distinct: &[Note],
    matches: &[ChordMatch],
    vocabulary: &ChordVocabulary,
    bass: Note,
    pitches: &[Pitch],
) -> Option<ChordMatch> {
    let best = matches.first();

    // Inversion: the best chord already contains the bass.
    if let Some(best) = best {
        if best.root_note.pitch_class() != bass.pitch_class()
            && best.chord_type != ChordType::Power
            && best.chord_tones().contains(&bass.pitch_class())
        {
            return Some(as_slash(best, bass, best.commonness + INVERSION_BONUS));
        }
    }

    // Recovery: a chord above a bass note that does not belong to it.
    let remaining: Vec<Note> = distinct
        .iter()
        .filter(|n| n.pitch_class() != bass.pitch_class())
        .copied()
        .collect();
    let remaining_pitches: Vec<Pitch> = pitches
        .iter()
        .copied()
        .filter(|&p| pitch_class_of(p) != bass.pitch_class())
        .collect();
    let recovered = detect_chord(&remaining, vocabulary, Some(&remaining_pitches))
        .into_iter()
        .find(|m| !m.is_slash_chord && m.chord_type != ChordType::Power)?;

    let tones = recovered.chord_tones();
    let covered = distinct
        .iter()
        .all(|n| n.pitch_class() == bass.pitch_class() || tones.contains(&n.pitch_class()));
    if !covered {
        return None;
    }
    Some(as_slash(
        &recovered,
        bass,
        recovered.commonness - SLASH_RECOVERY_PENALTY,
    ))
}

fn as_slash(base: &ChordMatch, bass: Note, commonness: i32) -> ChordMatch {
    ChordMatch {
        root_note: base.root_note,
        chord_type: base.chord_type,
        display_name: format!("{}/{}", base.display_name, bass.name()),
        commonness,
        is_slash_chord: true,
        bass_note: Some(bass),
        intervals: base.intervals.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> ChordVocabulary {
        ChordVocabulary::standard()
    }

    fn detect(names: &[&str], pitches: Option<&[Pitch]>) -> Vec<ChordMatch> {
        detect_chord_names(names, &vocab(), pitches).unwrap()
    }

    fn best(names: &[&str]) -> Option<(String, ChordType)> {
        detect(names, None)
            .into_iter()
            .next()
            .map(|m| (m.display_name, m.chord_type))
    }

    #[test]
    fn detect_c_major() {
        assert_eq!(best(&["C", "E", "G"]), Some(("C".to_string(), ChordType::Major)));
    }

    #[test]
    fn detect_d_minor() {
        assert_eq!(best(&["D", "F", "A"]), Some(("Dm".to_string(), ChordType::Minor)));
    }

    #[test]
    fn detect_inversion_without_pitches() {
        // E G C is still C major when the voicing is unknown.
        assert_eq!(best(&["E", "G", "C"]), Some(("C".to_string(), ChordType::Major)));
    }

    #[test]
    fn detect_dominant_seventh() {
        assert_eq!(
            best(&["G", "B", "D", "F"]),
            Some(("G7".to_string(), ChordType::Dominant7))
        );
    }

    #[test]
    fn flat_spelling_is_kept() {
        assert_eq!(
            best(&["Bb", "D", "F"]),
            Some(("Bb".to_string(), ChordType::Major))
        );
    }

    #[test]
    fn single_note_is_no_chord() {
        assert!(detect(&["C"], None).is_empty());
        assert!(detect(&["C", "C"], None).is_empty());
        assert!(detect(&[], None).is_empty());
    }

    #[test]
    fn unknown_name_is_invalid() {
        assert!(detect_chord_names(&["C", "X"], &vocab(), None).is_err());
    }

    #[test]
    fn power_chord_only_for_bare_fifth() {
        let matches = detect(&["C", "G", "C"], None);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].display_name, "C5");
        assert!(detect(&["C", "E", "G"], None)
            .iter()
            .all(|m| m.chord_type != ChordType::Power));
    }

    #[test]
    fn extended_ninth() {
        // C E G Bb D: the D reads as a ninth.
        let matches = detect(&["C", "E", "G", "Bb", "D"], None);
        assert_eq!(matches[0].display_name, "C9");
        assert_eq!(matches[0].intervals, vec![0, 4, 7, 10, 14]);
    }

    #[test]
    fn extended_add9_on_four_notes() {
        let matches = detect(&["C", "D", "E", "G"], None);
        assert!(matches.iter().any(|m| m.display_name == "Cadd9"));
    }

    #[test]
    fn extended_thirteenth() {
        let matches = detect(&["C", "E", "G", "Bb", "D", "A"], None);
        assert!(matches.iter().any(|m| m.display_name == "C13"));
    }

    #[test]
    fn three_notes_never_extended() {
        // C D G is sus2, never an add9 fragment.
        let matches = detect(&["C", "D", "G"], None);
        assert!(matches.iter().all(|m| m.intervals.iter().all(|&iv| iv < 12)));
    }

    #[test]
    fn ambiguous_sixth_ranks_by_commonness() {
        // C E G A: Am7 (8) outranks C6 (6) with no bass information.
        let matches = detect(&["C", "E", "G", "A"], None);
        let names: Vec<&str> = matches.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names[0], "Am7");
        assert!(names.contains(&"C6"));
    }

    #[test]
    fn bass_bonus_reorders_relatives() {
        // C in the bass lifts C6 level with Am7; A in the bass puts Am7 ahead.
        let c_bass = detect(&["C", "E", "G", "A"], Some(&[48, 52, 55, 57]));
        let c6 = c_bass.iter().find(|m| m.display_name == "C6").unwrap();
        assert_eq!(c6.commonness, 8);

        let a_bass = detect(&["C", "E", "G", "A"], Some(&[45, 48, 52, 55]));
        assert_eq!(a_bass[0].display_name, "Am7");
        assert_eq!(a_bass[0].commonness, 10);
    }

    #[test]
    fn slash_chord_from_inversion() {
        let matches = detect(&["C", "E", "G"], Some(&[60, 64, 55]));
        let top = &matches[0];
        assert!(top.is_slash_chord);
        assert_eq!(top.root_note.name(), "C");
        assert_eq!(top.bass_note.map(|n| n.name()), Some("G"));
        assert_eq!(top.display_name, "C/G");
        // The plain reading is still there.
        assert!(matches.iter().any(|m| m.display_name == "C" && !m.is_slash_chord));
    }

    #[test]
    fn slash_chord_recovered_over_foreign_bass() {
        // F# under a C major triad matches nothing on its own.
        let matches = detect(&["F#", "C", "E", "G"], Some(&[54, 60, 64, 67]));
        assert_eq!(matches.len(), 1);
        let slash = &matches[0];
        assert!(slash.is_slash_chord);
        assert_eq!(slash.display_name, "C/F#");
        assert_eq!(slash.chord_type, ChordType::Major);
        // C is the lowest remaining note, so it carries the bass bonus
        // before the recovery penalty.
        assert_eq!(slash.commonness, 10 + 2 - 3);
    }

    #[test]
    fn no_slash_without_pitches() {
        assert!(detect(&["C", "E", "G"], None).iter().all(|m| !m.is_slash_chord));
    }

    #[test]
    fn power_chord_guard_regression() {
        let matches = detect(&["B", "C", "G", "C"], Some(&[47, 48, 55, 60]));
        assert!(matches.iter().all(|m| !m.display_name.starts_with("C5")));
        assert!(matches.is_empty());
    }

    #[test]
    fn diminished_seventh_prefers_bass_root() {
        let matches = detect(&["C", "Eb", "Gb", "A"], Some(&[60, 63, 66, 57]));
        assert_eq!(matches[0].display_name, "Adim7");
        let dim7_roots: Vec<&str> = matches
            .iter()
            .filter(|m| m.chord_type == ChordType::Diminished7 && !m.is_slash_chord)
            .map(|m| m.root_note.name())
            .collect();
        assert_eq!(dim7_roots, vec!["A", "C", "Eb", "Gb"]);
        assert_eq!(matches[0].commonness, matches[1].commonness + 1);
    }

    #[test]
    fn diminished_seventh_without_pitches_keeps_discovery_order() {
        let matches = detect(&["C", "Eb", "Gb", "A"], None);
        let roots: Vec<&str> = matches.iter().map(|m| m.root_note.name()).collect();
        assert_eq!(roots, vec!["C", "Eb", "Gb", "A"]);
    }

    #[test]
    fn diminished_triad_bass_bonus_is_one() {
        let matches = detect(&["B", "D", "F"], Some(&[59, 62, 65]));
        assert_eq!(matches[0].display_name, "Bdim");
        assert_eq!(matches[0].commonness, 6 + 1);
    }

    #[test]
    fn from_pitches_spells_and_detects() {
        let matches = detect_chord_from_pitches(&[55, 59, 62, 65], &vocab(), false);
        assert_eq!(matches[0].display_name, "G7");
        let flats = detect_chord_from_pitches(&[58, 62, 65], &vocab(), true);
        assert_eq!(flats[0].display_name, "Bb");
    }

    #[test]
    fn custom_vocabulary_is_respected() {
        let mut custom = ChordVocabulary::standard();
        custom.remove(ChordType::Major);
        let matches = detect_chord_names(&["C", "E", "G"], &custom, None).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn hand_built_entries_match_in_any_order() {
        let entry = |chord_type, intervals: Vec<u8>, suffix: &str| ChordTypeSpec {
            chord_type,
            intervals,
            suffix: suffix.to_string(),
            commonness: 10,
        };
        let custom = ChordVocabulary::from_specs(vec![
            entry(ChordType::Major, vec![0, 7, 4], ""),
            entry(ChordType::Power, vec![7, 0], "5"),
        ]);
        let names: Vec<String> = detect_chord_names(&["C", "E", "G"], &custom, None)
            .unwrap()
            .into_iter()
            .map(|m| m.display_name)
            .collect();
        assert_eq!(names, vec!["C"]);

        let fifth = detect_chord_names(&["C", "G"], &custom, None).unwrap();
        assert_eq!(fifth.len(), 1);
        assert_eq!(fifth[0].display_name, "C5");
        assert_eq!(fifth[0].intervals, vec![0, 7]);
    }

    #[test]
    fn results_sorted_by_commonness() {
        let matches = detect(&["C", "E", "G", "A", "D"], Some(&[48, 52, 55, 57, 62]));
        assert!(matches.windows(2).all(|w| w[0].commonness >= w[1].commonness));
    }
}

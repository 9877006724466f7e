//! Key membership, accidental preference and key guessing.

use serde::Serialize;

use isokey_types::{Key, KeyType, KeyVocabulary, Note, PitchClass};

/// Major-key tonics written with flats: F, Bb, Eb, Ab, Db.
const FLAT_MAJOR_TONICS: [PitchClass; 5] = [5, 10, 3, 8, 1];

/// Pitch classes of `root`'s scale in degree order.
///
/// Empty when the vocabulary has no entry for `key_type`.
pub fn generate_key_pitch_classes(root: PitchClass, key_type: KeyType, keys: &KeyVocabulary) -> Vec<PitchClass> {
    let Some(spec) = keys.get(key_type) else {
        log::debug!(target: "theory", "key type {} not in vocabulary", key_type.key());
        return Vec::new();
    };
    let root = root % 12;
    spec.intervals.iter().map(|&iv| (root + iv) % 12).collect()
}

pub fn is_pitch_class_in_key(pitch_class: PitchClass, key: &Key, keys: &KeyVocabulary) -> bool {
    generate_key_pitch_classes(key.root, key.key_type, keys).contains(&(pitch_class % 12))
}

/// Whether notes in this key read better with flats.
///
/// Modes and minor scales follow the major key that shares their signature,
/// so D dorian (C major) uses sharps and G minor (Bb major) uses flats.
/// F# major is written with sharps.
pub fn should_use_flats(root: PitchClass, key_type: KeyType) -> bool {
    let major_tonic = (root % 12 + key_type.relative_major_offset()) % 12;
    FLAT_MAJOR_TONICS.contains(&major_tonic)
}

/// `"Bb Major"`, `"F# Dorian"`, spelled per [`should_use_flats`].
pub fn key_name(key: &Key) -> String {
    let tonic = Note::for_pitch(key.root as i32, should_use_flats(key.root, key.key_type));
    format!("{} {}", tonic.name(), key.key_type.name())
}

/// A key consistent with a set of pitch classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyMatch {
    pub key: Key,
    pub name: String,
    /// Higher is better: 2 when the first note is the tonic, 1 when the
    /// tonic is among the notes, 0 otherwise.
    pub score: i32,
}

/// Keys whose scale contains every given pitch class, best first.
///
/// Tonics are tried starting from the notes themselves in the order given,
/// then the remaining pitch classes upward from C. Within a tonic the
/// vocabulary order decides, and sorting by score is stable.
pub fn detect_keys(pitch_classes: &[PitchClass], keys: &KeyVocabulary) -> Vec<KeyMatch> {
    let mut pcs: Vec<PitchClass> = Vec::new();
    for &pc in pitch_classes {
        let pc = pc % 12;
        if !pcs.contains(&pc) {
            pcs.push(pc);
        }
    }
    if pcs.is_empty() {
        return Vec::new();
    }

    let tonics = pcs
        .iter()
        .copied()
        .chain((0..12).filter(|pc| !pcs.contains(pc)));

    let mut found = Vec::new();
    for tonic in tonics {
        for spec in keys.iter() {
            let key = Key::new(tonic, spec.key_type);
            let scale = generate_key_pitch_classes(tonic, spec.key_type, keys);
            if !pcs.iter().all(|pc| scale.contains(pc)) {
                continue;
            }
            let score = if pcs[0] == tonic {
                2
            } else if pcs.contains(&tonic) {
                1
            } else {
                0
            };
            found.push(KeyMatch {
                name: key_name(&key),
                key,
                score,
            });
        }
    }
    found.sort_by(|a, b| b.score.cmp(&a.score));
    found
}

//! Choosing one clone per note so chords and melodies form compact shapes.
//!
//! Three strategies:
//! - nearest: greedy Manhattan-distance walk from note to note
//! - explicit: the caller names a clone index for every note
//! - stacked: pitch classes stacked upward from a root near octave 3, used to
//!   order chord tones for display

use serde::Serialize;

use isokey_types::pitch::{octave_of, pitch_class_of};
use isokey_types::{Coord, Pitch, PitchClass, TheoryError};

use crate::lattice::{CloneCoord, Lattice};

/// Octave the stacked root is placed in when the grid reaches it.
pub const STACK_ROOT_OCTAVE: i32 = 3;

/// Pitch distance counts this many times more than physical distance when
/// stacking.
pub const STACK_PITCH_WEIGHT: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub pitch: Pitch,
    pub coord: Coord,
    pub clone_index: usize,
}

impl Placement {
    fn from_clone(pitch: Pitch, clone: &CloneCoord) -> Self {
        Self {
            pitch,
            coord: clone.coord,
            clone_index: clone.clone_index,
        }
    }
}

/// Non-fatal problems met while placing an explicit voicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VoicingWarning {
    /// Requested clone does not exist; `used` was placed instead.
    MissingClone {
        pitch: Pitch,
        requested: usize,
        used: usize,
    },
    /// The pitch has no clone on the grid and was left out.
    Unplaceable { pitch: Pitch },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Voicing {
    pub placements: Vec<Placement>,
    pub warnings: Vec<VoicingWarning>,
}

/// Greedy nearest-clone voicing.
///
/// `preferred[i]`, when present and available, pins note `i` to that clone
/// index. Otherwise the first placed note takes its first clone and every
/// later note takes the clone closest (Manhattan) to the note placed just
/// before it; ties go to the lower clone index. Pitches without clones are
/// skipped.
pub fn place_nearest(pitches: &[Pitch], preferred: &[Option<usize>], lattice: &Lattice) -> Vec<Placement> {
    let mut placed: Vec<Placement> = Vec::with_capacity(pitches.len());
    for (i, &pitch) in pitches.iter().enumerate() {
        let clones = lattice.clone_coordinates(pitch);
        let wanted = preferred.get(i).copied().flatten();
        let chosen = wanted
            .and_then(|idx| clones.iter().find(|c| c.clone_index == idx))
            .or_else(|| match placed.last() {
                None => clones.first(),
                Some(prev) => clones.iter().min_by_key(|c| c.coord.manhattan(prev.coord)),
            });
        match chosen {
            Some(clone) => placed.push(Placement::from_clone(pitch, clone)),
            None => log::debug!(target: "voicing", "no clone for pitch {}, skipped", pitch),
        }
    }
    placed
}

/// Voicing with a caller-chosen clone index per note.
///
/// The two slices must have equal length. A missing clone index falls back to
/// the note's first clone and is reported as a warning.
pub fn place_with_indices(
    pitches: &[Pitch],
    indices: &[usize],
    lattice: &Lattice,
) -> Result<Voicing, TheoryError> {
    if pitches.len() != indices.len() {
        return Err(TheoryError::LengthMismatch {
            pitches: pitches.len(),
            indices: indices.len(),
        });
    }

    let mut voicing = Voicing::default();
    for (&pitch, &requested) in pitches.iter().zip(indices) {
        let clones = lattice.clone_coordinates(pitch);
        if let Some(clone) = clones.iter().find(|c| c.clone_index == requested) {
            voicing.placements.push(Placement::from_clone(pitch, clone));
            continue;
        }
        match clones.first() {
            Some(fallback) => {
                log::warn!(
                    target: "voicing",
                    "pitch {} has no clone {}, using clone {}",
                    pitch,
                    requested,
                    fallback.clone_index
                );
                voicing.warnings.push(VoicingWarning::MissingClone {
                    pitch,
                    requested,
                    used: fallback.clone_index,
                });
                voicing.placements.push(Placement::from_clone(pitch, fallback));
            }
            None => {
                log::warn!(target: "voicing", "pitch {} is not on the grid", pitch);
                voicing.warnings.push(VoicingWarning::Unplaceable { pitch });
            }
        }
    }
    Ok(voicing)
}

/// Every cell on the grid sounding `pitch_class`, by ascending pitch then
/// clone index.
fn pitch_class_candidates(pitch_class: PitchClass, lattice: &Lattice) -> Vec<Placement> {
    lattice
        .all_pitches()
        .into_iter()
        .filter(|&p| pitch_class_of(p) == pitch_class)
        .flat_map(|p| {
            lattice
                .clone_coordinates(p)
                .into_iter()
                .map(move |c| Placement::from_clone(p, &c))
        })
        .collect()
}

/// Stack chord tones upward from the root.
///
/// The root goes to the first cell in octave 3, or to its lowest cell when
/// octave 3 is off the grid. Each later tone goes to the cell above the
/// previous pitch minimising `2 * pitch distance + Manhattan distance`; when
/// no higher cell exists the tone drops to its lowest cell, so the result is
/// not always ascending.
pub fn stack_chord(pitch_classes: &[PitchClass], lattice: &Lattice) -> Vec<Placement> {
    let mut placed: Vec<Placement> = Vec::with_capacity(pitch_classes.len());
    for &pc in pitch_classes {
        let candidates = pitch_class_candidates(pc % 12, lattice);
        let chosen = match placed.last() {
            None => candidates
                .iter()
                .find(|c| octave_of(c.pitch) == STACK_ROOT_OCTAVE)
                .or_else(|| candidates.first()),
            Some(prev) => candidates
                .iter()
                .filter(|c| c.pitch > prev.pitch)
                .min_by_key(|c| {
                    STACK_PITCH_WEIGHT * (c.pitch - prev.pitch) + c.coord.manhattan(prev.coord)
                })
                .or_else(|| candidates.first()),
        };
        match chosen {
            Some(p) => placed.push(*p),
            None => log::debug!(target: "voicing", "pitch class {} not on the grid", pc),
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice() -> Lattice {
        Lattice::new(36, 12, 8)
    }

    fn coords(placements: &[Placement]) -> Vec<(i32, i32)> {
        placements.iter().map(|p| (p.coord.x, p.coord.y)).collect()
    }

    #[test]
    fn nearest_starts_at_first_clone() {
        let placed = place_nearest(&[48, 52, 55], &[], &lattice());
        assert_eq!(coords(&placed), vec![(3, 0), (4, 0), (4, 1)]);
        assert_eq!(placed[0].clone_index, 0);
    }

    #[test]
    fn nearest_follows_preferred_root() {
        let placed = place_nearest(&[48, 52, 55], &[Some(1)], &lattice());
        assert_eq!(coords(&placed), vec![(0, 4), (1, 4), (1, 5)]);
    }

    #[test]
    fn nearest_ignores_unavailable_preference() {
        let placed = place_nearest(&[48], &[Some(7)], &lattice());
        assert_eq!(coords(&placed), vec![(3, 0)]);
    }

    #[test]
    fn nearest_skips_unreachable() {
        let placed = place_nearest(&[48, 37, 52], &[], &lattice());
        let pitches: Vec<Pitch> = placed.iter().map(|p| p.pitch).collect();
        assert_eq!(pitches, vec![48, 52]);
    }

    #[test]
    fn explicit_indices() {
        let voicing = place_with_indices(&[48, 52], &[1, 1], &lattice()).unwrap();
        assert_eq!(coords(&voicing.placements), vec![(0, 4), (1, 4)]);
        assert!(voicing.warnings.is_empty());
    }

    #[test]
    fn explicit_missing_clone_falls_back() {
        let voicing = place_with_indices(&[48, 52], &[1, 5], &lattice()).unwrap();
        assert_eq!(coords(&voicing.placements), vec![(0, 4), (4, 0)]);
        assert_eq!(
            voicing.warnings,
            vec![VoicingWarning::MissingClone {
                pitch: 52,
                requested: 5,
                used: 0
            }]
        );
    }

    #[test]
    fn explicit_unplaceable_pitch() {
        let voicing = place_with_indices(&[37], &[0], &lattice()).unwrap();
        assert!(voicing.placements.is_empty());
        assert_eq!(voicing.warnings, vec![VoicingWarning::Unplaceable { pitch: 37 }]);
    }

    #[test]
    fn explicit_length_mismatch() {
        let err = place_with_indices(&[48, 52, 55], &[0, 0], &lattice()).unwrap_err();
        assert_eq!(
            err,
            TheoryError::LengthMismatch {
                pitches: 3,
                indices: 2
            }
        );
    }

    #[test]
    fn stack_c_major_from_octave_three() {
        let placed = stack_chord(&[0, 4, 7], &lattice());
        let pitches: Vec<Pitch> = placed.iter().map(|p| p.pitch).collect();
        assert_eq!(pitches, vec![48, 52, 55]);
        assert_eq!(coords(&placed), vec![(3, 0), (4, 0), (4, 1)]);
    }

    #[test]
    fn stack_is_ascending_when_room() {
        let placed = stack_chord(&[7, 11, 2, 5], &lattice());
        assert!(placed.windows(2).all(|w| w[0].pitch < w[1].pitch));
        assert_eq!(octave_of(placed[0].pitch), 3);
    }

    #[test]
    fn stack_falls_back_to_lowest() {
        // Tiny grid: 36..=53, so G3 is missing and nothing C sits above G2.
        let small = Lattice::new(36, 3, 4);
        let placed = stack_chord(&[7, 0], &small);
        let pitches: Vec<Pitch> = placed.iter().map(|p| p.pitch).collect();
        assert_eq!(pitches, vec![43, 36]);
    }
}

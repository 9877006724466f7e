//! Chord-button placement around a tonic.
//!
//! Chord buttons for the twelve chromatic degrees are not laid out with the
//! raw 4/3 lattice walk; instead a fixed table of small offsets keeps every
//! degree within one step of the tonic so common progressions stay under
//! the hand. Each offset still lands on the right pitch class.

use isokey_types::pitch::validate_pitch;
use isokey_types::{Coord, PitchClass};

use crate::lattice::{Lattice, OCTAVE_COLUMNS};

/// Octave the tonic rows are measured from.
pub const BASE_TONIC_OCTAVE: i32 = 3;

/// Offsets from the tonic for chromatic steps 0..=11.
pub const CHROMATIC_OFFSETS: [(i32, i32); 12] = [
    (0, 0),   // I
    (1, -1),  // bII
    (-1, 2),  // II
    (0, 1),   // bIII
    (1, 0),   // III
    (2, -1),  // IV
    (0, 2),   // #IV
    (1, 1),   // V
    (2, 0),   // bVI
    (0, -1),  // VI, an octave down
    (1, -2),  // bVII, an octave down
    (-1, 1),  // VII, an octave down
];

/// Rows per octave when a position has to be retried lower on the grid.
const RETRY_ROWS: i32 = 4;

/// Position of chromatic step `step` relative to `base`.
///
/// Off-grid results are retried four rows down; if that is off-grid too the
/// tonic position itself is returned.
pub fn chromatic_position(base: Coord, step: usize, lattice: &Lattice) -> Coord {
    let (dx, dy) = CHROMATIC_OFFSETS[step % 12];
    let pos = base.offset(dx, dy);
    if lattice.contains(pos) {
        return pos;
    }
    let retry = pos.offset(0, RETRY_ROWS);
    if lattice.contains(retry) {
        return retry;
    }
    log::debug!(target: "layout", "step {} from {} is off the grid, using tonic", step, base);
    base
}

/// Positions of all twelve chromatic degrees.
pub fn chromatic_row(base: Coord, lattice: &Lattice) -> [Coord; 12] {
    std::array::from_fn(|step| chromatic_position(base, step, lattice))
}

/// Tonic cell for `octave`, given the tonic cell in octave 3.
pub fn tonic_for_octave(base_octave3: Coord, octave: i32) -> Coord {
    base_octave3.offset(OCTAVE_COLUMNS * (octave - BASE_TONIC_OCTAVE), 0)
}

/// Tonic cells for several octaves, e.g. `[3, 4, 5]`.
pub fn tonic_rows(base_octave3: Coord, octaves: &[i32]) -> Vec<(i32, Coord)> {
    octaves
        .iter()
        .map(|&o| (o, tonic_for_octave(base_octave3, o)))
        .collect()
}

/// First cell holding the tonic in `octave`, if the grid reaches it.
pub fn tonic_coordinate(root: PitchClass, octave: i32, lattice: &Lattice) -> Option<Coord> {
    let pitch = octave
        .checked_add(1)
        .and_then(|o| o.checked_mul(12))
        .and_then(|v| v.checked_add((root % 12) as i32))?;
    let pitch = validate_pitch(pitch).ok()?;
    lattice.first_clone(pitch).map(|c| c.coord)
}

//! Pitch <-> coordinate transform over the isomorphic lattice.
//!
//! A cell's pitch is `origin + 4x + 3y`: one step right is a major third,
//! one step down is a minor third. Because `4*(-3) + 3*4 == 0`, the vector
//! (-3, +4) is a period of the lattice and walking along it from one cell
//! visits every other cell with the same pitch (its "clones").
//!
//! Clone lookup never scans the grid. A 12-entry table maps each semitone
//! within the octave to the smallest non-negative cell reaching it; the first
//! clone is that cell shifted right by whole octaves (3 columns = 12
//! semitones), and the rest follow by stepping (-3, +4).

use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use isokey_types::pitch::{validate_pitch, DEFAULT_ORIGIN_PITCH};
use isokey_types::{Coord, Pitch};

/// Semitones per column.
pub const X_STEP: i32 = 4;
/// Semitones per row.
pub const Y_STEP: i32 = 3;
/// Displacement between consecutive clones of the same pitch.
pub const CLONE_STEP: (i32, i32) = (-3, 4);
/// Columns spanning one octave.
pub const OCTAVE_COLUMNS: i32 = 3;

/// Canonical cell for a semitone-in-octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseCoord {
    pub x: i32,
    pub y: i32,
    /// 1 when `4x + 3y` at this cell already spans an octave.
    pub octave_offset: i32,
}

pub fn total_semitones(x: i32, y: i32) -> i32 {
    X_STEP * x + Y_STEP * y
}

/// Semitone (0..12) -> base cell with `x` in 0..3 and `y` in 0..4.
///
/// The 12 cells of that box hit the 12 residues exactly once, so the table
/// is a bijection.
pub fn base_coords() -> &'static [BaseCoord; 12] {
    static TABLE: OnceLock<[BaseCoord; 12]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [BaseCoord {
            x: 0,
            y: 0,
            octave_offset: 0,
        }; 12];
        for x in 0..3 {
            for y in 0..4 {
                let total = total_semitones(x, y);
                table[(total % 12) as usize] = BaseCoord {
                    x,
                    y,
                    octave_offset: total / 12,
                };
            }
        }
        table
    })
}

/// One member of a clone set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CloneCoord {
    pub coord: Coord,
    /// Position along the (-3, +4) walk; always `coord.y / 4`.
    pub clone_index: usize,
}

/// Explicit lattice parameters: the pitch at (0, 0) and the grid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lattice {
    pub origin_pitch: Pitch,
    pub width: i32,
    pub height: i32,
}

impl Lattice {
    pub fn new(origin_pitch: Pitch, width: i32, height: i32) -> Self {
        Self {
            origin_pitch,
            width,
            height,
        }
    }

    pub fn with_default_origin(width: i32, height: i32) -> Self {
        Self::new(DEFAULT_ORIGIN_PITCH, width, height)
    }

    /// Pitch sounding at `coord`. Results beyond `i32` saturate, which keeps
    /// them outside the MIDI range.
    pub fn pitch_at(&self, coord: Coord) -> Pitch {
        let exact = i64::from(self.origin_pitch)
            + i64::from(X_STEP) * i64::from(coord.x)
            + i64::from(Y_STEP) * i64::from(coord.y);
        Pitch::try_from(exact).unwrap_or(if exact < 0 { Pitch::MIN } else { Pitch::MAX })
    }

    /// Pitch and clone index of a cell. Clone index comes from the y band.
    pub fn pitch_and_clone_at(&self, coord: Coord) -> (Pitch, usize) {
        (
            self.pitch_at(coord),
            coord.y.div_euclid(4).max(0) as usize,
        )
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    /// Every in-bounds cell holding `pitch`, in clone-index order.
    ///
    /// Returns an empty Vec for pitches outside the MIDI range or unreachable
    /// on this grid, and for an origin outside the MIDI range.
    pub fn clone_coordinates(&self, pitch: Pitch) -> Vec<CloneCoord> {
        if validate_pitch(self.origin_pitch).is_err() {
            log::debug!(target: "lattice", "origin {} outside MIDI range", self.origin_pitch);
            return Vec::new();
        }
        if validate_pitch(pitch).is_err() {
            log::debug!(target: "lattice", "pitch {} outside MIDI range", pitch);
            return Vec::new();
        }

        let offset = pitch - self.origin_pitch;
        let semitone = offset.rem_euclid(12) as usize;
        let octaves = offset.div_euclid(12);
        let base = base_coords()[semitone];

        let mut coord = Coord::new(
            base.x + (octaves - base.octave_offset) * OCTAVE_COLUMNS,
            base.y,
        );
        let mut clones = Vec::new();
        let mut clone_index = 0;
        while coord.x >= 0 && coord.y < self.height {
            // x only shrinks along the walk, so cells past the right edge may
            // still be followed by in-bounds clones.
            if coord.x < self.width {
                clones.push(CloneCoord { coord, clone_index });
            }
            coord = coord.offset(CLONE_STEP.0, CLONE_STEP.1);
            clone_index += 1;
        }

        if clones.is_empty() {
            log::debug!(
                target: "lattice",
                "pitch {} unreachable on {}x{} grid from origin {}",
                pitch,
                self.width,
                self.height,
                self.origin_pitch
            );
        }
        clones
    }

    pub fn first_clone(&self, pitch: Pitch) -> Option<CloneCoord> {
        self.clone_coordinates(pitch).into_iter().next()
    }

    /// Row-major iteration over all cells.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// Sorted distinct MIDI pitches present on the grid.
    pub fn all_pitches(&self) -> Vec<Pitch> {
        self.coords()
            .map(|c| self.pitch_at(c))
            .filter(|&p| validate_pitch(p).is_ok())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

pub fn clone_coordinates(pitch: Pitch, origin_pitch: Pitch, width: i32, height: i32) -> Vec<CloneCoord> {
    Lattice::new(origin_pitch, width, height).clone_coordinates(pitch)
}

pub fn pitch_and_clone_from_coord(coord: Coord, origin_pitch: Pitch) -> (Pitch, usize) {
    // Bounds do not affect the formula.
    Lattice::new(origin_pitch, 0, 0).pitch_and_clone_at(coord)
}

pub fn all_grid_pitches(origin_pitch: Pitch, width: i32, height: i32) -> Vec<Pitch> {
    Lattice::new(origin_pitch, width, height).all_pitches()
}

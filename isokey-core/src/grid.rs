//! The keyboard grid: a dense array of cells over a [`Lattice`].
//!
//! Each cell's pitch, spelling and octave are derived once when the grid is
//! built (or when the origin or accidental preference changes). The only
//! field callers mutate afterwards is `active`, which the UI layer flips as
//! buttons are pressed; reading the active cells back is how a front-end
//! feeds the chord engine.

use serde::Serialize;

use isokey_types::pitch::{octave_of, validate_pitch, MAX_PITCH, MIN_PITCH};
use isokey_types::{Coord, Note, Pitch, TheoryError, DEFAULT_ORIGIN_PITCH, DEFAULT_USE_FLATS};

use crate::lattice::Lattice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub coord: Coord,
    pub pitch: Pitch,
    pub note: Note,
    pub octave: i32,
    pub active: bool,
}

impl Cell {
    /// False for cells whose pitch falls outside 0..=127 on large grids.
    pub fn is_playable(&self) -> bool {
        (MIN_PITCH..=MAX_PITCH).contains(&self.pitch)
    }
}

/// Origin pitch and how it is spelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridConfiguration {
    pub origin_pitch: Pitch,
    pub origin_note: String,
}

#[derive(Debug, Clone)]
pub struct Grid {
    lattice: Lattice,
    use_flats: bool,
    /// Indexed as `cells[y][x]`.
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(width: i32, height: i32, origin_pitch: Pitch) -> Result<Self, TheoryError> {
        if width <= 0 || height <= 0 {
            return Err(TheoryError::invalid(format!(
                "grid dimensions {}x{} must be positive",
                width, height
            )));
        }
        validate_pitch(origin_pitch)?;
        let mut grid = Grid {
            lattice: Lattice::new(origin_pitch, width, height),
            use_flats: DEFAULT_USE_FLATS,
            cells: Vec::new(),
        };
        grid.rebuild_cells();
        Ok(grid)
    }

    pub fn with_default_origin(width: i32, height: i32) -> Result<Self, TheoryError> {
        Self::new(width, height, DEFAULT_ORIGIN_PITCH)
    }

    fn rebuild_cells(&mut self) {
        let lattice = self.lattice;
        let use_flats = self.use_flats;
        let previous = std::mem::take(&mut self.cells);
        self.cells = (0..lattice.height)
            .map(|y| {
                (0..lattice.width)
                    .map(|x| {
                        let coord = Coord::new(x, y);
                        let pitch = lattice.pitch_at(coord);
                        let active = previous
                            .get(y as usize)
                            .and_then(|row| row.get(x as usize))
                            .is_some_and(|c| c.active);
                        Cell {
                            coord,
                            pitch,
                            note: Note::for_pitch(pitch, use_flats),
                            octave: octave_of(pitch),
                            active,
                        }
                    })
                    .collect()
            })
            .collect();
    }

    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.lattice.width, self.lattice.height)
    }

    pub fn origin_pitch(&self) -> Pitch {
        self.lattice.origin_pitch
    }

    pub fn use_flats(&self) -> bool {
        self.use_flats
    }

    pub fn configuration(&self) -> GridConfiguration {
        GridConfiguration {
            origin_pitch: self.lattice.origin_pitch,
            origin_note: Note::for_pitch(self.lattice.origin_pitch, self.use_flats)
                .name()
                .to_string(),
        }
    }

    /// Move the whole keyboard to a new origin. Active flags stay on their cells.
    pub fn set_origin_pitch(&mut self, origin_pitch: Pitch) -> Result<(), TheoryError> {
        validate_pitch(origin_pitch)?;
        self.lattice.origin_pitch = origin_pitch;
        self.rebuild_cells();
        Ok(())
    }

    pub fn set_use_flats(&mut self, use_flats: bool) {
        if self.use_flats != use_flats {
            self.use_flats = use_flats;
            self.rebuild_cells();
        }
    }

    pub fn cell_at(&self, coord: Coord) -> Option<&Cell> {
        if !self.lattice.contains(coord) {
            return None;
        }
        self.cells
            .get(coord.y as usize)
            .and_then(|row| row.get(coord.x as usize))
    }

    /// All cells sounding `pitch`, in clone-index order.
    pub fn cells_for_pitch(&self, pitch: Pitch) -> Vec<&Cell> {
        self.lattice
            .clone_coordinates(pitch)
            .iter()
            .filter_map(|c| self.cell_at(c.coord))
            .collect()
    }

    /// Returns false when the coordinate is off the grid.
    pub fn set_active(&mut self, coord: Coord, active: bool) -> bool {
        if !self.lattice.contains(coord) {
            return false;
        }
        match self
            .cells
            .get_mut(coord.y as usize)
            .and_then(|row| row.get_mut(coord.x as usize))
        {
            Some(cell) => {
                cell.active = active;
                true
            }
            None => false,
        }
    }

    pub fn clear_active(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.active = false;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// Sorted distinct pitches of active, playable cells.
    pub fn active_pitches(&self) -> Vec<Pitch> {
        let mut pitches: Vec<Pitch> = self
            .iter()
            .filter(|c| c.active && c.is_playable())
            .map(|c| c.pitch)
            .collect();
        pitches.sort_unstable();
        pitches.dedup();
        pitches
    }
}

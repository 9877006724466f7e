//! # isokey-types
//!
//! Shared type definitions for the isokey isomorphic keyboard.
//! Pitch arithmetic, chord and key vocabularies, and the error taxonomy live
//! here so that front-ends can depend on them without pulling in the lattice
//! and recognition engine from isokey-core.

pub mod chord;
pub mod error;
pub mod key;
pub mod pitch;

pub use chord::{ChordMatch, ChordType, ChordTypeSpec, ChordVocabulary};
pub use error::TheoryError;
pub use key::{Key, KeySpec, KeyType, KeyVocabulary};
pub use pitch::{Note, Pitch, PitchClass, DEFAULT_ORIGIN_PITCH, DEFAULT_USE_FLATS};

/// A lattice cell position. `x` steps by major thirds, `y` by minor thirds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// `|dx| + |dy|` between two cells.
    pub fn manhattan(self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

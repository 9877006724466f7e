//! Error taxonomy shared by every isokey crate.

use std::fmt;

/// Failure from a music-theory or lattice operation.
///
/// `InvalidInput` and `NotFound` describe ordinary musical edge cases and are
/// usually surfaced as empty results by higher-level APIs. `LengthMismatch`
/// is a caller contract violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TheoryError {
    /// Pitch, pitch class, octave or note name outside its domain.
    InvalidInput(String),
    /// No clone coordinate, chord or key matched.
    NotFound(String),
    /// Parallel pitch and clone-index lists of different lengths.
    LengthMismatch { pitches: usize, indices: usize },
}

impl TheoryError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl fmt::Display for TheoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Self::NotFound(msg) => write!(f, "not found: {}", msg),
            Self::LengthMismatch { pitches, indices } => write!(
                f,
                "length mismatch: {} pitches but {} clone indices",
                pitches, indices
            ),
        }
    }
}

impl std::error::Error for TheoryError {}

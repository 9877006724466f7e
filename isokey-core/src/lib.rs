//! # isokey-core
//!
//! Engine for an isomorphic keyboard: the pitch/coordinate lattice, clone
//! voicing, chord-button layout, and chord/key recognition. No UI and no
//! audio; front-ends feed in pitches or note names and read back coordinates
//! and chord names.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use isokey_core::config::Config;
//! use isokey_core::theory::{detect_chord_from_pitches, roman_numeral};
//! use isokey_types::{Coord, Key, KeyType, KeyVocabulary};
//!
//! // 1. Build the grid from config (embedded defaults + user override)
//! let config = Config::load();
//! let mut grid = config.build_grid()?;
//!
//! // 2. Press some buttons
//! grid.set_active(Coord::new(3, 0), true);
//! grid.set_active(Coord::new(4, 0), true);
//! grid.set_active(Coord::new(4, 1), true);
//!
//! // 3. Name what is sounding
//! let vocab = config.chord_vocabulary();
//! let matches = detect_chord_from_pitches(&grid.active_pitches(), &vocab, grid.use_flats());
//! let key = Key::new(0, KeyType::Major);
//! let numeral = roman_numeral(0, matches[0].chord_type, &key, &KeyVocabulary::standard());
//! ```
//!
//! ## Module Overview
//!
//! - [`lattice`]: `pitch = origin + 4x + 3y`, clone enumeration, grid pitch sets
//! - [`grid`]: `Grid` of cells with spelling, octave and active flags
//! - [`voicing`]: choosing one clone per note (nearest, explicit, stacked)
//! - [`layout`]: chord-button offsets around a tonic
//! - [`theory`]: chord detection, key utilities, Roman numerals, diatonic chords
//! - [`config`]: TOML configuration loading (embedded + user override)

pub mod config;
pub mod grid;
pub mod lattice;
pub mod layout;
pub mod theory;
pub mod voicing;

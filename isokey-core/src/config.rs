use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use isokey_types::pitch::validate_pitch;
use isokey_types::{ChordType, ChordVocabulary, Pitch, TheoryError, DEFAULT_ORIGIN_PITCH, DEFAULT_USE_FLATS};

use crate::grid::Grid;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

pub const DEFAULT_GRID_WIDTH: i32 = 12;
pub const DEFAULT_GRID_HEIGHT: i32 = 8;

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    grid: GridConfig,
    #[serde(default)]
    detection: DetectionConfig,
}

#[derive(Deserialize, Default)]
struct GridConfig {
    width: Option<i32>,
    height: Option<i32>,
    origin_pitch: Option<Pitch>,
    use_flats: Option<bool>,
}

#[derive(Deserialize, Default)]
struct DetectionConfig {
    commonness: Option<BTreeMap<String, i32>>,
    disabled: Option<Vec<String>>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "could not read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "malformed config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// Grid defaults after merging and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSettings {
    pub width: i32,
    pub height: i32,
    pub origin_pitch: Pitch,
    pub use_flats: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            origin_pitch: DEFAULT_ORIGIN_PITCH,
            use_flats: DEFAULT_USE_FLATS,
        }
    }
}

pub struct Config {
    grid: GridConfig,
    detection: DetectionConfig,
}

impl Config {
    /// Embedded defaults merged with the user's config file, if any.
    ///
    /// Problems with the user file are logged and the defaults kept.
    pub fn load() -> Self {
        let mut base = embedded();
        if let Some(path) = user_config_path() {
            if path.exists() {
                match read_file(&path) {
                    Ok(user) => merge(&mut base, user),
                    Err(e) => log::warn!(target: "config", "ignoring {}", e),
                }
            }
        }
        Self::from_file(base)
    }

    /// Embedded defaults merged with the file at `path`.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut base = embedded();
        merge(&mut base, read_file(path)?);
        Ok(Self::from_file(base))
    }

    /// Embedded defaults only.
    pub fn builtin() -> Self {
        Self::from_file(embedded())
    }

    fn from_file(file: ConfigFile) -> Self {
        Config {
            grid: file.grid,
            detection: file.detection,
        }
    }

    pub fn grid_settings(&self) -> GridSettings {
        let fallback = GridSettings::default();
        GridSettings {
            width: positive_or(self.grid.width, "width", fallback.width),
            height: positive_or(self.grid.height, "height", fallback.height),
            origin_pitch: match self.grid.origin_pitch.map(validate_pitch) {
                Some(Ok(p)) => p,
                Some(Err(e)) => {
                    log::warn!(target: "config", "grid.origin_pitch: {}", e);
                    fallback.origin_pitch
                }
                None => fallback.origin_pitch,
            },
            use_flats: self.grid.use_flats.unwrap_or(fallback.use_flats),
        }
    }

    /// Standard vocabulary with configured weights applied and disabled
    /// chord types removed. Unknown chord-type keys are logged and skipped.
    pub fn chord_vocabulary(&self) -> ChordVocabulary {
        let mut vocab = ChordVocabulary::standard();
        if let Some(weights) = &self.detection.commonness {
            for (key, &weight) in weights {
                match parse_chord_type(key) {
                    Some(t) => {
                        vocab.set_commonness(t, weight);
                    }
                    None => log::warn!(target: "config", "unknown chord type {:?} in detection.commonness", key),
                }
            }
        }
        for key in self.detection.disabled.iter().flatten() {
            match parse_chord_type(key) {
                Some(t) => vocab.remove(t),
                None => log::warn!(target: "config", "unknown chord type {:?} in detection.disabled", key),
            }
        }
        vocab
    }

    pub fn build_grid(&self) -> Result<Grid, TheoryError> {
        let settings = self.grid_settings();
        let mut grid = Grid::new(settings.width, settings.height, settings.origin_pitch)?;
        grid.set_use_flats(settings.use_flats);
        Ok(grid)
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("isokey").join("config.toml"))
}

fn embedded() -> ConfigFile {
    toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
        log::error!(target: "config", "embedded config.toml is malformed: {}", e);
        ConfigFile::default()
    })
}

fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn merge(base: &mut ConfigFile, user: ConfigFile) {
    merge_grid(&mut base.grid, user.grid);
    merge_detection(&mut base.detection, user.detection);
}

fn merge_grid(base: &mut GridConfig, user: GridConfig) {
    if user.width.is_some() {
        base.width = user.width;
    }
    if user.height.is_some() {
        base.height = user.height;
    }
    if user.origin_pitch.is_some() {
        base.origin_pitch = user.origin_pitch;
    }
    if user.use_flats.is_some() {
        base.use_flats = user.use_flats;
    }
}

fn merge_detection(base: &mut DetectionConfig, user: DetectionConfig) {
    // Weights merge per chord type; the disabled list is replaced whole.
    if let Some(user_weights) = user.commonness {
        base.commonness
            .get_or_insert_with(BTreeMap::new)
            .extend(user_weights);
    }
    if user.disabled.is_some() {
        base.disabled = user.disabled;
    }
}

fn positive_or(value: Option<i32>, field: &str, fallback: i32) -> i32 {
    match value {
        Some(v) if v > 0 => v,
        Some(v) => {
            log::warn!(target: "config", "grid.{} must be positive, got {}", field, v);
            fallback
        }
        None => fallback,
    }
}

fn parse_chord_type(s: &str) -> Option<ChordType> {
    ChordType::from_key(s.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_embedded_config() {
        let config = Config::builtin();
        assert_eq!(config.grid_settings(), GridSettings::default());
        assert_eq!(config.chord_vocabulary(), ChordVocabulary::standard());
    }

    #[test]
    fn test_user_grid_overrides() {
        let (_dir, path) = write_config("[grid]\nwidth = 6\norigin_pitch = 48\n");
        let settings = Config::load_from_path(&path).unwrap().grid_settings();
        assert_eq!(settings.width, 6);
        assert_eq!(settings.height, DEFAULT_GRID_HEIGHT);
        assert_eq!(settings.origin_pitch, 48);
    }

    #[test]
    fn test_invalid_grid_values_fall_back() {
        let (_dir, path) = write_config("[grid]\nwidth = 0\norigin_pitch = 200\n");
        let settings = Config::load_from_path(&path).unwrap().grid_settings();
        assert_eq!(settings.width, DEFAULT_GRID_WIDTH);
        assert_eq!(settings.origin_pitch, DEFAULT_ORIGIN_PITCH);
    }

    #[test]
    fn test_detection_overrides() {
        let (_dir, path) = write_config(
            "[detection]\ndisabled = [\"power\", \"nonsense\"]\n\n[detection.commonness]\nmajor = 3\nbogus = 1\n",
        );
        let vocab = Config::load_from_path(&path).unwrap().chord_vocabulary();
        assert!(vocab.get(ChordType::Power).is_none());
        assert_eq!(vocab.get(ChordType::Major).map(|s| s.commonness), Some(3));
        assert_eq!(vocab.len(), ChordType::ALL.len() - 1);
    }

    #[test]
    fn test_build_grid_uses_flats() {
        let (_dir, path) = write_config("[grid]\nwidth = 4\nheight = 4\norigin_pitch = 37\nuse_flats = true\n");
        let grid = Config::load_from_path(&path).unwrap().build_grid().unwrap();
        assert_eq!(grid.dimensions(), (4, 4));
        assert_eq!(grid.configuration().origin_note, "Db");
    }

    #[test]
    fn test_malformed_file() {
        let (_dir, path) = write_config("[grid\nwidth = ");
        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_path(&dir.path().join("absent.toml")).err().unwrap();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_parse_chord_types() {
        assert_eq!(parse_chord_type("dom7"), Some(ChordType::Dominant7));
        assert_eq!(parse_chord_type(" major "), Some(ChordType::Major));
        assert_eq!(parse_chord_type("X"), None);
    }
}

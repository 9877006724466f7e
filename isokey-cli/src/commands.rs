//! Subcommand implementations. Each returns the text to print.

use std::fmt;

use serde::Serialize;

use isokey_core::config::Config;
use isokey_core::grid::Grid;
use isokey_core::layout::{chromatic_row, tonic_coordinate, tonic_rows, BASE_TONIC_OCTAVE};
use isokey_core::theory::{
    detect_chord_from_pitches, detect_chord_names, detect_keys, diatonic_chords,
    generate_key_pitch_classes, key_name, roman_numeral, should_use_flats,
};
use isokey_core::voicing::{place_nearest, stack_chord, Placement};
use isokey_types::pitch::{note_to_pitch, note_to_pitch_class, pitch_label, validate_pitch};
use isokey_types::{ChordMatch, ChordType, Coord, Key, KeyType, KeyVocabulary, Note, Pitch, PitchClass, TheoryError};

#[derive(Debug)]
pub enum CliError {
    Usage(String),
    Theory(TheoryError),
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Theory(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "json output: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<TheoryError> for CliError {
    fn from(e: TheoryError) -> Self {
        CliError::Theory(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

fn usage(msg: impl Into<String>) -> CliError {
    CliError::Usage(msg.into())
}

pub fn run(command: &str, args: &[String], config: &Config, json: bool) -> Result<String, CliError> {
    log::debug!("command {} {:?}", command, args);
    match command {
        "grid" => grid(config, json),
        "clones" => clones(args, config, json),
        "voice" => voice(args, config, json),
        "stack" => stack(args, config, json),
        "chord" => chord(args, config, json),
        "roman" => roman(args, json),
        "key" => key(args, config, json),
        "scales" => scales(args, json),
        "layout" => layout(args, config, json),
        other => Err(usage(format!("unknown command {:?}", other))),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// `60`, `C4`, `Eb3` or `F#-1`.
pub fn parse_pitch(s: &str) -> Result<Pitch, CliError> {
    if let Ok(n) = s.parse::<Pitch>() {
        return Ok(validate_pitch(n)?);
    }
    let split = s
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_ascii_digit() || *c == '-')
        .map(|(i, _)| i)
        .ok_or_else(|| usage(format!("{:?} is not a pitch (try 60 or C4)", s)))?;
    let (name, octave) = s.split_at(split);
    let octave: i32 = octave
        .parse()
        .map_err(|_| usage(format!("bad octave in {:?}", s)))?;
    Ok(note_to_pitch(name, octave)?)
}

/// Comma-separated pitches for `--pitches`.
pub fn parse_pitch_list(s: &str) -> Result<Vec<Pitch>, CliError> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(parse_pitch)
        .collect()
}

fn parse_key_type(s: &str) -> Result<KeyType, CliError> {
    KeyType::from_key(&s.to_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = KeyType::ALL.iter().map(|t| t.key()).collect();
        usage(format!("unknown key type {:?} (one of {})", s, known.join(", ")))
    })
}

fn parse_chord_type(s: &str) -> Result<ChordType, CliError> {
    ChordType::from_key(s).ok_or_else(|| {
        let known: Vec<&str> = ChordType::ALL.iter().map(|t| t.key()).collect();
        usage(format!("unknown chord type {:?} (one of {})", s, known.join(", ")))
    })
}

fn grid(config: &Config, json: bool) -> Result<String, CliError> {
    let grid = config.build_grid()?;
    if json {
        let cells: Vec<_> = grid.iter().collect();
        return to_json(&cells);
    }
    Ok(render_grid(&grid))
}

fn render_grid(grid: &Grid) -> String {
    let (width, height) = grid.dimensions();
    let mut out = format!(
        "{}x{} grid, origin {}\n",
        width,
        height,
        pitch_label(grid.origin_pitch(), grid.use_flats())
    );
    for y in 0..height {
        let row: Vec<String> = (0..width)
            .filter_map(|x| grid.cell_at(Coord::new(x, y)))
            .map(|cell| {
                if cell.is_playable() {
                    format!("{:>5}", pitch_label(cell.pitch, grid.use_flats()))
                } else {
                    format!("{:>5}", "-")
                }
            })
            .collect();
        out.push_str(&row.join(""));
        out.push('\n');
    }
    out.truncate(out.trim_end().len());
    out
}

fn clones(args: &[String], config: &Config, json: bool) -> Result<String, CliError> {
    let [pitch] = args else {
        return Err(usage("clones takes one pitch"));
    };
    let pitch = parse_pitch(pitch)?;
    let grid = config.build_grid()?;
    let clones = grid.lattice().clone_coordinates(pitch);
    if json {
        return to_json(&clones);
    }
    if clones.is_empty() {
        return Ok(format!("{} is not on the grid", pitch_label(pitch, grid.use_flats())));
    }
    let lines: Vec<String> = clones
        .iter()
        .map(|c| format!("clone {}: {}", c.clone_index, c.coord))
        .collect();
    Ok(lines.join("\n"))
}

fn render_placements(placements: &[Placement], use_flats: bool) -> String {
    placements
        .iter()
        .map(|p| format!("{:<4} {} (clone {})", pitch_label(p.pitch, use_flats), p.coord, p.clone_index))
        .collect::<Vec<_>>()
        .join("\n")
}

fn voice(args: &[String], config: &Config, json: bool) -> Result<String, CliError> {
    if args.is_empty() {
        return Err(usage("voice takes at least one pitch"));
    }
    let pitches = args.iter().map(|a| parse_pitch(a)).collect::<Result<Vec<_>, _>>()?;
    let grid = config.build_grid()?;
    let placed = place_nearest(&pitches, &[], &grid.lattice());
    if json {
        return to_json(&placed);
    }
    Ok(render_placements(&placed, grid.use_flats()))
}

fn stack(args: &[String], config: &Config, json: bool) -> Result<String, CliError> {
    if args.is_empty() {
        return Err(usage("stack takes at least one note"));
    }
    let pcs = args
        .iter()
        .map(|a| note_to_pitch_class(a))
        .collect::<Result<Vec<PitchClass>, _>>()?;
    let grid = config.build_grid()?;
    let placed = stack_chord(&pcs, &grid.lattice());
    if json {
        return to_json(&placed);
    }
    Ok(render_placements(&placed, grid.use_flats()))
}

fn render_matches(matches: &[ChordMatch]) -> String {
    if matches.is_empty() {
        return "no chord".to_string();
    }
    matches
        .iter()
        .map(|m| format!("{:<12} {:>3}  {}", m.display_name, m.commonness, m.chord_type.name()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn chord(args: &[String], config: &Config, json: bool) -> Result<String, CliError> {
    let mut names: Vec<&str> = Vec::new();
    let mut pitches: Option<Vec<Pitch>> = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--pitches" {
            let list = iter.next().ok_or_else(|| usage("--pitches needs a list"))?;
            pitches = Some(parse_pitch_list(list)?);
        } else {
            names.push(arg);
        }
    }

    let vocab = config.chord_vocabulary();
    let matches = match (names.is_empty(), pitches) {
        (true, None) => return Err(usage("chord takes notes or --pitches")),
        (true, Some(pitches)) => {
            detect_chord_from_pitches(&pitches, &vocab, config.grid_settings().use_flats)
        }
        (false, pitches) => detect_chord_names(&names, &vocab, pitches.as_deref())?,
    };
    if json {
        return to_json(&matches);
    }
    Ok(render_matches(&matches))
}

fn roman(args: &[String], json: bool) -> Result<String, CliError> {
    let [root, chord_type, key_root, key_type] = args else {
        return Err(usage("roman takes <root> <chord-type> <key-root> <key-type>"));
    };
    let root = note_to_pitch_class(root)?;
    let chord_type = parse_chord_type(chord_type)?;
    let key = Key::new(note_to_pitch_class(key_root)?, parse_key_type(key_type)?);
    let numeral = roman_numeral(root, chord_type, &key, &KeyVocabulary::standard())
        .ok_or_else(|| TheoryError::not_found(format!("{} not in vocabulary", key.key_type.name())))?;
    if json {
        return to_json(&numeral);
    }
    Ok(numeral)
}

#[derive(Serialize)]
struct KeyReport {
    name: String,
    notes: Vec<&'static str>,
    chords: Vec<isokey_core::theory::DiatonicChord>,
}

fn key(args: &[String], config: &Config, json: bool) -> Result<String, CliError> {
    let sevenths = args.iter().any(|a| a == "--sevenths");
    let positional: Vec<&String> = args.iter().filter(|a| *a != "--sevenths").collect();
    let [root, key_type] = positional.as_slice() else {
        return Err(usage("key takes <root> <key-type>"));
    };
    let key = Key::new(note_to_pitch_class(root)?, parse_key_type(key_type)?);
    let keys = KeyVocabulary::standard();
    let use_flats = should_use_flats(key.root, key.key_type);
    let report = KeyReport {
        name: key_name(&key),
        notes: generate_key_pitch_classes(key.root, key.key_type, &keys)
            .into_iter()
            .map(|pc| Note::for_pitch(pc as i32, use_flats).name())
            .collect(),
        chords: diatonic_chords(&key, &keys, &config.chord_vocabulary(), sevenths),
    };
    if json {
        return to_json(&report);
    }
    let mut out = format!("{}: {}", report.name, report.notes.join(" "));
    for c in &report.chords {
        out.push_str(&format!("\n  {:<6} {}", c.roman, c.chord.display_name));
    }
    Ok(out)
}

fn scales(args: &[String], json: bool) -> Result<String, CliError> {
    if args.is_empty() {
        return Err(usage("scales takes at least one note"));
    }
    let pcs = args
        .iter()
        .map(|a| note_to_pitch_class(a))
        .collect::<Result<Vec<PitchClass>, _>>()?;
    let matches = detect_keys(&pcs, &KeyVocabulary::standard());
    if json {
        return to_json(&matches);
    }
    if matches.is_empty() {
        return Ok("no key contains all of those notes".to_string());
    }
    Ok(matches.iter().map(|m| m.name.as_str()).collect::<Vec<_>>().join("\n"))
}

#[derive(Serialize)]
struct LayoutEntry {
    step: usize,
    coord: Coord,
    note: Note,
}

#[derive(Serialize)]
struct LayoutReport {
    tonics: Vec<(i32, Coord)>,
    buttons: Vec<LayoutEntry>,
}

fn layout(args: &[String], config: &Config, json: bool) -> Result<String, CliError> {
    let [tonic] = args else {
        return Err(usage("layout takes one tonic note"));
    };
    let root = note_to_pitch_class(tonic)?;
    let grid = config.build_grid()?;
    let lattice = grid.lattice();
    let base = tonic_coordinate(root, BASE_TONIC_OCTAVE, &lattice).ok_or_else(|| {
        TheoryError::not_found(format!("{}{} is not on the grid", tonic, BASE_TONIC_OCTAVE))
    })?;

    let report = LayoutReport {
        tonics: tonic_rows(base, &[3, 4, 5]),
        buttons: chromatic_row(base, &lattice)
            .iter()
            .enumerate()
            .map(|(step, &coord)| LayoutEntry {
                step,
                coord,
                note: Note::for_pitch(lattice.pitch_at(coord), grid.use_flats()),
            })
            .collect(),
    };
    if json {
        return to_json(&report);
    }
    let mut out = String::new();
    for (octave, coord) in &report.tonics {
        out.push_str(&format!("tonic octave {}: {}\n", octave, coord));
    }
    for b in &report.buttons {
        out.push_str(&format!("step {:>2}: {:<3} at {}\n", b.step, b.note.name(), b.coord));
    }
    out.truncate(out.trim_end().len());
    Ok(out)
}

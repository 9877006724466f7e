mod commands;

use std::fs::File;
use std::process::ExitCode;

use isokey_core::config::Config;

const USAGE: &str = "\
usage: isokey [--json] [-v|--verbose] <command> [args]

commands:
  grid                                   print the keyboard grid
  clones <pitch>                         cells sounding a pitch (60 or C4)
  voice <pitch>...                       nearest-clone voicing
  stack <note>...                        stack pitch classes upward from octave 3
  chord <note>... [--pitches p,p,...]    name the chord; pitches mark the bass
  roman <root> <chord-type> <key-root> <key-type>
  key <root> <key-type> [--sevenths]     scale notes and diatonic chords
  scales <note>...                       keys containing the notes
  layout <tonic>                         chord-button positions around a tonic
";

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("isokey")
        .join("isokey.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path)
        .or_else(|_| File::create(std::env::temp_dir().join("isokey.log")))
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("isokey: logging disabled: {}", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(log_level, simplelog::Config::default(), log_file) {
        eprintln!("isokey: logging disabled: {}", e);
        return;
    }

    log::info!("isokey starting (log level: {:?})", log_level);
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let json = args.iter().any(|a| a == "--json");
    init_logging(verbose);

    let rest: Vec<String> = args
        .into_iter()
        .filter(|a| a != "--verbose" && a != "-v" && a != "--json")
        .collect();
    let Some((command, command_args)) = rest.split_first() else {
        eprint!("{}", USAGE);
        return ExitCode::from(2);
    };
    if command == "help" || command == "--help" || command == "-h" {
        print!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let config = Config::load();
    match commands::run(command, command_args, &config, json) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(commands::CliError::Usage(msg)) => {
            eprintln!("isokey: {}", msg);
            eprint!("{}", USAGE);
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("{} failed: {}", command, e);
            eprintln!("isokey: {}", e);
            ExitCode::FAILURE
        }
    }
}

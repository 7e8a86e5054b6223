// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mangoes::config::{ProgressionConfig, SongFile};
use mangoes::generators::BassStyle;
use mangoes::music::PRESETS;
use mangoes::recording::MidiExporter;
use mangoes::sequencer::Composer;
use mangoes::timing::{ticks_to_duration, Meter};

fn print_usage() {
    println!("MANGOES - Procedural Melody and Bass Generator");
    println!();
    println!("Usage: mangoes [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <FILE>         Load song settings from a .yaml, .yml or .toml file");
    println!("  --tempo <BPM>           Tempo in beats per minute (default 120)");
    println!("  --bars <N>              Number of bars to generate (default 16)");
    println!("  --progression <NAME>    Built-in progression (see --list-progressions)");
    println!("  --chords \"<C1 C2 C3 C4>\" Four chord symbols, e.g. \"C G Am3 F\"");
    println!("  --bass <STYLE>          Bass rhythm: whole or alternating");
    println!("  --seed <N>              Seed the random generator for repeatable output");
    println!("  --volume <V>            Melody velocity, 21-127 (default 100)");
    println!("  --output <FILE>         File to write (default mangoes.mid)");
    println!("  --single-track          Write a Type 0 file instead of Type 1");
    println!("  --list-progressions     List built-in progressions");
    println!("  -v, --verbose           Log every bar");
    println!("  --help                  Show this help message");
}

fn print_progressions() {
    println!("Built-in progressions:");
    for preset in PRESETS.iter() {
        let (low, high) = preset.tempo_range;
        println!(
            "  {:<8} {:<24} {:<10} {}-{} BPM",
            preset.name, preset.label, preset.mood, low, high
        );
    }
}

/// Options collected from the command line
#[derive(Debug, Default)]
struct CliOptions {
    config: Option<PathBuf>,
    tempo: Option<f64>,
    bars: Option<u64>,
    progression: Option<ProgressionConfig>,
    bass: Option<BassStyle>,
    seed: Option<u64>,
    volume: Option<u8>,
    output: Option<String>,
    single_track: bool,
    verbose: bool,
    list_progressions: bool,
    help: bool,
}

fn value_for<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn parse_value<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid value for {}: {}", flag, value))
}

fn parse_args(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut i = 1;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--config" => {
                options.config = Some(PathBuf::from(value_for(args, i, flag)?));
                i += 1;
            }
            "--tempo" => {
                options.tempo = Some(parse_value(value_for(args, i, flag)?, flag)?);
                i += 1;
            }
            "--bars" => {
                options.bars = Some(parse_value(value_for(args, i, flag)?, flag)?);
                i += 1;
            }
            "--progression" => {
                let name = value_for(args, i, flag)?;
                options.progression = Some(ProgressionConfig::Preset(name.to_string()));
                i += 1;
            }
            "--chords" => {
                let list = value_for(args, i, flag)?;
                options.progression = Some(ProgressionConfig::from_symbols(list));
                i += 1;
            }
            "--bass" => {
                let value = value_for(args, i, flag)?;
                let style = BassStyle::parse(value)
                    .ok_or_else(|| anyhow!("Unknown bass style: {}", value))?;
                options.bass = Some(style);
                i += 1;
            }
            "--seed" => {
                options.seed = Some(parse_value(value_for(args, i, flag)?, flag)?);
                i += 1;
            }
            "--volume" => {
                options.volume = Some(parse_value(value_for(args, i, flag)?, flag)?);
                i += 1;
            }
            "--output" | "-o" => {
                options.output = Some(value_for(args, i, flag)?.to_string());
                i += 1;
            }
            "--single-track" => options.single_track = true,
            "--list-progressions" => options.list_progressions = true,
            "-v" | "--verbose" => options.verbose = true,
            "--help" | "-h" => options.help = true,
            other => return Err(anyhow!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(options)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Merge command-line overrides into the loaded song file
fn apply_overrides(file: &mut SongFile, options: CliOptions) {
    let song = &mut file.song;
    if let Some(tempo) = options.tempo {
        song.tempo = tempo;
    }
    if let Some(bars) = options.bars {
        song.bars = bars;
    }
    if let Some(progression) = options.progression {
        song.progression = progression;
    }
    if let Some(bass) = options.bass {
        song.bass = bass;
    }
    if options.seed.is_some() {
        song.seed = options.seed;
    }
    if let Some(volume) = options.volume {
        song.volume = volume;
    }
    if let Some(output) = options.output {
        file.output.path = output;
    }
    if options.single_track {
        file.output.single_track = true;
    }
}

fn run(options: CliOptions) -> Result<()> {
    let mut file = match &options.config {
        Some(path) => {
            info!(path = %path.display(), "Loading config");
            SongFile::load(path)?
        }
        None => SongFile::default(),
    };
    apply_overrides(&mut file, options);
    debug!(?file, "Resolved configuration");

    let settings = file.validate().context("Invalid song settings")?;
    let composer = Composer::new(settings);
    let song = composer.compose().context("Failed to generate song")?;

    let mut exporter = MidiExporter::new(song.clock.ppqn());
    exporter.set_format(file.output.format());
    exporter
        .export_song(&song, &file.output.path)
        .with_context(|| format!("Failed to write MIDI file: {}", file.output.path))?;

    let length = ticks_to_duration(
        song.melody.duration_ticks(),
        composer.settings().tempo,
        song.clock,
    );
    info!(
        path = %file.output.path,
        bars = song.bars,
        seconds = length.as_secs_f64(),
        "Wrote song"
    );
    println!(
        "Wrote {} bars of {} to {} ({:.1}s at {} BPM)",
        song.bars,
        Meter::default(),
        file.output.path,
        length.as_secs_f64(),
        composer.settings().tempo
    );
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if options.help {
        print_usage();
        return Ok(());
    }
    if options.list_progressions {
        print_progressions();
        return Ok(());
    }

    init_logging(options.verbose);
    run(options)
}

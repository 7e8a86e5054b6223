// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for mangoes.
//!
//! A song file (YAML or TOML) names the tempo, length and progression
//! of a piece. [`SongFile::validate`] turns it into the fully resolved
//! [`SongSettings`] the composer consumes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generators::{BassStyle, MelodyConfig, DEFAULT_VOLUME, MAX_VELOCITY, MIN_BASS_VOLUME};
use crate::music::chord::PROGRESSION_LENGTH;
use crate::music::{Chord, ChordProgression, Pitch, Preset};
use crate::recording::MidiFileFormat;
use crate::sequencer::SongSettings;
use crate::timing::{tempo_fits_meta_event, DEFAULT_PPQN};

/// Octave used for chord symbols that do not name one
pub const DEFAULT_SYMBOL_OCTAVE: i8 = 4;

/// Lowest chord pitch whose bass, two octaves down, is still a valid MIDI note
const LOWEST_BASS_SOURCE: Pitch = 24;

/// Coarsest resolution that still splits a quarter into two whole-tick eighths
const MIN_PPQN: u16 = 2;

/// Errors found while validating a song file
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("tempo must be between about 3.58 and 60000000 BPM, got {0}")]
    InvalidTempo(f64),
    #[error("bar count must be at least 1")]
    ZeroBars,
    #[error("volume must be between {} and {}, got {0}", MIN_BASS_VOLUME, MAX_VELOCITY)]
    InvalidVolume(u8),
    #[error("ppqn must be an even number of at least {}, got {0}", MIN_PPQN)]
    InvalidPpqn(u16),
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("unknown progression '{name}' (available: {available})")]
    UnknownPreset { name: String, available: String },
    #[error("a progression needs exactly 4 chords, got {0}")]
    ChordCount(usize),
    #[error("cannot read chord '{0}'")]
    InvalidChord(String),
    #[error("chord pitch {pitch} is too low for the bass line (lowest allowed is {lowest})")]
    BassOutOfRange { pitch: Pitch, lowest: Pitch },
    #[error("unsupported config file extension '{0}' (use .yaml, .yml or .toml)")]
    UnsupportedFormat(String),
}

/// Root configuration for a song
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SongFile {
    /// Song metadata and settings
    #[serde(default)]
    pub song: SongConfig,
    /// Melody probability overrides
    #[serde(default)]
    pub melody: MelodySection,
    /// Where and how to write the result
    #[serde(default)]
    pub output: OutputConfig,
}

impl SongFile {
    /// Load a song configuration, choosing the parser by file extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml(&contents),
            "toml" => Self::from_toml(&contents),
            other => Err(ConfigError::UnsupportedFormat(other.to_string()).into()),
        }
    }

    /// Parse a song configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a song configuration from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Check every value and resolve the progression
    pub fn validate(&self) -> Result<SongSettings, ConfigError> {
        let song = &self.song;

        if !tempo_fits_meta_event(song.tempo) {
            return Err(ConfigError::InvalidTempo(song.tempo));
        }
        if song.bars == 0 {
            return Err(ConfigError::ZeroBars);
        }
        if !(MIN_BASS_VOLUME..=MAX_VELOCITY).contains(&song.volume) {
            return Err(ConfigError::InvalidVolume(song.volume));
        }
        let ppqn = self.output.ppqn;
        if ppqn < MIN_PPQN || ppqn % 2 != 0 {
            return Err(ConfigError::InvalidPpqn(ppqn));
        }

        let progression = song.progression.resolve()?;
        let lowest = progression.lowest_pitch();
        if lowest < LOWEST_BASS_SOURCE {
            return Err(ConfigError::BassOutOfRange {
                pitch: lowest,
                lowest: LOWEST_BASS_SOURCE,
            });
        }

        Ok(SongSettings {
            tempo: song.tempo,
            bars: song.bars,
            progression,
            volume: song.volume,
            bass_style: song.bass,
            ppqn,
            seed: song.seed,
            melody: self.melody.to_config()?,
        })
    }
}

/// Song-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongConfig {
    /// Song name
    #[serde(default = "default_name")]
    pub name: String,
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// Number of bars to generate
    #[serde(default = "default_bars")]
    pub bars: u64,
    /// Preset name or four explicit chords
    #[serde(default)]
    pub progression: ProgressionConfig,
    /// Base velocity for melody notes
    #[serde(default = "default_volume")]
    pub volume: u8,
    /// Bass rhythm selection
    #[serde(default)]
    pub bass: BassStyle,
    /// RNG seed for reproducible output
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_name() -> String {
    "Untitled".to_string()
}
fn default_tempo() -> f64 {
    120.0
}
fn default_bars() -> u64 {
    16
}
fn default_volume() -> u8 {
    DEFAULT_VOLUME
}

impl Default for SongConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            tempo: default_tempo(),
            bars: default_bars(),
            progression: ProgressionConfig::default(),
            volume: default_volume(),
            bass: BassStyle::default(),
            seed: None,
        }
    }
}

/// A progression given by preset name or as four chords
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProgressionConfig {
    /// Name of a built-in progression, e.g. "cgaf"
    Preset(String),
    /// Four chords chosen one by one
    Chords(Vec<ChordSpec>),
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        ProgressionConfig::Preset("cgaf".to_string())
    }
}

impl ProgressionConfig {
    /// Parse a whitespace- or comma-separated list of chord symbols
    pub fn from_symbols(list: &str) -> Self {
        let chords = list
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| ChordSpec::Symbol(s.to_string()))
            .collect();
        ProgressionConfig::Chords(chords)
    }

    /// Turn the configuration into concrete chords
    pub fn resolve(&self) -> Result<ChordProgression, ConfigError> {
        match self {
            ProgressionConfig::Preset(name) => {
                ChordProgression::preset(name).ok_or_else(|| ConfigError::UnknownPreset {
                    name: name.clone(),
                    available: Preset::names().join(", "),
                })
            }
            ProgressionConfig::Chords(specs) => {
                if specs.len() != PROGRESSION_LENGTH {
                    return Err(ConfigError::ChordCount(specs.len()));
                }
                let mut chords = [Chord::new([0; 3]); PROGRESSION_LENGTH];
                for (out, spec) in chords.iter_mut().zip(specs) {
                    *out = spec.resolve()?;
                }
                Ok(ChordProgression::new(chords))
            }
        }
    }
}

/// One chord of a hand-picked progression
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChordSpec {
    /// Chord symbol with optional octave, e.g. "Am", "Eb3", "F#dim4"
    Symbol(String),
    /// Three explicit notes, e.g. ["C4", "E4", "G4"]
    Notes(Vec<String>),
}

impl ChordSpec {
    pub fn resolve(&self) -> Result<Chord, ConfigError> {
        match self {
            ChordSpec::Symbol(symbol) => parse_chord_symbol(symbol)
                .ok_or_else(|| ConfigError::InvalidChord(symbol.clone())),
            ChordSpec::Notes(names) => Chord::from_note_names(names)
                .ok_or_else(|| ConfigError::InvalidChord(names.join(" "))),
        }
    }
}

/// Parse a chord symbol with an optional trailing octave ("Am3", "C", "Bdim-1")
pub fn parse_chord_symbol(s: &str) -> Option<Chord> {
    let s = s.trim();
    let digits = s.len() - s.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return Chord::from_symbol(s, DEFAULT_SYMBOL_OCTAVE);
    }

    let mut split = s.len() - digits;
    if s[..split].ends_with('-') {
        split -= 1;
    }
    let octave: i8 = s[split..].parse().ok()?;
    Chord::from_symbol(&s[..split], octave)
}

/// Melody probability settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MelodySection {
    /// Chance that a slot becomes two eighth notes
    #[serde(default = "default_pair_probability")]
    pub pair_probability: f64,
    /// Chance that a slot rests, cooldown permitting
    #[serde(default = "default_rest_probability")]
    pub rest_probability: f64,
    /// Chance that an even slot is accented
    #[serde(default = "default_accent_probability")]
    pub accent_probability: f64,
}

fn default_pair_probability() -> f64 {
    MelodyConfig::default().pair_probability
}
fn default_rest_probability() -> f64 {
    MelodyConfig::default().rest_probability
}
fn default_accent_probability() -> f64 {
    MelodyConfig::default().accent_probability
}

impl Default for MelodySection {
    fn default() -> Self {
        Self {
            pair_probability: default_pair_probability(),
            rest_probability: default_rest_probability(),
            accent_probability: default_accent_probability(),
        }
    }
}

impl MelodySection {
    fn to_config(&self) -> Result<MelodyConfig, ConfigError> {
        let checks = [
            ("pair_probability", self.pair_probability),
            ("rest_probability", self.rest_probability),
            ("accent_probability", self.accent_probability),
        ];
        for (name, value) in checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }

        Ok(MelodyConfig {
            pair_probability: self.pair_probability,
            rest_probability: self.rest_probability,
            accent_probability: self.accent_probability,
            ..Default::default()
        })
    }
}

/// Output file settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// File to write
    #[serde(default = "default_output_path")]
    pub path: String,
    /// Ticks per quarter note
    #[serde(default = "default_ppqn")]
    pub ppqn: u16,
    /// Write all tracks into one chunk (Type 0) instead of one each (Type 1)
    #[serde(default)]
    pub single_track: bool,
}

fn default_output_path() -> String {
    "mangoes.mid".to_string()
}
fn default_ppqn() -> u16 {
    DEFAULT_PPQN
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            ppqn: default_ppqn(),
            single_track: false,
        }
    }
}

impl OutputConfig {
    /// MIDI file format to write
    pub fn format(&self) -> MidiFileFormat {
        if self.single_track {
            MidiFileFormat::Type0
        } else {
            MidiFileFormat::Type1
        }
    }
}

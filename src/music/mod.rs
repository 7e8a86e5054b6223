// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music data for the generators.
//!
//! This module provides note naming and the chord/progression model
//! the bar generators draw their pitches from.

pub mod chord;
pub mod note;

pub use chord::{current_chord, Chord, ChordProgression, Preset, TriadQuality, PRESETS};
pub use note::{Note, Pitch, Semitones};

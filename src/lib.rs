// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Procedural melody and bass generation over a cyclic four-chord
//! progression, written out as a Standard MIDI File.

pub mod config;
pub mod generators;
pub mod music;
pub mod recording;
pub mod sequencer;
pub mod timing;

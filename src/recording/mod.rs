// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export for generated songs.

pub mod export;

pub use export::{MidiExporter, MidiFileFormat};

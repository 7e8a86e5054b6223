// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.
//!
//! Writes generated tracks as Type 1 (one chunk per track) or Type 0
//! (all tracks merged into one chunk) MIDI files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::generators::EventKind;
use crate::sequencer::{Song, Track};
use crate::timing::{micros_per_quarter, Meter, DEFAULT_PPQN};

/// MIDI file format type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MidiFileFormat {
    /// Type 0: Single track with all channels
    Type0,
    /// Type 1: Multiple simultaneous tracks
    #[default]
    Type1,
}

/// Encoded event with an absolute tick
#[derive(Debug, Clone)]
struct MidiExportEvent {
    /// Absolute tick
    tick: u64,
    /// Event data
    data: Vec<u8>,
}

impl MidiExportEvent {
    fn encode(tick: u64, channel: u8, kind: &EventKind) -> Self {
        let channel = channel & 0x0F;
        let data = match *kind {
            EventKind::NoteOn { pitch, velocity } => {
                vec![0x90 | channel, pitch & 0x7F, velocity & 0x7F]
            }
            EventKind::NoteOff { pitch } => vec![0x80 | channel, pitch & 0x7F, 0],
            EventKind::Tempo { bpm } => {
                let microseconds = micros_per_quarter(bpm);
                vec![
                    0xFF,
                    0x51,
                    0x03,
                    ((microseconds >> 16) & 0xFF) as u8,
                    ((microseconds >> 8) & 0xFF) as u8,
                    (microseconds & 0xFF) as u8,
                ]
            }
            EventKind::TimeSignature(meter) => time_signature_data(meter),
            EventKind::EndOfTrack => vec![0xFF, 0x2F, 0x00],
        };
        Self { tick, data }
    }

    fn is_end_of_track(&self) -> bool {
        self.data.starts_with(&[0xFF, 0x2F])
    }

    fn is_meta(&self) -> bool {
        self.data.first() == Some(&0xFF)
    }
}

fn time_signature_data(meter: Meter) -> Vec<u8> {
    // Denominator is expressed as power of 2
    let denom_power = meter.denominator.max(1).trailing_zeros() as u8;
    vec![
        0xFF,
        0x58,
        0x04,
        meter.numerator,
        denom_power,
        24, // MIDI clocks per metronome click
        8,  // 32nd notes per MIDI quarter note
    ]
}

/// Convert a track's delta-timed events to absolute ticks
fn absolute_events(track: &Track) -> Vec<MidiExportEvent> {
    let mut tick = 0u64;
    track
        .events()
        .iter()
        .map(|event| {
            tick += event.delta as u64;
            MidiExportEvent::encode(tick, track.channel(), &event.kind)
        })
        .collect()
}

/// MIDI file exporter
#[derive(Debug, Clone)]
pub struct MidiExporter {
    /// File format
    format: MidiFileFormat,
    /// PPQN (ticks per quarter note)
    ppqn: u16,
}

impl MidiExporter {
    /// Create a Type 1 exporter at the given resolution
    pub fn new(ppqn: u16) -> Self {
        Self {
            format: MidiFileFormat::Type1,
            ppqn: ppqn.max(1),
        }
    }

    /// Get format
    pub fn format(&self) -> MidiFileFormat {
        self.format
    }

    /// Set format
    pub fn set_format(&mut self, format: MidiFileFormat) {
        self.format = format;
    }

    /// Get PPQN
    pub fn ppqn(&self) -> u16 {
        self.ppqn
    }

    /// Export a song's tracks to a file
    pub fn export_song<P: AsRef<Path>>(&self, song: &Song, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer, &song.tracks())?;
        writer.flush()
    }

    /// Export to bytes
    pub fn export_to_bytes(&self, tracks: &[&Track]) -> Vec<u8> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, tracks)
            .expect("Write to vec should not fail");
        buffer
    }

    /// Write MIDI data to writer
    pub fn write<W: Write>(&self, writer: &mut W, tracks: &[&Track]) -> io::Result<()> {
        match self.format {
            MidiFileFormat::Type0 => self.write_type0(writer, tracks),
            MidiFileFormat::Type1 => self.write_type1(writer, tracks),
        }
    }

    /// Write Type 0 MIDI file (single track)
    fn write_type0<W: Write>(&self, writer: &mut W, tracks: &[&Track]) -> io::Result<()> {
        let mut events = Vec::new();

        for (i, track) in tracks.iter().enumerate() {
            for event in absolute_events(track) {
                // Meta events come from the first track only
                if event.is_end_of_track() || (i > 0 && event.is_meta()) {
                    continue;
                }
                events.push(event);
            }
        }

        // Stable sort keeps each track's emission order at equal ticks
        events.sort_by_key(|e| e.tick);

        self.write_header(writer, 0, 1)?;
        self.write_track(writer, &events)
    }

    /// Write Type 1 MIDI file (multiple tracks)
    fn write_type1<W: Write>(&self, writer: &mut W, tracks: &[&Track]) -> io::Result<()> {
        self.write_header(writer, 1, tracks.len() as u16)?;

        for track in tracks {
            self.write_track(writer, &absolute_events(track))?;
        }

        Ok(())
    }

    /// Write MIDI file header chunk
    fn write_header<W: Write>(
        &self,
        writer: &mut W,
        format: u16,
        num_tracks: u16,
    ) -> io::Result<()> {
        // MThd
        writer.write_all(b"MThd")?;
        // Chunk length (always 6)
        writer.write_all(&[0, 0, 0, 6])?;
        // Format type
        writer.write_all(&format.to_be_bytes())?;
        // Number of tracks
        writer.write_all(&num_tracks.to_be_bytes())?;
        // PPQN
        writer.write_all(&self.ppqn.to_be_bytes())?;
        Ok(())
    }

    /// Write a track chunk, appending an end marker if the events lack one
    fn write_track<W: Write>(&self, writer: &mut W, events: &[MidiExportEvent]) -> io::Result<()> {
        let mut track_data = Vec::new();
        let mut last_tick = 0u64;

        for event in events {
            let delta = event.tick.saturating_sub(last_tick);
            write_variable_length(&mut track_data, delta as u32)?;
            track_data.extend_from_slice(&event.data);
            last_tick = event.tick;
        }

        if !events.last().is_some_and(|e| e.is_end_of_track()) {
            write_variable_length(&mut track_data, 0)?;
            track_data.extend_from_slice(&[0xFF, 0x2F, 0x00]);
        }

        // MTrk
        writer.write_all(b"MTrk")?;
        // Track length
        let length = track_data.len() as u32;
        writer.write_all(&length.to_be_bytes())?;
        // Track data
        writer.write_all(&track_data)?;

        Ok(())
    }
}

impl Default for MidiExporter {
    fn default() -> Self {
        Self::new(DEFAULT_PPQN)
    }
}

/// Write variable-length quantity
fn write_variable_length<W: Write>(writer: &mut W, mut value: u32) -> io::Result<()> {
    let mut bytes = Vec::with_capacity(4);

    bytes.push((value & 0x7F) as u8);
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    writer.write_all(&bytes)
}

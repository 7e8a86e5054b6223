// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Append-only event tracks.
//!
//! A track starts with its meter and tempo meta events, collects bar
//! after bar of generated events, and is closed with an end marker.

use std::collections::HashMap;

use crate::generators::{EventKind, TrackEvent};
use crate::music::Pitch;
use crate::timing::Meter;

/// A single instrumental line
#[derive(Debug, Clone)]
pub struct Track {
    /// Track name
    name: String,
    /// MIDI channel (0-15)
    channel: u8,
    /// Events in emission order, meta events included
    events: Vec<TrackEvent>,
    /// Whether the end marker has been written
    closed: bool,
}

impl Track {
    /// Create a track with its meter and tempo already written
    pub fn new(name: impl Into<String>, meter: Meter, tempo: f64) -> Self {
        let events = vec![
            TrackEvent::new(0, EventKind::TimeSignature(meter)),
            TrackEvent::new(0, EventKind::Tempo { bpm: tempo }),
        ];
        Self {
            name: name.into(),
            channel: 0,
            events,
            closed: false,
        }
    }

    /// Set MIDI channel
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel.min(15);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Append one bar (or any run) of generated events.
    ///
    /// Ignored once the track is closed.
    pub fn extend<I: IntoIterator<Item = TrackEvent>>(&mut self, events: I) {
        if self.closed {
            return;
        }
        self.events.extend(events);
    }

    /// Write the end marker; further appends are ignored
    pub fn close(&mut self) {
        if !self.closed {
            self.events.push(TrackEvent::new(0, EventKind::EndOfTrack));
            self.closed = true;
        }
    }

    /// Total length in ticks
    pub fn duration_ticks(&self) -> u64 {
        self.events.iter().map(|e| e.delta as u64).sum()
    }

    /// Number of note-on events
    pub fn note_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_note_on()).count()
    }

    /// Whether every note-on has exactly one later note-off.
    ///
    /// Note-offs with nothing sounding are rests and are allowed.
    pub fn is_balanced(&self) -> bool {
        let mut sounding: HashMap<Pitch, u32> = HashMap::new();
        for event in &self.events {
            match event.kind {
                EventKind::NoteOn { pitch, .. } => {
                    *sounding.entry(pitch).or_insert(0) += 1;
                }
                EventKind::NoteOff { pitch } => {
                    if let Some(count) = sounding.get_mut(&pitch) {
                        *count = count.saturating_sub(1);
                    }
                }
                _ => {}
            }
        }
        sounding.values().all(|&count| count == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_track() -> Track {
        Track::new("Melody", Meter::COMMON_TIME, 120.0)
    }

    #[test]
    fn test_track_starts_with_metadata() {
        let track = test_track();
        assert_eq!(track.name(), "Melody");
        assert_eq!(track.channel(), 0);
        assert_eq!(
            track.events(),
            &[
                TrackEvent::new(0, EventKind::TimeSignature(Meter::COMMON_TIME)),
                TrackEvent::new(0, EventKind::Tempo { bpm: 120.0 }),
            ]
        );
        assert_eq!(track.duration_ticks(), 0);
    }

    #[test]
    fn test_track_channel_clamped() {
        let track = test_track().with_channel(20);
        assert_eq!(track.channel(), 15);
    }

    #[test]
    fn test_add_notes_and_rests() {
        let mut track = test_track();
        track.extend(TrackEvent::note(60, 100, 96));
        track.extend([TrackEvent::rest(96)]);
        track.extend(TrackEvent::note(64, 100, 48));

        assert_eq!(track.note_count(), 2);
        assert_eq!(track.duration_ticks(), 240);
        assert!(track.is_balanced());
    }

    #[test]
    fn test_close_is_final() {
        let mut track = test_track();
        track.extend(TrackEvent::note(60, 100, 96));
        track.close();
        track.close();
        track.extend(TrackEvent::note(62, 100, 96));

        assert!(track.is_closed());
        assert_eq!(track.note_count(), 1);
        let last = track.events().last().unwrap();
        assert_eq!(last.kind, EventKind::EndOfTrack);
        assert_eq!(
            track.events().iter().filter(|e| e.kind == EventKind::EndOfTrack).count(),
            1
        );
    }

    #[test]
    fn test_dangling_note_detected() {
        let mut track = test_track();
        track.extend([TrackEvent::note_on(60, 100)]);
        assert!(!track.is_balanced());

        track.extend([TrackEvent::note_off(96, 60)]);
        assert!(track.is_balanced());
    }
}

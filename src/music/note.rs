// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note names and MIDI pitch conversion.
//!
//! Pitches are plain MIDI note numbers. Names follow the `C4 = 60`
//! convention, so octave -1 starts at pitch 0.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MIDI note number type (0-127)
pub type Pitch = u8;

/// Semitone offset type
pub type Semitones = i8;

/// Highest valid MIDI pitch
pub const MAX_PITCH: Pitch = 127;

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        Note::ALL.iter().position(|n| *n == self).unwrap_or(0) as u8
    }

    /// Get note from pitch class
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Parse a note name without octave (e.g., "C", "C#", "Db", "F#")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" | "B#" | "BS" => Some(Note::C),
            "C#" | "CS" | "DB" => Some(Note::Cs),
            "D" => Some(Note::D),
            "D#" | "DS" | "EB" => Some(Note::Ds),
            "E" | "FB" => Some(Note::E),
            "F" | "E#" | "ES" => Some(Note::F),
            "F#" | "FS" | "GB" => Some(Note::Fs),
            "G" => Some(Note::G),
            "G#" | "GS" | "AB" => Some(Note::Gs),
            "A" => Some(Note::A),
            "A#" | "AS" | "BB" => Some(Note::As),
            "B" | "CB" => Some(Note::B),
            _ => None,
        }
    }

    /// MIDI pitch of this note in the given octave, if it fits in 0-127
    pub fn in_octave(self, octave: i8) -> Option<Pitch> {
        let midi = (octave as i16 + 1) * 12 + self.pitch_class() as i16;
        if (0..=MAX_PITCH as i16).contains(&midi) {
            Some(midi as Pitch)
        } else {
            None
        }
    }

    /// Note name of a MIDI pitch
    pub fn of_pitch(pitch: Pitch) -> Self {
        Note::from_pitch_class(pitch % 12)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        };
        write!(f, "{}", name)
    }
}

/// Split a leading note name from the rest of a string.
///
/// Returns the note, the octave carry of its spelling and the unparsed
/// remainder, e.g. `"Ebm"` gives `(Note::Ds, 0, "m")`. `Cb` sounds as the
/// B below its octave and `B#` as the C above, so they carry -1 and +1.
pub fn split_note_prefix(s: &str) -> Option<(Note, i8, &str)> {
    let s = s.trim();
    let mut chars = s.char_indices();
    let (_, letter) = chars.next()?;
    if !letter.is_ascii_alphabetic() {
        return None;
    }

    // Accidental is optional; try the two-character form first
    if let Some((idx, accidental)) = chars.next() {
        if matches!(accidental, '#' | 'b') {
            let end = idx + accidental.len_utf8();
            let spelling = &s[..end];
            if let Some(note) = Note::parse(spelling) {
                return Some((note, octave_carry(spelling), &s[end..]));
            }
        }
    }

    Note::parse(&s[..1]).map(|note| (note, 0, &s[1..]))
}

fn octave_carry(spelling: &str) -> i8 {
    match spelling.to_uppercase().as_str() {
        "CB" => -1,
        "B#" => 1,
        _ => 0,
    }
}

/// Parse a pitch with octave (e.g., "C4", "Eb3", "F#5", "C-1")
pub fn parse_pitch(s: &str) -> Option<Pitch> {
    let (note, carry, rest) = split_note_prefix(s)?;
    let octave: i8 = rest.trim().parse().ok()?;
    note.in_octave(octave.checked_add(carry)?)
}

/// Format a MIDI pitch with octave (e.g., 60 -> "C4")
pub fn pitch_name(pitch: Pitch) -> String {
    let octave = pitch as i16 / 12 - 1;
    format!("{}{}", Note::of_pitch(pitch), octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_pitch_class() {
        assert_eq!(Note::C.pitch_class(), 0);
        assert_eq!(Note::A.pitch_class(), 9);
        assert_eq!(Note::B.pitch_class(), 11);
    }

    #[test]
    fn test_note_parse() {
        assert_eq!(Note::parse("C"), Some(Note::C));
        assert_eq!(Note::parse("C#"), Some(Note::Cs));
        assert_eq!(Note::parse("Db"), Some(Note::Cs));
        assert_eq!(Note::parse("Gb"), Some(Note::Fs));
        assert_eq!(Note::parse("Bb"), Some(Note::As));
        assert_eq!(Note::parse("X"), None);
    }

    #[test]
    fn test_in_octave() {
        assert_eq!(Note::C.in_octave(4), Some(60));
        assert_eq!(Note::A.in_octave(4), Some(69));
        assert_eq!(Note::C.in_octave(-1), Some(0));
        assert_eq!(Note::G.in_octave(9), Some(127));
        assert_eq!(Note::Gs.in_octave(9), None);
    }

    #[test]
    fn test_parse_pitch() {
        assert_eq!(parse_pitch("C4"), Some(60));
        assert_eq!(parse_pitch("Eb3"), Some(51));
        assert_eq!(parse_pitch("F#5"), Some(78));
        assert_eq!(parse_pitch("c-1"), Some(0));
        assert_eq!(parse_pitch("H4"), None);
        assert_eq!(parse_pitch("C"), None);
        assert_eq!(parse_pitch("Cb4"), Some(59));
        assert_eq!(parse_pitch("B#4"), Some(72));
        assert_eq!(parse_pitch("Cb-1"), None);
        assert_eq!(parse_pitch("Fb4"), Some(64));
        assert_eq!(parse_pitch("E#4"), Some(65));
        assert_eq!(parse_pitch(""), None);
    }

    #[test]
    fn test_split_note_prefix() {
        assert_eq!(split_note_prefix("Am"), Some((Note::A, 0, "m")));
        assert_eq!(split_note_prefix("Ebm"), Some((Note::Ds, 0, "m")));
        assert_eq!(split_note_prefix("F#dim"), Some((Note::Fs, 0, "dim")));
        assert_eq!(split_note_prefix("B"), Some((Note::B, 0, "")));
        assert_eq!(split_note_prefix("Cbm"), Some((Note::B, -1, "m")));
        assert_eq!(split_note_prefix("B#"), Some((Note::C, 1, "")));
        assert_eq!(split_note_prefix("7"), None);
    }

    #[test]
    fn test_pitch_name() {
        assert_eq!(pitch_name(60), "C4");
        assert_eq!(pitch_name(36), "C2");
        assert_eq!(pitch_name(70), "A#4");
        assert_eq!(pitch_name(0), "C-1");
    }
}

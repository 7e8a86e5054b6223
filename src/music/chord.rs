// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Triads and cyclic four-chord progressions.
//!
//! A [`Chord`] is three concrete MIDI pitches and a [`ChordProgression`]
//! is four of them, cycled bar by bar. The generators never interpret the
//! harmony; they only pick from the pitches they are given.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::note::{parse_pitch, pitch_name, split_note_prefix, Pitch, Semitones, MAX_PITCH};

/// Number of tones in a chord
pub const CHORD_SIZE: usize = 3;

/// Number of chords in a progression
pub const PROGRESSION_LENGTH: usize = 4;

/// A triad: three MIDI pitches.
///
/// Order matters only in that index 0/1/2 refer to the same tones for
/// melody and bass. Every chord tone is within 0 semitones of itself, so
/// the eighth-note partner search always has at least one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord([Pitch; CHORD_SIZE]);

impl Chord {
    /// Create a chord from three pitches
    pub const fn new(pitches: [Pitch; CHORD_SIZE]) -> Self {
        Self(pitches)
    }

    /// The chord's pitches in their original order
    pub fn pitches(&self) -> &[Pitch; CHORD_SIZE] {
        &self.0
    }

    /// Transpose every tone, or `None` if any tone would leave 0-127
    pub fn transposed(&self, semitones: Semitones) -> Option<Chord> {
        let mut pitches = [0; CHORD_SIZE];
        for (out, &pitch) in pitches.iter_mut().zip(self.0.iter()) {
            *out = transpose_pitch(pitch, semitones)?;
        }
        Some(Chord(pitches))
    }

    /// Chord tones whose distance from `pitch` is at most `max_interval`
    pub fn partners_within(&self, pitch: Pitch, max_interval: u8) -> Vec<Pitch> {
        self.0
            .iter()
            .copied()
            .filter(|&p| p.abs_diff(pitch) <= max_interval)
            .collect()
    }

    /// Build a chord from three note names (e.g. `["C4", "E4", "G4"]`)
    pub fn from_note_names<S: AsRef<str>>(names: &[S]) -> Option<Chord> {
        if names.len() != CHORD_SIZE {
            return None;
        }
        let mut pitches = [0; CHORD_SIZE];
        for (out, name) in pitches.iter_mut().zip(names) {
            *out = parse_pitch(name.as_ref())?;
        }
        Some(Chord(pitches))
    }

    /// Build a root-position triad from a chord symbol and an octave.
    ///
    /// Accepted qualities: `""`/`maj` (major), `m`/`min` (minor), `dim`
    /// and `aug`. `from_symbol("Am", 4)` gives A4 C5 E5.
    pub fn from_symbol(symbol: &str, octave: i8) -> Option<Chord> {
        let (root, carry, quality) = split_note_prefix(symbol)?;
        let intervals = TriadQuality::parse(quality)?.intervals();
        let root = root.in_octave(octave.checked_add(carry)?)?;

        let mut pitches = [0; CHORD_SIZE];
        for (out, &interval) in pitches.iter_mut().zip(intervals.iter()) {
            *out = transpose_pitch(root, interval)?;
        }
        Some(Chord(pitches))
    }
}

impl From<[Pitch; CHORD_SIZE]> for Chord {
    fn from(pitches: [Pitch; CHORD_SIZE]) -> Self {
        Chord::new(pitches)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {}]",
            pitch_name(self.0[0]),
            pitch_name(self.0[1]),
            pitch_name(self.0[2])
        )
    }
}

/// Triad qualities understood by [`Chord::from_symbol`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriadQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
}

impl TriadQuality {
    /// Parse the quality suffix of a chord symbol
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "" | "maj" | "M" => Some(TriadQuality::Major),
            "m" | "min" => Some(TriadQuality::Minor),
            "dim" | "o" => Some(TriadQuality::Diminished),
            "aug" | "+" => Some(TriadQuality::Augmented),
            _ => None,
        }
    }

    /// Semitone offsets from the root
    pub fn intervals(self) -> [Semitones; CHORD_SIZE] {
        match self {
            TriadQuality::Major => [0, 4, 7],
            TriadQuality::Minor => [0, 3, 7],
            TriadQuality::Diminished => [0, 3, 6],
            TriadQuality::Augmented => [0, 4, 8],
        }
    }
}

/// Four chords played one per bar, cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChordProgression([Chord; PROGRESSION_LENGTH]);

impl ChordProgression {
    /// Create a progression from four chords
    pub const fn new(chords: [Chord; PROGRESSION_LENGTH]) -> Self {
        Self(chords)
    }

    /// The four chords in order
    pub fn chords(&self) -> &[Chord; PROGRESSION_LENGTH] {
        &self.0
    }

    /// Look up a built-in progression by name
    pub fn preset(name: &str) -> Option<Self> {
        Preset::find(name).map(|p| p.progression)
    }

    /// Chord for a bar (cycles every four bars)
    pub fn chord_for_bar(&self, bar: u64) -> Chord {
        current_chord(self, bar)
    }

    /// Lowest pitch anywhere in the progression
    pub fn lowest_pitch(&self) -> Pitch {
        self.0
            .iter()
            .flat_map(|c| c.pitches().iter().copied())
            .min()
            .unwrap_or(0)
    }
}

impl fmt::Display for ChordProgression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chords: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", chords.join(" "))
    }
}

/// Chord for a bar index: `progression[bar mod 4]`.
///
/// Pure; the result only depends on the arguments.
pub fn current_chord(progression: &ChordProgression, bar: u64) -> Chord {
    progression.0[(bar % PROGRESSION_LENGTH as u64) as usize]
}

fn transpose_pitch(pitch: Pitch, semitones: Semitones) -> Option<Pitch> {
    let shifted = pitch as i16 + semitones as i16;
    if (0..=MAX_PITCH as i16).contains(&shifted) {
        Some(shifted as Pitch)
    } else {
        None
    }
}

/// A named, built-in progression
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    /// Lookup key
    pub name: &'static str,
    /// Chord names as shown to the user
    pub label: &'static str,
    /// Character of the progression
    pub mood: &'static str,
    /// Suggested tempo range in BPM
    pub tempo_range: (u16, u16),
    pub progression: ChordProgression,
}

// Voicings keep the tones inside one octave band, so e.g. G major is G4 B4 D4.
const C_MAJ_4: Chord = Chord::new([60, 64, 67]);
const G_MAJ_4: Chord = Chord::new([67, 71, 62]);
const A_MIN_4: Chord = Chord::new([69, 60, 64]);
const F_MAJ_4: Chord = Chord::new([65, 69, 60]);

const C_MIN_3: Chord = Chord::new([48, 51, 55]);
const EB_MIN_3: Chord = Chord::new([51, 54, 58]);

const A_MIN_3: Chord = Chord::new([57, 48, 52]);
const D_MAJ_3: Chord = Chord::new([50, 54, 57]);
const F_MIN_3: Chord = Chord::new([53, 56, 48]);
const C_MAJ_3: Chord = Chord::new([48, 52, 55]);

/// All built-in progressions
pub static PRESETS: [Preset; 4] = [
    Preset {
        name: "cgaf",
        label: "C, G, A, F",
        mood: "happy",
        tempo_range: (120, 150),
        progression: ChordProgression::new([C_MAJ_4, G_MAJ_4, A_MIN_4, F_MAJ_4]),
    },
    Preset {
        name: "cece",
        label: "C, Eb, C, Eb",
        mood: "creepy",
        tempo_range: (80, 100),
        progression: ChordProgression::new([C_MIN_3, EB_MIN_3, C_MIN_3, EB_MIN_3]),
    },
    Preset {
        name: "cfgf",
        label: "C, F, G, F",
        mood: "happy",
        tempo_range: (120, 150),
        progression: ChordProgression::new([C_MAJ_4, F_MAJ_4, G_MAJ_4, F_MAJ_4]),
    },
    Preset {
        name: "amdfmc",
        label: "Am, D, Fm, C",
        mood: "sad",
        tempo_range: (60, 77),
        progression: ChordProgression::new([A_MIN_3, D_MAJ_3, F_MIN_3, C_MAJ_3]),
    },
];

impl Preset {
    /// Find a preset by name (case-insensitive)
    pub fn find(name: &str) -> Option<&'static Preset> {
        let name = name.trim();
        PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Names of all presets
    pub fn names() -> Vec<&'static str> {
        PRESETS.iter().map(|p| p.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cgaf() -> ChordProgression {
        ChordProgression::preset("cgaf").unwrap()
    }

    #[test]
    fn test_current_chord_cycles() {
        let prog = cgaf();
        for bar in 0..32 {
            assert_eq!(current_chord(&prog, bar), current_chord(&prog, bar + 4));
        }
        assert_eq!(current_chord(&prog, 0), C_MAJ_4);
        assert_eq!(current_chord(&prog, 3), F_MAJ_4);
        assert_eq!(current_chord(&prog, 5), G_MAJ_4);
    }

    #[test]
    fn test_current_chord_is_pure() {
        let prog = cgaf();
        let before = prog;
        let first = current_chord(&prog, 6);
        let second = current_chord(&prog, 6);
        assert_eq!(first, second);
        assert_eq!(prog, before);
        assert_eq!(prog.chord_for_bar(u64::MAX), current_chord(&prog, 3));
    }

    #[test]
    fn test_malformed_chord_accepted() {
        let odd = Chord::new([0, 0, 127]);
        let prog = ChordProgression::new([odd; 4]);
        assert_eq!(current_chord(&prog, 9), odd);
    }

    #[test]
    fn test_transposed() {
        assert_eq!(C_MAJ_4.transposed(-24), Some(Chord::new([36, 40, 43])));
        assert_eq!(C_MAJ_4.transposed(12), Some(Chord::new([72, 76, 79])));
        assert_eq!(Chord::new([10, 14, 17]).transposed(-24), None);
        assert_eq!(Chord::new([120, 124, 127]).transposed(1), None);
    }

    #[test]
    fn test_partners_within() {
        // G4 B4 D4: D4 is 5 below G4, B4 is 4 above
        assert_eq!(G_MAJ_4.partners_within(67, 6), vec![67, 71, 62]);
        // From D4, G4 is 5 up and B4 is 9 up
        assert_eq!(G_MAJ_4.partners_within(62, 6), vec![67, 62]);
        assert_eq!(Chord::new([40, 60, 80]).partners_within(60, 6), vec![60]);
    }

    #[test]
    fn test_from_note_names() {
        assert_eq!(Chord::from_note_names(&["C4", "E4", "G4"]), Some(C_MAJ_4));
        assert_eq!(
            Chord::from_note_names(&["Eb3", "Gb3", "Bb3"]),
            Some(EB_MIN_3)
        );
        assert_eq!(Chord::from_note_names(&["C4", "E4"]), None);
        assert_eq!(Chord::from_note_names(&["C4", "E4", "Q4"]), None);
    }

    #[test]
    fn test_from_symbol() {
        assert_eq!(Chord::from_symbol("C", 4), Some(C_MAJ_4));
        assert_eq!(Chord::from_symbol("Am", 4), Some(Chord::new([69, 72, 76])));
        assert_eq!(
            Chord::from_symbol("Bdim", 3),
            Some(Chord::new([59, 62, 65]))
        );
        assert_eq!(
            Chord::from_symbol("Ebaug", 3),
            Some(Chord::new([51, 55, 59]))
        );
        assert_eq!(
            Chord::from_symbol("F#min", 3),
            Some(Chord::new([54, 57, 61]))
        );
        assert_eq!(Chord::from_symbol("Csus4", 4), None);
        assert_eq!(Chord::from_symbol("G", 9), None);
    }

    #[test]
    fn test_enharmonic_roots_across_octaves() {
        assert_eq!(Chord::from_symbol("Cb", 4), Some(Chord::new([59, 63, 66])));
        assert_eq!(Chord::from_symbol("B#m", 4), Some(Chord::new([72, 75, 79])));
        assert_eq!(
            Chord::from_note_names(&["Cb4", "Eb4", "Gb4"]),
            Some(Chord::new([59, 63, 66]))
        );
    }

    #[test]
    fn test_presets() {
        assert_eq!(PRESETS.len(), 4);
        assert!(Preset::find("CGAF").is_some());
        assert!(Preset::find("nope").is_none());
        assert_eq!(Preset::names(), vec!["cgaf", "cece", "cfgf", "amdfmc"]);

        let sad = Preset::find("amdfmc").unwrap();
        assert_eq!(sad.mood, "sad");
        assert_eq!(sad.progression.lowest_pitch(), 48);
        assert_eq!(cgaf().lowest_pitch(), 60);
    }

    #[test]
    fn test_display() {
        assert_eq!(C_MAJ_4.to_string(), "[C4 E4 G4]");
    }
}

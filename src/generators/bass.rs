// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Bass generator: the bar's chord, two octaves down.
//!
//! Either holds the whole triad for the full bar, or (in the alternating
//! style) plays two half-bar hits on odd bars, the second one an octave
//! higher than the first.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{BarContext, BarGenerator, GenerationState, GeneratorError, TrackEvent};
use crate::music::{Chord, Semitones};

/// Transposition for the main bass register
const TWO_OCTAVES_DOWN: Semitones = -24;

/// Transposition for the second half of a split bar
const ONE_OCTAVE_DOWN: Semitones = -12;

/// How much quieter the bass is than the melody's base volume
const VELOCITY_DROP: u8 = 20;

/// Lowest base volume that still leaves the bass an audible velocity
pub const MIN_BASS_VOLUME: u8 = VELOCITY_DROP + 1;

/// Rhythmic shape of one bass bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BassPattern {
    /// Triad held for the whole bar
    WholeBar,
    /// Triad for half a bar, then the triad an octave higher for the rest
    HalfBars,
}

/// Which patterns a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BassStyle {
    /// Always [`BassPattern::WholeBar`]
    #[default]
    Whole,
    /// Whole bar on even bars, half bars on odd bars
    Alternating,
}

impl BassStyle {
    /// Pattern for a bar index
    pub fn pattern_for_bar(self, bar: u64) -> BassPattern {
        match self {
            BassStyle::Whole => BassPattern::WholeBar,
            BassStyle::Alternating if bar % 2 == 0 => BassPattern::WholeBar,
            BassStyle::Alternating => BassPattern::HalfBars,
        }
    }

    /// Parse from string (e.g., "whole", "alternating")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "whole" | "a" => Some(BassStyle::Whole),
            "alternating" | "abab" | "ab" => Some(BassStyle::Alternating),
            _ => None,
        }
    }
}

/// Bass generator
#[derive(Debug, Clone, Copy, Default)]
pub struct BassGenerator {
    style: BassStyle,
}

impl BassGenerator {
    pub fn new(style: BassStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> BassStyle {
        self.style
    }

    /// Bass velocity for a base volume, never below 1.
    ///
    /// A note-on with velocity 0 is read as a note-off.
    pub fn velocity(volume: u8) -> u8 {
        volume.saturating_sub(VELOCITY_DROP).max(1)
    }

    /// Sound all three tones at once, then release them together after `duration`
    fn push_chord(events: &mut Vec<TrackEvent>, chord: &Chord, velocity: u8, duration: u32) {
        for &pitch in chord.pitches() {
            events.push(TrackEvent::note_on(pitch, velocity));
        }
        for (i, &pitch) in chord.pitches().iter().enumerate() {
            let delta = if i == 0 { duration } else { 0 };
            events.push(TrackEvent::note_off(delta, pitch));
        }
    }
}

fn transpose(chord: &Chord, offset: Semitones) -> Result<Chord, GeneratorError> {
    chord.transposed(offset).ok_or(GeneratorError::PitchOutOfRange {
        chord: *chord,
        offset,
    })
}

impl BarGenerator for BassGenerator {
    fn generate_bar(
        &self,
        context: &BarContext,
        state: &mut GenerationState,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<TrackEvent>, GeneratorError> {
        let velocity = Self::velocity(context.volume);
        let bar_ticks = context.ticks_per_bar();
        let low = transpose(&context.chord, TWO_OCTAVES_DOWN)?;
        let mut events = Vec::with_capacity(12);

        match self.style.pattern_for_bar(state.bar) {
            BassPattern::WholeBar => {
                Self::push_chord(&mut events, &low, velocity, bar_ticks);
            }
            BassPattern::HalfBars => {
                let mid = transpose(&context.chord, ONE_OCTAVE_DOWN)?;
                let half = bar_ticks / 2;
                Self::push_chord(&mut events, &low, velocity, half);
                Self::push_chord(&mut events, &mid, velocity, bar_ticks - half);
            }
        }

        Ok(events)
    }

    fn name(&self) -> &'static str {
        "bass"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{total_ticks, EventKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn c_major() -> Chord {
        Chord::new([60, 64, 67])
    }

    fn generate(
        style: BassStyle,
        bar: u64,
        chord: Chord,
    ) -> Result<Vec<TrackEvent>, GeneratorError> {
        let bass = BassGenerator::new(style);
        let ctx = BarContext::new(chord, 100);
        let mut state = GenerationState {
            bar,
            last_rest_bar: None,
        };
        let mut rng = StdRng::seed_from_u64(0);
        bass.generate_bar(&ctx, &mut state, &mut rng)
    }

    #[test]
    fn test_bass_creation() {
        let bass = BassGenerator::default();
        assert_eq!(bass.name(), "bass");
        assert_eq!(bass.style(), BassStyle::Whole);
        assert_eq!(BassGenerator::velocity(100), 80);
        assert_eq!(BassGenerator::velocity(MIN_BASS_VOLUME), 1);
    }

    #[test]
    fn test_whole_bar_pattern() {
        let events = generate(BassStyle::Whole, 0, c_major()).unwrap();

        assert_eq!(
            events,
            vec![
                TrackEvent::note_on(36, 80),
                TrackEvent::note_on(40, 80),
                TrackEvent::note_on(43, 80),
                TrackEvent::note_off(384, 36),
                TrackEvent::note_off(0, 40),
                TrackEvent::note_off(0, 43),
            ]
        );
        assert_eq!(total_ticks(&events), 384);
    }

    #[test]
    fn test_whole_style_ignores_parity() {
        for bar in 0..6 {
            let events = generate(BassStyle::Whole, bar, c_major()).unwrap();
            assert_eq!(events.len(), 6);
        }
    }

    #[test]
    fn test_half_bar_pattern() {
        let events = generate(BassStyle::Alternating, 1, c_major()).unwrap();

        assert_eq!(events.iter().filter(|e| e.is_note_on()).count(), 6);
        assert_eq!(events.iter().filter(|e| e.is_note_off()).count(), 6);
        assert_eq!(total_ticks(&events), 384);

        let (first, second) = events.split_at(6);
        assert_eq!(total_ticks(first), 192);
        assert_eq!(total_ticks(second), 192);

        let pitches = |group: &[TrackEvent]| -> Vec<u8> {
            group
                .iter()
                .filter_map(|e| match e.kind {
                    EventKind::NoteOn { pitch, .. } => Some(pitch),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(pitches(first), vec![36, 40, 43]);
        assert_eq!(pitches(second), vec![48, 52, 55]);
    }

    #[test]
    fn test_alternating_by_parity() {
        assert_eq!(
            BassStyle::Alternating.pattern_for_bar(0),
            BassPattern::WholeBar
        );
        assert_eq!(
            BassStyle::Alternating.pattern_for_bar(1),
            BassPattern::HalfBars
        );
        assert_eq!(
            BassStyle::Alternating.pattern_for_bar(4),
            BassPattern::WholeBar
        );
        assert_eq!(BassStyle::Whole.pattern_for_bar(7), BassPattern::WholeBar);

        assert_eq!(
            generate(BassStyle::Alternating, 2, c_major()).unwrap().len(),
            6
        );
        assert_eq!(
            generate(BassStyle::Alternating, 3, c_major()).unwrap().len(),
            12
        );
    }

    #[test]
    fn test_quiet_volume_keeps_bass_sounding() {
        for volume in [0, 1, 10, 20] {
            let bass = BassGenerator::new(BassStyle::Whole);
            let ctx = BarContext::new(c_major(), volume);
            let mut state = GenerationState::new();
            let mut rng = StdRng::seed_from_u64(0);
            let events = bass.generate_bar(&ctx, &mut state, &mut rng).unwrap();

            for event in events {
                if let EventKind::NoteOn { velocity, .. } = event.kind {
                    assert_eq!(velocity, 1, "volume {}", volume);
                }
            }
        }
    }

    #[test]
    fn test_no_accents_in_bass() {
        let events = generate(BassStyle::Alternating, 1, c_major()).unwrap();
        for event in events {
            if let EventKind::NoteOn { velocity, .. } = event.kind {
                assert_eq!(velocity, 80);
            }
        }
    }

    #[test]
    fn test_register_underflow() {
        let low = Chord::new([20, 24, 27]);
        let err = generate(BassStyle::Whole, 0, low).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::PitchOutOfRange {
                chord: low,
                offset: -24,
            }
        );
    }

    #[test]
    fn test_style_parse() {
        assert_eq!(BassStyle::parse("whole"), Some(BassStyle::Whole));
        assert_eq!(
            BassStyle::parse("Alternating"),
            Some(BassStyle::Alternating)
        );
        assert_eq!(BassStyle::parse("ABAB"), Some(BassStyle::Alternating));
        assert_eq!(BassStyle::parse("walking"), None);
    }
}

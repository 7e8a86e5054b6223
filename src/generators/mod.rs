// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Bar-by-bar generators for the melody and bass lines.
//!
//! Each generator turns the active chord for one bar into a run of timed
//! track events. Randomness and the carried-forward rest cooldown are
//! passed in explicitly, so a whole piece is reproducible from a seed.

pub mod bass;
pub mod melody;

use rand::{Rng, RngCore};
use thiserror::Error;

use crate::music::{Chord, Pitch};
use crate::timing::{Meter, MetricTicks};

pub use bass::{BassGenerator, BassPattern, BassStyle, MIN_BASS_VOLUME};
pub use melody::{MelodyConfig, MelodyGenerator};

/// Melodic slots (quarter notes) per bar
pub const SLOTS_PER_BAR: usize = 4;

/// Highest MIDI velocity, used for accents
pub const MAX_VELOCITY: u8 = 127;

/// Default velocity for unaccented notes
pub const DEFAULT_VOLUME: u8 = 100;

/// Errors raised while generating a bar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// No chord tone lies close enough to the first note of an eighth pair
    #[error("no chord tone within {max_interval} semitones of pitch {pitch} in {chord}")]
    NoEighthPartner {
        pitch: Pitch,
        max_interval: u8,
        chord: Chord,
    },
    /// Transposing the chord would leave the MIDI pitch range
    #[error("transposing {chord} by {offset} semitones leaves the MIDI pitch range")]
    PitchOutOfRange { chord: Chord, offset: i8 },
}

/// What a track event does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// Start sounding a pitch
    NoteOn { pitch: Pitch, velocity: u8 },
    /// Stop sounding a pitch; with no matching note-on this is a rest
    NoteOff { pitch: Pitch },
    /// Time signature meta event
    TimeSignature(Meter),
    /// Tempo meta event in BPM
    Tempo { bpm: f64 },
    /// End of track marker
    EndOfTrack,
}

/// Event with a delta time in ticks since the previous event of its track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackEvent {
    pub delta: u32,
    pub kind: EventKind,
}

impl TrackEvent {
    /// Create a new event
    pub fn new(delta: u32, kind: EventKind) -> Self {
        Self { delta, kind }
    }

    pub fn note_on(pitch: Pitch, velocity: u8) -> Self {
        Self::new(0, EventKind::NoteOn { pitch, velocity })
    }

    pub fn note_off(delta: u32, pitch: Pitch) -> Self {
        Self::new(delta, EventKind::NoteOff { pitch })
    }

    /// Silence for `duration` ticks: a pitch-0 note-off with no note-on
    pub fn rest(duration: u32) -> Self {
        Self::note_off(duration, 0)
    }

    /// Matched note-on/note-off pair sounding for `duration` ticks
    pub fn note(pitch: Pitch, velocity: u8, duration: u32) -> [TrackEvent; 2] {
        [
            Self::note_on(pitch, velocity),
            Self::note_off(duration, pitch),
        ]
    }

    /// True for note-on events
    pub fn is_note_on(&self) -> bool {
        matches!(self.kind, EventKind::NoteOn { .. })
    }

    /// True for note-off events, rests included
    pub fn is_note_off(&self) -> bool {
        matches!(self.kind, EventKind::NoteOff { .. })
    }
}

/// Sum of the delta times of a run of events
pub fn total_ticks(events: &[TrackEvent]) -> u64 {
    events.iter().map(|e| e.delta as u64).sum()
}

/// Settings shared by every bar of a run
#[derive(Debug, Clone, Copy)]
pub struct BarContext {
    /// Chord active for this bar
    pub chord: Chord,
    /// Base velocity for unaccented notes
    pub volume: u8,
    /// Tick resolution
    pub clock: MetricTicks,
    /// Time signature
    pub meter: Meter,
}

impl BarContext {
    /// Create a context at the default resolution in 4/4
    pub fn new(chord: Chord, volume: u8) -> Self {
        Self {
            chord,
            volume,
            clock: MetricTicks::default(),
            meter: Meter::COMMON_TIME,
        }
    }

    /// Use a different resolution
    pub fn with_clock(mut self, clock: MetricTicks) -> Self {
        self.clock = clock;
        self
    }

    /// Ticks in one bar
    pub fn ticks_per_bar(&self) -> u32 {
        self.clock.ticks_per_bar(self.meter)
    }
}

/// State carried from bar to bar during one generation run.
///
/// `last_rest_bar` is `None` until the melody places its first rest, so
/// the first rest is never held back by the cooldown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationState {
    /// Index of the bar being generated
    pub bar: u64,
    /// Bar in which the melody last rested
    pub last_rest_bar: Option<u64>,
}

impl GenerationState {
    /// Fresh state positioned at bar 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether at least `cooldown_bars` bars separate this bar from the last rest
    pub fn can_rest(&self, cooldown_bars: u64) -> bool {
        match self.last_rest_bar {
            None => true,
            Some(last) => self.bar.saturating_sub(last) >= cooldown_bars,
        }
    }

    /// Remember that a rest was placed in the current bar
    pub fn record_rest(&mut self) {
        self.last_rest_bar = Some(self.bar);
    }

    /// Move on to the next bar
    pub fn advance(&mut self) {
        self.bar += 1;
    }
}

/// Trait for generators that produce one bar of events at a time
pub trait BarGenerator {
    /// Generate the events for the bar `state.bar` over `context.chord`
    ///
    /// Returned events are in emission order with delta times relative
    /// to the previous event; they always add up to exactly one bar.
    fn generate_bar(
        &self,
        context: &BarContext,
        state: &mut GenerationState,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<TrackEvent>, GeneratorError>;

    /// Get the generator type name
    fn name(&self) -> &'static str;
}

/// Roll against a probability in `[0.0, 1.0]`
pub(crate) fn chance(rng: &mut dyn RngCore, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

/// Uniformly pick one of the chord's tones
pub(crate) fn pick_tone(rng: &mut dyn RngCore, chord: &Chord) -> Pitch {
    let pitches = chord.pitches();
    pitches[rng.gen_range(0..pitches.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_note_events() {
        let [on, off] = TrackEvent::note(60, 100, 96);
        assert_eq!(on.delta, 0);
        assert_eq!(on.kind, EventKind::NoteOn { pitch: 60, velocity: 100 });
        assert_eq!(off.delta, 96);
        assert_eq!(off.kind, EventKind::NoteOff { pitch: 60 });
        assert!(on.is_note_on());
        assert!(off.is_note_off());
    }

    #[test]
    fn test_rest_event() {
        let rest = TrackEvent::rest(96);
        assert_eq!(rest.delta, 96);
        assert_eq!(rest.kind, EventKind::NoteOff { pitch: 0 });
    }

    #[test]
    fn test_total_ticks() {
        let mut events = TrackEvent::note(60, 100, 48).to_vec();
        events.push(TrackEvent::rest(96));
        assert_eq!(total_ticks(&events), 144);
        assert_eq!(total_ticks(&[]), 0);
    }

    #[test]
    fn test_bar_context() {
        let ctx = BarContext::new(Chord::new([60, 64, 67]), 100);
        assert_eq!(ctx.ticks_per_bar(), 384);

        let ctx = ctx.with_clock(MetricTicks::new(24));
        assert_eq!(ctx.ticks_per_bar(), 96);
    }

    #[test]
    fn test_generation_state_cooldown() {
        let mut state = GenerationState::new();
        assert!(state.can_rest(4));

        state.record_rest();
        assert_eq!(state.last_rest_bar, Some(0));
        assert!(!state.can_rest(4));

        for _ in 0..3 {
            state.advance();
            assert!(!state.can_rest(4));
        }

        state.advance();
        assert_eq!(state.bar, 4);
        assert!(state.can_rest(4));
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(chance(&mut rng, 1.0));
            assert!(!chance(&mut rng, 0.0));
        }
    }

    #[test]
    fn test_pick_tone_stays_in_chord() {
        let mut rng = StdRng::seed_from_u64(1);
        let chord = Chord::new([60, 64, 67]);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let pitch = pick_tone(&mut rng, &chord);
            let idx = chord.pitches().iter().position(|&p| p == pitch).unwrap();
            seen[idx] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_error_messages() {
        let err = GeneratorError::PitchOutOfRange {
            chord: Chord::new([10, 14, 17]),
            offset: -24,
        };
        assert!(err.to_string().contains("-24"));
    }
}

// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Melody generator: four chord-tone slots per bar.
//!
//! Each quarter-note slot picks a chord tone and then becomes one of:
//! an eighth-note pair, a quarter rest (subject to a cooldown across
//! bars), or a plain quarter note. Even slots may be accented.

use rand::{Rng, RngCore};
use tracing::trace;

use super::{
    chance, pick_tone, BarContext, BarGenerator, GenerationState, GeneratorError, TrackEvent,
    MAX_VELOCITY, SLOTS_PER_BAR,
};
use crate::music::{Chord, Pitch};

/// Configuration for melody generator
#[derive(Debug, Clone)]
pub struct MelodyConfig {
    /// Probability that a slot splits into two eighth notes
    pub pair_probability: f64,
    /// Probability that a slot rests, when the cooldown allows it
    pub rest_probability: f64,
    /// Probability that an even slot is accented
    pub accent_probability: f64,
    /// Velocity of accented notes
    pub accent_velocity: u8,
    /// Largest interval between the two notes of an eighth pair
    pub max_pair_interval: u8,
    /// Bars that must pass after a rest before the next one
    pub rest_cooldown_bars: u64,
}

impl Default for MelodyConfig {
    fn default() -> Self {
        Self {
            pair_probability: 1.0 / 4.0,
            rest_probability: 1.0 / 15.0,
            accent_probability: 1.0 / 10.0,
            accent_velocity: MAX_VELOCITY,
            max_pair_interval: 6,
            rest_cooldown_bars: 4,
        }
    }
}

impl MelodyConfig {
    /// Clamp probabilities into `[0.0, 1.0]` and velocity into MIDI range
    pub fn sanitized(mut self) -> Self {
        self.pair_probability = self.pair_probability.clamp(0.0, 1.0);
        self.rest_probability = self.rest_probability.clamp(0.0, 1.0);
        self.accent_probability = self.accent_probability.clamp(0.0, 1.0);
        self.accent_velocity = self.accent_velocity.min(MAX_VELOCITY);
        self
    }
}

/// How a single slot was filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotTreatment {
    EighthPair,
    Rest,
    Quarter,
}

/// Melody generator
#[derive(Debug, Clone, Default)]
pub struct MelodyGenerator {
    config: MelodyConfig,
}

impl MelodyGenerator {
    /// Create a melody generator with the default probabilities
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a melody generator with custom settings
    pub fn with_config(config: MelodyConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &MelodyConfig {
        &self.config
    }

    /// Pick the second note of an eighth pair.
    ///
    /// Chooses uniformly among the chord tones no further than
    /// `max_pair_interval` from `first`.
    fn pick_partner(
        &self,
        rng: &mut dyn RngCore,
        chord: &Chord,
        first: Pitch,
    ) -> Result<Pitch, GeneratorError> {
        let candidates = chord.partners_within(first, self.config.max_pair_interval);
        if candidates.is_empty() {
            return Err(GeneratorError::NoEighthPartner {
                pitch: first,
                max_interval: self.config.max_pair_interval,
                chord: *chord,
            });
        }
        Ok(candidates[rng.gen_range(0..candidates.len())])
    }
}

impl BarGenerator for MelodyGenerator {
    fn generate_bar(
        &self,
        context: &BarContext,
        state: &mut GenerationState,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<TrackEvent>, GeneratorError> {
        let chord = &context.chord;
        let quarter = context.clock.ticks_4th();
        let eighth = context.clock.ticks_8th();
        let mut events = Vec::with_capacity(SLOTS_PER_BAR * 4);

        for slot in 0..SLOTS_PER_BAR {
            let note = pick_tone(rng, chord);

            // Every roll is taken each slot; precedence is decided below
            let play_pair = chance(rng, self.config.pair_probability);
            let can_rest = state.can_rest(self.config.rest_cooldown_bars);
            let play_rest = chance(rng, self.config.rest_probability);
            let accented = chance(rng, self.config.accent_probability);

            let velocity = if slot % 2 == 0 && accented {
                self.config.accent_velocity
            } else {
                context.volume
            };

            let treatment = if play_pair {
                SlotTreatment::EighthPair
            } else if can_rest && play_rest {
                SlotTreatment::Rest
            } else {
                SlotTreatment::Quarter
            };

            match treatment {
                SlotTreatment::EighthPair => {
                    events.extend(TrackEvent::note(note, velocity, eighth));
                    let second = self.pick_partner(rng, chord, note)?;
                    // Odd resolutions leave a remainder; the second note absorbs it
                    events.extend(TrackEvent::note(second, velocity, quarter - eighth));
                }
                SlotTreatment::Rest => {
                    state.record_rest();
                    events.push(TrackEvent::rest(quarter));
                }
                SlotTreatment::Quarter => {
                    events.extend(TrackEvent::note(note, velocity, quarter));
                }
            }

            trace!(bar = state.bar, slot, ?treatment, note, velocity, "melody slot");
        }

        Ok(events)
    }

    fn name(&self) -> &'static str {
        "melody"
    }
}

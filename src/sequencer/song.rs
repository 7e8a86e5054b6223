// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song assembly: runs the bar generators over the whole piece.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use super::track::Track;
use crate::generators::{
    BarContext, BarGenerator, BassGenerator, BassStyle, GenerationState, GeneratorError,
    MelodyConfig, MelodyGenerator, DEFAULT_VOLUME,
};
use crate::music::{current_chord, ChordProgression, PRESETS};
use crate::timing::{Meter, MetricTicks, DEFAULT_PPQN};

/// MIDI channel of the melody track
pub const MELODY_CHANNEL: u8 = 0;

/// MIDI channel of the bass track
pub const BASS_CHANNEL: u8 = 0;

/// Fully resolved inputs for one generation run
#[derive(Debug, Clone)]
pub struct SongSettings {
    /// Tempo in BPM
    pub tempo: f64,
    /// Number of bars to generate
    pub bars: u64,
    /// Four chords, one per bar, cycling
    pub progression: ChordProgression,
    /// Base velocity for melody notes
    pub volume: u8,
    /// Bass rhythm selection
    pub bass_style: BassStyle,
    /// Ticks per quarter note
    pub ppqn: u16,
    /// RNG seed; `None` draws from the OS
    pub seed: Option<u64>,
    /// Melody probabilities
    pub melody: MelodyConfig,
}

impl Default for SongSettings {
    fn default() -> Self {
        Self {
            tempo: 120.0,
            bars: 16,
            progression: PRESETS[0].progression,
            volume: DEFAULT_VOLUME,
            bass_style: BassStyle::Whole,
            ppqn: DEFAULT_PPQN,
            seed: None,
            melody: MelodyConfig::default(),
        }
    }
}

/// A generated piece: one melody and one bass track
#[derive(Debug, Clone)]
pub struct Song {
    pub melody: Track,
    pub bass: Track,
    /// Tick resolution both tracks were generated at
    pub clock: MetricTicks,
    /// Number of bars generated
    pub bars: u64,
}

impl Song {
    /// Both tracks in file order
    pub fn tracks(&self) -> [&Track; 2] {
        [&self.melody, &self.bass]
    }
}

/// Drives the melody and bass generators bar by bar
#[derive(Debug, Clone)]
pub struct Composer {
    settings: SongSettings,
    melody: MelodyGenerator,
    bass: BassGenerator,
}

impl Composer {
    pub fn new(settings: SongSettings) -> Self {
        let melody = MelodyGenerator::with_config(settings.melody.clone());
        let bass = BassGenerator::new(settings.bass_style);
        Self {
            settings,
            melody,
            bass,
        }
    }

    pub fn settings(&self) -> &SongSettings {
        &self.settings
    }

    /// Generate the song, seeding the RNG from the settings
    pub fn compose(&self) -> Result<Song, GeneratorError> {
        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.compose_with_rng(&mut rng)
    }

    /// Generate the song from a caller-supplied random source
    pub fn compose_with_rng(&self, rng: &mut dyn RngCore) -> Result<Song, GeneratorError> {
        let settings = &self.settings;
        let clock = MetricTicks::new(settings.ppqn);
        let meter = Meter::COMMON_TIME;

        info!(
            bars = settings.bars,
            tempo = settings.tempo,
            bass = ?settings.bass_style,
            "Composing"
        );

        let mut melody = Track::new("Melody", meter, settings.tempo).with_channel(MELODY_CHANNEL);
        let mut bass = Track::new("Bass", meter, settings.tempo).with_channel(BASS_CHANNEL);
        let mut state = GenerationState::new();

        for _ in 0..settings.bars {
            let chord = current_chord(&settings.progression, state.bar);
            debug!(bar = state.bar, %chord, "Generating bar");

            let context = BarContext::new(chord, settings.volume).with_clock(clock);

            let melody_events = self.melody.generate_bar(&context, &mut state, rng)?;
            let bass_events = self.bass.generate_bar(&context, &mut state, rng)?;
            melody.extend(melody_events);
            bass.extend(bass_events);

            state.advance();
        }

        melody.close();
        bass.close();

        info!(
            melody_notes = melody.note_count(),
            bass_notes = bass.note_count(),
            "Composition complete"
        );

        Ok(Song {
            melody,
            bass,
            clock,
            bars: settings.bars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::EventKind;

    fn settings(bars: u64, seed: u64) -> SongSettings {
        SongSettings {
            bars,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_settings() {
        let s = SongSettings::default();
        assert_eq!(s.tempo, 120.0);
        assert_eq!(s.volume, 100);
        assert_eq!(s.ppqn, 96);
        assert_eq!(s.bass_style, BassStyle::Whole);
        assert_eq!(Some(s.progression), ChordProgression::preset("cgaf"));
    }

    #[test]
    fn test_song_length() {
        let song = Composer::new(settings(8, 1)).compose().unwrap();
        assert_eq!(song.bars, 8);
        assert_eq!(song.melody.duration_ticks(), 8 * 384);
        assert_eq!(song.bass.duration_ticks(), 8 * 384);
        assert!(song.melody.is_closed());
        assert!(song.bass.is_closed());
    }

    #[test]
    fn test_tracks_balanced() {
        let song = Composer::new(settings(32, 2)).compose().unwrap();
        for track in song.tracks() {
            assert!(track.is_balanced(), "{} has a dangling note", track.name());
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let a = Composer::new(settings(16, 99)).compose().unwrap();
        let b = Composer::new(settings(16, 99)).compose().unwrap();
        assert_eq!(a.melody.events(), b.melody.events());
        assert_eq!(a.bass.events(), b.bass.events());
    }

    #[test]
    fn test_bass_follows_progression() {
        let song = Composer::new(settings(5, 4)).compose().unwrap();
        let roots: Vec<u8> = song
            .bass
            .events()
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::NoteOn { pitch, .. } => Some(pitch),
                _ => None,
            })
            .step_by(3)
            .collect();
        // C4, G4, A4, F4, then C4 again, two octaves down
        assert_eq!(roots, vec![36, 43, 45, 41, 36]);
    }

    #[test]
    fn test_custom_resolution() {
        let song = Composer::new(SongSettings {
            bars: 4,
            ppqn: 480,
            seed: Some(6),
            ..Default::default()
        })
        .compose()
        .unwrap();
        assert_eq!(song.clock.ppqn(), 480);
        assert_eq!(song.melody.duration_ticks(), 4 * 1920);
        assert_eq!(song.bass.duration_ticks(), 4 * 1920);
    }

    #[test]
    fn test_zero_bars() {
        let song = Composer::new(settings(0, 0)).compose().unwrap();
        assert_eq!(song.melody.note_count(), 0);
        assert_eq!(song.melody.duration_ticks(), 0);
        assert_eq!(song.melody.events().len(), 3);
    }
}

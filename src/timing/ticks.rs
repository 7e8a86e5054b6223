// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Metric tick resolution and tempo conversion.
//!
//! All generated durations are whole numbers of ticks. At the default
//! 96 ticks per quarter note, eighth and quarter notes are exact.

use std::fmt;
use std::time::Duration;

/// Default ticks per quarter note for generated files
pub const DEFAULT_PPQN: u16 = 96;

/// Microseconds in one minute
const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// Largest value a tempo meta event can hold (24 bits)
pub const MAX_MICROS_PER_QUARTER: u32 = 0xFF_FFFF;

/// Time signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meter {
    pub numerator: u8,
    pub denominator: u8,
}

impl Meter {
    /// 4/4
    pub const COMMON_TIME: Meter = Meter {
        numerator: 4,
        denominator: 4,
    };

    /// Quarter-note beats in one bar
    pub fn quarters_per_bar(&self) -> u32 {
        self.numerator as u32 * 4 / self.denominator.max(1) as u32
    }
}

impl Default for Meter {
    fn default() -> Self {
        Meter::COMMON_TIME
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Tick resolution expressed as ticks per quarter note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricTicks {
    ppqn: u16,
}

impl MetricTicks {
    /// Create a resolution; zero is raised to one
    pub fn new(ppqn: u16) -> Self {
        Self { ppqn: ppqn.max(1) }
    }

    /// Ticks per quarter note
    pub fn ppqn(&self) -> u16 {
        self.ppqn
    }

    /// Ticks in a quarter note
    pub fn ticks_4th(&self) -> u32 {
        self.ppqn as u32
    }

    /// Ticks in an eighth note
    pub fn ticks_8th(&self) -> u32 {
        self.ppqn as u32 / 2
    }

    /// Ticks in one bar of the given meter
    pub fn ticks_per_bar(&self, meter: Meter) -> u32 {
        self.ticks_4th() * meter.quarters_per_bar()
    }
}

impl Default for MetricTicks {
    fn default() -> Self {
        Self::new(DEFAULT_PPQN)
    }
}

/// Microseconds per quarter note for a tempo, as stored in a tempo meta event.
///
/// Clamped to `1..=MAX_MICROS_PER_QUARTER`; see [`tempo_fits_meta_event`].
pub fn micros_per_quarter(bpm: f64) -> u32 {
    ((MICROS_PER_MINUTE / bpm) as u32).clamp(1, MAX_MICROS_PER_QUARTER)
}

/// Whether a tempo can be written to a tempo meta event without clamping
pub fn tempo_fits_meta_event(bpm: f64) -> bool {
    if !(bpm.is_finite() && bpm > 0.0) {
        return false;
    }
    let micros = MICROS_PER_MINUTE / bpm;
    (1.0..=MAX_MICROS_PER_QUARTER as f64).contains(&micros)
}

/// Wall-clock length of a number of ticks at a tempo
pub fn ticks_to_duration(ticks: u64, bpm: f64, resolution: MetricTicks) -> Duration {
    let micros = ticks as f64 * micros_per_quarter(bpm) as f64 / resolution.ppqn() as f64;
    Duration::from_micros(micros as u64)
}

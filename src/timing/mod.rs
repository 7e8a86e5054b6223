// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! This module provides tick resolution, meter and tempo conversion
//! utilities for the generators and the file writer.

pub mod ticks;

pub use ticks::{
    micros_per_quarter, tempo_fits_meta_event, ticks_to_duration, Meter, MetricTicks,
    DEFAULT_PPQN, MAX_MICROS_PER_QUARTER,
};

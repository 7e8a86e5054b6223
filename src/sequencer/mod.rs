// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song sequencing.
//!
//! This module provides:
//! - Append-only tracks with meter/tempo metadata
//! - The composer that walks the progression bar by bar

pub mod song;
pub mod track;

pub use song::{Composer, Song, SongSettings};
pub use track::Track;

//! Audio I/O utilities for the synthesis output and tests.
//!
//! Kept separate from the model itself: the model produces bare f32 samples
//! and this module handles the WAV container around them.

pub mod io;

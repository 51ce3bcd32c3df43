//! Low-level DSP primitives used by the graph nodes.
//!
//! Everything in here is plain math over slices. The oscillator and gain
//! helpers are allocation-free and safe to call from the audio callback. The
//! noise generators allocate their output buffer and are meant to run on the
//! control thread.

/// Gain-stage math: modulated levels and signal summing.
pub mod gain;
/// LFO period and swing helpers.
pub mod lfo;
/// Pink and white noise buffer synthesis.
pub mod noise;
/// Sine phase accumulator.
pub mod oscillator;

pub use noise::{generate_pink_noise, generate_white_noise};

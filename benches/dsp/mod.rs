//! Benchmarks for low-level DSP primitives.

mod gain;
mod noise;
mod oscillator;

pub use gain::bench_gain;
pub use noise::bench_noise;
pub use oscillator::bench_oscillator;

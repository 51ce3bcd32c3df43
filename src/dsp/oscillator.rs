//! Sine phase accumulator shared by audio-rate and control-rate oscillators.

use std::f32::consts::TAU;

/*
Phase Accumulation
==================

An oscillator keeps a running phase in [0.0, 1.0) that advances by
frequency / sample_rate each sample, and maps phase to amplitude:

    sample = sin(2π × phase)
    phase += frequency / sample_rate
    phase -= floor(phase)            (wrap back into [0, 1))

At 55 Hz and 48 kHz the phase advances ~0.00115 per sample, so one cycle
takes ~873 samples. At 0.2 Hz (an LFO) one cycle takes 240,000 samples, or
five seconds. Same math, different speed.

Keeping phase normalized (instead of accumulating radians or sample counts)
stops precision from decaying over long sessions: a drone may run for hours,
and an f32 sample counter would lose whole-sample resolution after ~6 minutes
at 48 kHz.
*/

#[derive(Debug, Default, Clone, Copy)]
pub struct SineOscillator {
    phase: f32,
}

impl SineOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current normalized phase in [0.0, 1.0)
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let sample = (TAU * self.phase).sin();
        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();
        sample
    }

    /// Fill `out` with consecutive samples at a constant frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let frequency = 55.0;
        let mut osc = SineOscillator::new();
        let mut buffer = vec![0.0f32; 256];

        osc.render(&mut buffer, frequency, sample_rate);

        // sample n should be sin(2pi f n / sr)
        for n in [0usize, 12, 100, 255] {
            let expected = (TAU * frequency * n as f32 / sample_rate).sin();
            assert!(
                (buffer[n] - expected).abs() < 1e-4,
                "sample {n}: expected {expected}, got {}",
                buffer[n]
            );
        }
    }

    #[test]
    fn phase_stays_normalized() {
        let mut osc = SineOscillator::new();
        let mut buffer = vec![0.0f32; 4096];
        // Frequency above Nyquist still keeps phase wrapped
        osc.render(&mut buffer, 30_000.0, 48_000.0);
        assert!((0.0..1.0).contains(&osc.phase()));
    }

    #[test]
    fn reset_returns_to_zero_crossing() {
        let mut osc = SineOscillator::new();
        let mut buffer = vec![0.0f32; 17];
        osc.render(&mut buffer, 440.0, 48_000.0);
        osc.reset();
        assert_eq!(osc.next_sample(440.0, 48_000.0), 0.0);
    }
}

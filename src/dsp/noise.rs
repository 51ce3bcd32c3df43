//! Noise buffer synthesis.

/*
Colored Noise
=============

Noise is a signal with no periodic structure: every sample is (close to)
independent of the one before it. "Color" describes how the noise's energy is
spread across the spectrum.

Vocabulary
----------

  white noise   Equal energy per Hz. Every frequency band of the same width
                carries the same power, so it sounds bright and hissy because
                most of the audible bandwidth sits in the upper octaves.

  pink noise    Equal energy per OCTAVE. Power falls by ~3 dB per octave
                (1/f). 20-40 Hz carries as much energy as 10-20 kHz. It sounds
                balanced and "rainy", and pairs well with a low drone.

  loop seam     We render a fixed-length buffer and play it on repeat. The
                last sample and the first sample are unrelated, so there is a
                tiny discontinuity every loop period. With a 5 second buffer
                it is inaudible under the drone and we leave it alone.


Paul Kellet's Refined Pink Filter
---------------------------------

A true 1/f slope needs an infinite filter. Kellet's approximation sums seven
one-pole lowpass sections of white noise, each tuned to cover a slice of the
spectrum, and is accurate to about ±0.05 dB above 9.2 Hz at 44.1 kHz:

    b0 = 0.99886 * b0 + white * 0.0555179
    b1 = 0.99332 * b1 + white * 0.0750759
    b2 = 0.96900 * b2 + white * 0.1538520
    b3 = 0.86650 * b3 + white * 0.3104856
    b4 = 0.55000 * b4 + white * 0.5329522
    b5 = -0.7616 * b5 - white * 0.0168980
    out = (b0 + b1 + b2 + b3 + b4 + b5 + b6 + white * 0.5362) * 0.11
    b6 = white * 0.115926

The 0.11 factor brings the sum back to roughly unit range. Peaks beyond ±1
are astronomically rare but not impossible, so the output is clamped.

State is zeroed on every call. Two buffers generated back to back share
nothing except their statistics.
*/

use rand::Rng;

use crate::error::DroneError;

/// Longest buffer the generators will render, in seconds
pub const MAX_DURATION_SECS: f32 = 60.0;
/// Largest buffer the generators will allocate (a minute at 192 kHz fits)
pub const MAX_FRAMES: usize = 16 * 1024 * 1024;

/// Accumulators for the Kellet pink filter.
#[derive(Debug, Default, Clone, Copy)]
pub struct PinkFilter {
    b: [f32; 7],
}

impl PinkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one white sample in [-1, 1], get one pink sample out.
    #[inline]
    pub fn process(&mut self, white: f32) -> f32 {
        let b = &mut self.b;
        b[0] = 0.99886 * b[0] + white * 0.055_517_9;
        b[1] = 0.99332 * b[1] + white * 0.075_075_9;
        b[2] = 0.96900 * b[2] + white * 0.153_852;
        b[3] = 0.86650 * b[3] + white * 0.310_485_6;
        b[4] = 0.55000 * b[4] + white * 0.532_952_2;
        b[5] = -0.7616 * b[5] - white * 0.016_898;
        let out = (b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + white * 0.5362) * 0.11;
        b[6] = white * 0.115_926;
        out.clamp(-1.0, 1.0)
    }
}

/// Number of frames a buffer of `duration_secs` holds at `sample_rate`.
///
/// Rejects durations that are non-positive, non-finite, longer than
/// [`MAX_DURATION_SECS`] or too short to produce a single frame.
pub fn frame_count(sample_rate: u32, duration_secs: f32) -> Result<usize, DroneError> {
    if sample_rate == 0 {
        return Err(DroneError::invalid("sample_rate", "must be non-zero"));
    }
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(DroneError::invalid(
            "duration_secs",
            format!("must be a positive number of seconds, got {}", duration_secs),
        ));
    }
    if duration_secs > MAX_DURATION_SECS {
        return Err(DroneError::invalid(
            "duration_secs",
            format!(
                "must be at most {} s, got {}",
                MAX_DURATION_SECS, duration_secs
            ),
        ));
    }

    let frames = (sample_rate as f64 * duration_secs as f64).round();
    if frames < 1.0 {
        return Err(DroneError::invalid(
            "duration_secs",
            format!(
                "{} s at {} Hz rounds to an empty buffer",
                duration_secs, sample_rate
            ),
        ));
    }
    if frames > MAX_FRAMES as f64 {
        return Err(DroneError::invalid(
            "duration_secs",
            format!(
                "{} s at {} Hz exceeds the {} frame limit",
                duration_secs, sample_rate, MAX_FRAMES
            ),
        ));
    }

    Ok(frames as usize)
}

/// Generate a loopable pink-noise buffer using the thread-local RNG.
pub fn generate_pink_noise(sample_rate: u32, duration_secs: f32) -> Result<Vec<f32>, DroneError> {
    generate_pink_noise_with_rng(sample_rate, duration_secs, &mut rand::thread_rng())
}

/// Generate a loopable pink-noise buffer from the given random source.
pub fn generate_pink_noise_with_rng<R: Rng + ?Sized>(
    sample_rate: u32,
    duration_secs: f32,
    rng: &mut R,
) -> Result<Vec<f32>, DroneError> {
    let frames = frame_count(sample_rate, duration_secs)?;
    let mut filter = PinkFilter::new();

    Ok((0..frames)
        .map(|_| filter.process(rng.gen_range(-1.0..=1.0)))
        .collect())
}

/// Generate a loopable white-noise buffer using the thread-local RNG.
pub fn generate_white_noise(sample_rate: u32, duration_secs: f32) -> Result<Vec<f32>, DroneError> {
    generate_white_noise_with_rng(sample_rate, duration_secs, &mut rand::thread_rng())
}

/// Generate a loopable white-noise buffer from the given random source.
pub fn generate_white_noise_with_rng<R: Rng + ?Sized>(
    sample_rate: u32,
    duration_secs: f32,
    rng: &mut R,
) -> Result<Vec<f32>, DroneError> {
    let frames = frame_count(sample_rate, duration_secs)?;

    Ok((0..frames).map(|_| rng.gen_range(-1.0..=1.0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_pink_length_matches_rounded_duration() {
        for (sample_rate, duration, expected) in [(44_100, 1.0, 44_100), (48_000, 0.5, 24_000)] {
            let buffer = generate_pink_noise(sample_rate, duration).unwrap();
            assert_eq!(buffer.len(), expected);
        }

        // 22050 * 0.0001 = 2.205 -> 2 frames
        assert_eq!(generate_pink_noise(22_050, 0.0001).unwrap().len(), 2);
        // 22050 * 0.00003 = 0.6615 -> 1 frame
        assert_eq!(generate_pink_noise(22_050, 0.000_03).unwrap().len(), 1);
    }

    #[test]
    fn test_pink_samples_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let buffer = generate_pink_noise_with_rng(48_000, 2.0, &mut rng).unwrap();

        for &sample in &buffer {
            assert!(
                (-1.0..=1.0).contains(&sample),
                "pink sample {} out of range [-1.0, 1.0]",
                sample
            );
        }
    }

    #[test]
    fn test_pink_is_not_silent() {
        let buffer = generate_pink_noise(48_000, 0.1).unwrap();
        let rms = (buffer.iter().map(|s| s * s).sum::<f32>() / buffer.len() as f32).sqrt();
        assert!(rms > 0.01, "pink noise rms too low: {}", rms);
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        assert!(matches!(
            generate_pink_noise(44_100, 0.0),
            Err(DroneError::InvalidArgument { name: "duration_secs", .. })
        ));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        assert!(matches!(
            generate_pink_noise(44_100, -1.0),
            Err(DroneError::InvalidArgument { .. })
        ));
        assert!(matches!(
            generate_white_noise(44_100, -0.5),
            Err(DroneError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_non_finite_duration_is_rejected() {
        assert!(generate_pink_noise(44_100, f32::NAN).is_err());
        assert!(generate_pink_noise(44_100, f32::INFINITY).is_err());
    }

    #[test]
    fn test_zero_sample_rate_is_rejected() {
        assert!(matches!(
            generate_white_noise(0, 1.0),
            Err(DroneError::InvalidArgument { name: "sample_rate", .. })
        ));
    }

    #[test]
    fn test_sub_frame_duration_is_rejected() {
        // 1000 Hz * 0.0001 s = 0.1 frames -> rounds to 0
        assert!(generate_pink_noise(1_000, 0.0001).is_err());
    }

    #[test]
    fn test_oversized_duration_is_rejected() {
        for duration in [1e15, MAX_DURATION_SECS + 1.0] {
            assert!(matches!(
                generate_pink_noise(44_100, duration),
                Err(DroneError::InvalidArgument { name: "duration_secs", .. })
            ));
            assert!(matches!(
                generate_white_noise(44_100, duration),
                Err(DroneError::InvalidArgument { name: "duration_secs", .. })
            ));
        }
        assert_eq!(frame_count(100, MAX_DURATION_SECS).unwrap(), 6_000);
        // Within the time limit but too many frames at an absurd rate
        assert!(frame_count(u32::MAX, 30.0).is_err());
        assert!(frame_count(192_000, MAX_DURATION_SECS).is_ok());
    }

    #[test]
    fn test_same_seed_reproduces_buffer() {
        let a = generate_pink_noise_with_rng(8_000, 0.25, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_pink_noise_with_rng(8_000, 0.25, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_calls_do_not_share_state() {
        let a = generate_pink_noise(8_000, 0.25).unwrap();
        let b = generate_pink_noise(8_000, 0.25).unwrap();
        assert_ne!(a, b, "two independent calls produced identical buffers");
    }

    #[test]
    fn test_white_samples_in_range() {
        let buffer = generate_white_noise(48_000, 1.0).unwrap();
        assert_eq!(buffer.len(), 48_000);
        assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_filter_starts_from_rest() {
        // With zeroed state, a single impulse passes through as the sum of
        // the input gains only.
        let mut filter = PinkFilter::new();
        let first = filter.process(1.0);
        let expected = (0.0555179 + 0.0750759 + 0.153852 + 0.3104856 + 0.5329522 - 0.016898
            + 0.5362)
            * 0.11;
        assert!((first - expected).abs() < 1e-6, "expected {expected}, got {first}");
    }

    #[test]
    fn test_pink_has_more_low_end_than_white() {
        // Lag-one autocorrelation: white noise ~ 0, pink noise strongly positive.
        fn lag_one(buffer: &[f32]) -> f32 {
            let energy: f32 = buffer.iter().map(|s| s * s).sum();
            let cross: f32 = buffer.windows(2).map(|w| w[0] * w[1]).sum();
            cross / energy
        }

        let mut rng = StdRng::seed_from_u64(3);
        let pink = generate_pink_noise_with_rng(48_000, 1.0, &mut rng).unwrap();
        let white = generate_white_noise_with_rng(48_000, 1.0, &mut rng).unwrap();

        assert!(lag_one(&pink) > 0.3, "pink lag-one correlation {}", lag_one(&pink));
        assert!(lag_one(&white).abs() < 0.05, "white lag-one correlation {}", lag_one(&white));
    }
}

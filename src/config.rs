//! Session settings that take effect at the next `start`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::noise::{generate_pink_noise, generate_white_noise, MAX_DURATION_SECS},
    error::DroneError,
};

/// Smallest command queue that still fits a start, a pending teardown and a
/// burst of slider writes.
pub const MIN_COMMAND_CAPACITY: usize = 8;

/// Minor pentatonic bass scale the tone is tuned to.
///
/// The tone's frequency is fixed for a whole play session; picking a new note
/// only changes what the next session plays.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleNote {
    /// Root
    #[default]
    A1,
    /// Minor third
    CSharp2,
    /// Perfect fourth
    D2,
    /// Perfect fifth
    E2,
    /// Minor seventh
    GSharp2,
}

impl ScaleNote {
    pub const ALL: [ScaleNote; 5] = [
        ScaleNote::A1,
        ScaleNote::CSharp2,
        ScaleNote::D2,
        ScaleNote::E2,
        ScaleNote::GSharp2,
    ];

    pub fn frequency(self) -> f32 {
        match self {
            ScaleNote::A1 => 55.00,
            ScaleNote::CSharp2 => 69.30,
            ScaleNote::D2 => 73.42,
            ScaleNote::E2 => 82.41,
            ScaleNote::GSharp2 => 103.83,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleNote::A1 => "A1",
            ScaleNote::CSharp2 => "C#2",
            ScaleNote::D2 => "D2",
            ScaleNote::E2 => "E2",
            ScaleNote::GSharp2 => "G#2",
        }
    }

    /// Next note up the scale, wrapping back to the root
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|n| *n == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Spectrum of the noise bed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseColor {
    #[default]
    Pink,
    White,
}

impl NoiseColor {
    /// Render a fresh loopable buffer of this color.
    pub fn generate(self, sample_rate: u32, duration_secs: f32) -> Result<Vec<f32>, DroneError> {
        match self {
            NoiseColor::Pink => generate_pink_noise(sample_rate, duration_secs),
            NoiseColor::White => generate_white_noise(sample_rate, duration_secs),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NoiseColor::Pink => "pink",
            NoiseColor::White => "white",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            NoiseColor::Pink => NoiseColor::White,
            NoiseColor::White => NoiseColor::Pink,
        }
    }
}

/// Settings for the controller.
///
/// # Example
/// ```
/// use lowdrone::{NoiseColor, ScaleNote, SynthConfig};
///
/// let config = SynthConfig::new()
///     .note(ScaleNote::E2)
///     .noise_color(NoiseColor::Pink)
///     .noise_duration(3.0);
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Length of the looped noise buffer in seconds (the loop period)
    pub noise_duration_secs: f32,
    pub noise_color: NoiseColor,
    pub note: ScaleNote,
    /// Slots in the control-to-audio command queue
    pub command_capacity: usize,
}

impl SynthConfig {
    pub fn new() -> Self {
        Self {
            noise_duration_secs: 5.0,
            noise_color: NoiseColor::Pink,
            note: ScaleNote::A1,
            command_capacity: 256,
        }
    }

    pub fn noise_duration(mut self, seconds: f32) -> Self {
        self.noise_duration_secs = seconds;
        self
    }

    pub fn noise_color(mut self, color: NoiseColor) -> Self {
        self.noise_color = color;
        self
    }

    pub fn note(mut self, note: ScaleNote) -> Self {
        self.note = note;
        self
    }

    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), DroneError> {
        let seconds = self.noise_duration_secs;
        if !seconds.is_finite() || seconds <= 0.0 || seconds > MAX_DURATION_SECS {
            return Err(DroneError::invalid(
                "noise_duration_secs",
                format!(
                    "must be within (0, {}] seconds, got {}",
                    MAX_DURATION_SECS, seconds
                ),
            ));
        }
        if self.command_capacity < MIN_COMMAND_CAPACITY {
            return Err(DroneError::invalid(
                "command_capacity",
                format!(
                    "must be at least {}, got {}",
                    MIN_COMMAND_CAPACITY, self.command_capacity
                ),
            ));
        }
        Ok(())
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self::new()
    }
}

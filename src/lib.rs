pub mod config; // Session settings: noise color, scale note, queue sizing
pub mod context; // Process-wide audio context (device + command queue + topology)
pub mod control; // Play/stop state machine and live parameters
pub mod device; // Output device backends
pub mod dsp;
pub mod error;
pub mod graph; // Signal graph nodes, topology and renderer

pub use config::{NoiseColor, ScaleNote, SynthConfig};
pub use control::{ParamName, PlaybackState, SignalGraphController};
pub use error::DroneError;

pub const MAX_BLOCK_SIZE: usize = 2048;

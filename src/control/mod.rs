//! Play/stop control and the live parameters that follow it.

mod controller;
pub mod params;

pub use controller::{PlaybackSession, PlaybackState, SignalGraphController};
pub use params::{AudioParameter, ParamBinding, ParamName, ParameterSet};

//! Output device backends.
//!
//! A device owns the render side of the graph: it is handed the command
//! consumer when it is opened and drives a [`GraphRenderer`](crate::graph::GraphRenderer)
//! from its own clock. The controller only ever talks to it through
//! [`AudioDevice`].

pub mod offline;
pub mod stream;

use rtrb::Consumer;

use crate::{error::DroneError, graph::GraphCommand};

pub use offline::OfflineDevice;
pub use stream::CpalDevice;

/// A running (or resumable) audio output.
pub trait AudioDevice {
    fn sample_rate(&self) -> u32;

    /// Start or restart pulling audio. Devices open suspended, and this must
    /// succeed before any node is built.
    fn resume(&mut self) -> Result<(), DroneError>;

    /// Stop pulling audio. Queued commands stay queued.
    fn suspend(&mut self) -> Result<(), DroneError>;
}

/// Opens the device the first time the controller needs one.
pub trait DeviceFactory {
    type Device: AudioDevice;

    fn open(&mut self, commands: Consumer<GraphCommand>) -> Result<Self::Device, DroneError>;
}

impl<F, D> DeviceFactory for F
where
    F: FnMut(Consumer<GraphCommand>) -> Result<D, DroneError>,
    D: AudioDevice,
{
    type Device = D;

    fn open(&mut self, commands: Consumer<GraphCommand>) -> Result<Self::Device, DroneError> {
        self(commands)
    }
}

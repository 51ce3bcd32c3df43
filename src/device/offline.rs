//! A device with no clock of its own: audio is rendered when asked.
//!
//! Useful for tests, benches and rendering a drone to a buffer.

use rtrb::Consumer;

use crate::{
    device::AudioDevice,
    error::DroneError,
    graph::{GraphCommand, GraphRenderer},
};

pub struct OfflineDevice {
    renderer: GraphRenderer,
    running: bool,
    resume_denied: bool,
}

impl OfflineDevice {
    pub fn new(sample_rate: u32, commands: Consumer<GraphCommand>) -> Self {
        Self {
            renderer: GraphRenderer::new(sample_rate, commands),
            running: false,
            resume_denied: false,
        }
    }

    /// Factory for [`SignalGraphController::new`](crate::SignalGraphController::new).
    pub fn factory(
        sample_rate: u32,
    ) -> impl FnMut(Consumer<GraphCommand>) -> Result<OfflineDevice, DroneError> {
        move |commands| Ok(OfflineDevice::new(sample_rate, commands))
    }

    /// Make every `resume` fail, like a platform refusing to start audio.
    pub fn deny_resume(mut self) -> Self {
        self.resume_denied = true;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn renderer(&self) -> &GraphRenderer {
        &self.renderer
    }

    /// Pull `out.len()` frames. A suspended device outputs silence and leaves
    /// its commands queued.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.running {
            self.renderer.render(out);
        } else {
            out.fill(0.0);
        }
    }
}

impl AudioDevice for OfflineDevice {
    fn sample_rate(&self) -> u32 {
        self.renderer.sample_rate()
    }

    fn resume(&mut self) -> Result<(), DroneError> {
        if self.resume_denied {
            return Err(DroneError::device("resume denied by platform"));
        }
        self.running = true;
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), DroneError> {
        self.running = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        command::{LiveNode, Subgraph},
        gain::GainNode,
        oscillator::OscNode,
        Connection, Destination, NodeId,
    };
    use rtrb::RingBuffer;

    #[test]
    fn suspended_device_is_silent_and_keeps_commands() {
        let (mut tx, rx) = RingBuffer::new(4);
        let mut device = OfflineDevice::new(48_000, rx);
        let tone = NodeId::from_raw(1);
        let gain = NodeId::from_raw(2);
        tx.push(GraphCommand::Attach(Subgraph {
            nodes: vec![
                LiveNode::new(tone, OscNode::sine(55.0)),
                LiveNode::new(gain, GainNode::new(1.0)),
            ],
            connections: vec![
                Connection {
                    from: tone,
                    to: Destination::Node(gain),
                },
                Connection {
                    from: gain,
                    to: Destination::Output,
                },
            ],
            order: vec![tone, gain],
        }))
        .unwrap();

        let mut out = vec![1.0; 512];
        device.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(device.renderer().node_count(), 0);

        device.resume().unwrap();
        device.render(&mut out);
        assert_eq!(device.renderer().node_count(), 2);
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn denied_resume_reports_device_unavailable() {
        let (_tx, rx) = RingBuffer::new(4);
        let mut device = OfflineDevice::new(48_000, rx).deny_resume();
        assert!(matches!(
            device.resume(),
            Err(DroneError::DeviceUnavailable(_))
        ));
        assert!(!device.is_running());
    }
}

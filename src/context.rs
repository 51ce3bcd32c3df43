//! The process-wide audio context.
//!
//! One `AudioContext` owns the output device, the producer end of the command
//! queue and the control-side [`Topology`]. It is opened the first time the
//! controller starts and then lives as long as the controller does.
//!
//! ```text
//!   control thread                         audio thread
//!  ┌──────────────────────┐   rtrb queue  ┌──────────────────┐
//!  │ AudioContext         │ ────────────▶ │ GraphRenderer    │
//!  │  topology (petgraph) │  GraphCommand │  (inside device) │
//!  │  PatchBuilder        │               └──────────────────┘
//!  └──────────────────────┘
//! ```
//!
//! Nodes are built and validated on the control side and reach the renderer
//! in a single `Attach`, so a patch is either wholly live or not at all.

use std::{thread, time::Duration};

use rtrb::{Producer, PushError, RingBuffer};
use tracing::{debug, warn};

use crate::{
    device::{AudioDevice, DeviceFactory},
    error::DroneError,
    graph::{
        Connection, Destination, GraphCommand, GraphNode, LiveNode, NodeId, NodeKind, ParamKind,
        Subgraph, Topology,
    },
};

/// How many times a full queue is retried before the device counts as stalled
const SEND_ATTEMPTS: usize = 25;
const SEND_BACKOFF: Duration = Duration::from_micros(200);

pub struct AudioContext<D: AudioDevice> {
    device: D,
    commands: Producer<GraphCommand>,
    topology: Topology,
    /// Nodes already gone from the topology whose `Detach` is not yet queued
    pending_teardown: Option<Vec<NodeId>>,
}

impl<D: AudioDevice> AudioContext<D> {
    /// Create the command queue and hand its consumer to a freshly opened device.
    pub fn open<F>(factory: &mut F, capacity: usize) -> Result<Self, DroneError>
    where
        F: DeviceFactory<Device = D>,
    {
        let (commands, consumer) = RingBuffer::new(capacity);
        let device = factory.open(consumer)?;
        Ok(Self {
            device,
            commands,
            topology: Topology::new(),
            pending_teardown: None,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.device.sample_rate()
    }

    pub fn resume(&mut self) -> Result<(), DroneError> {
        self.device.resume()
    }

    pub fn suspend(&mut self) -> Result<(), DroneError> {
        self.device.suspend()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn has_pending_teardown(&self) -> bool {
        self.pending_teardown.is_some()
    }

    /// Queue a teardown that could not be delivered earlier.
    pub fn flush_pending(&mut self) -> Result<(), DroneError> {
        let Some(ids) = self.pending_teardown.take() else {
            return Ok(());
        };
        match self.send(GraphCommand::Detach(ids)) {
            Ok(()) => {
                debug!("delivered pending teardown");
                Ok(())
            }
            Err(GraphCommand::Detach(ids)) => {
                self.pending_teardown = Some(ids);
                Err(DroneError::device("renderer is not draining commands"))
            }
            Err(_) => Err(DroneError::device("renderer is not draining commands")),
        }
    }

    /// Start describing a set of nodes to attach in one step.
    pub fn patch(&mut self) -> PatchBuilder<'_, D> {
        PatchBuilder {
            context: self,
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Remove nodes from the topology and queue their removal from the renderer.
    ///
    /// If the queue stays full the removal is kept pending and delivered ahead
    /// of the next attach. The topology forgets the nodes either way.
    pub fn detach(&mut self, ids: Vec<NodeId>) -> Result<(), DroneError> {
        self.topology.remove_nodes(&ids);

        let ids = match self.pending_teardown.take() {
            Some(mut pending) => {
                pending.extend(ids);
                pending
            }
            None => ids,
        };

        match self.send(GraphCommand::Detach(ids)) {
            Ok(()) => Ok(()),
            Err(returned) => {
                if let GraphCommand::Detach(ids) = returned {
                    warn!(nodes = ids.len(), "teardown could not be queued, keeping it pending");
                    self.pending_teardown = Some(ids);
                }
                Err(DroneError::device("renderer is not draining commands"))
            }
        }
    }

    /// Queue an immediate write of a live node's parameter.
    pub fn set_param(
        &mut self,
        node: NodeId,
        param: ParamKind,
        value: f32,
    ) -> Result<(), DroneError> {
        match self.topology.kind(node) {
            Some(kind) if kind.has_param(param) => {}
            _ => {
                return Err(DroneError::invalid(
                    "node",
                    format!("{} has no {:?} parameter", node, param),
                ))
            }
        }

        self.send(GraphCommand::SetParam { node, param, value })
            .map_err(|_| DroneError::device("renderer is not draining commands"))
    }

    /// Push with a short bounded retry. Hands the command back if the queue
    /// stays full or the renderer is gone.
    fn send(&mut self, command: GraphCommand) -> Result<(), GraphCommand> {
        let mut pending = command;
        for attempt in 0..SEND_ATTEMPTS {
            match self.commands.push(pending) {
                Ok(()) => return Ok(()),
                Err(PushError::Full(returned)) => {
                    if self.commands.is_abandoned() {
                        return Err(returned);
                    }
                    pending = returned;
                    if attempt + 1 < SEND_ATTEMPTS {
                        thread::sleep(SEND_BACKOFF);
                    }
                }
            }
        }
        Err(pending)
    }
}

impl<D: AudioDevice> std::fmt::Debug for AudioContext<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioContext")
            .field("sample_rate", &self.device.sample_rate())
            .field("topology", &self.topology)
            .field("pending_teardown", &self.pending_teardown)
            .finish()
    }
}

/// Collects nodes and edges, then validates and attaches them together.
pub struct PatchBuilder<'a, D: AudioDevice> {
    context: &'a mut AudioContext<D>,
    nodes: Vec<(NodeKind, LiveNode)>,
    connections: Vec<Connection>,
}

impl<'a, D: AudioDevice> PatchBuilder<'a, D> {
    /// Add a node and get the id it will have once committed.
    pub fn add<N: GraphNode + 'static>(&mut self, kind: NodeKind, node: N) -> NodeId {
        let id = self.context.topology.allocate_id();
        self.nodes.push((kind, LiveNode::new(id, node)));
        id
    }

    pub fn connect(&mut self, from: NodeId, to: Destination) -> &mut Self {
        self.connections.push(Connection { from, to });
        self
    }

    /// Validate the patch against the current topology and queue it as one
    /// `Attach`. On any failure nothing is added.
    pub fn commit(self) -> Result<Vec<NodeId>, DroneError> {
        let PatchBuilder {
            context,
            nodes,
            connections,
        } = self;

        context.flush_pending()?;

        let ids: Vec<NodeId> = nodes.iter().map(|(_, live)| live.id()).collect();
        let order = match Self::wire(&mut context.topology, &nodes, &connections) {
            Ok(order) => order,
            Err(err) => {
                context.topology.remove_nodes(&ids);
                return Err(err);
            }
        };

        let subgraph = Subgraph {
            nodes: nodes.into_iter().map(|(_, live)| live).collect(),
            connections,
            order,
        };
        if context.send(GraphCommand::Attach(subgraph)).is_err() {
            context.topology.remove_nodes(&ids);
            return Err(DroneError::device("renderer is not draining commands"));
        }

        debug!(nodes = ids.len(), "attached patch");
        Ok(ids)
    }

    fn wire(
        topology: &mut Topology,
        nodes: &[(NodeKind, LiveNode)],
        connections: &[Connection],
    ) -> Result<Vec<NodeId>, DroneError> {
        for (kind, live) in nodes {
            topology.add_node(live.id(), *kind)?;
        }
        for connection in connections {
            topology.connect(*connection)?;
        }
        topology.render_order()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        device::OfflineDevice,
        graph::{gain::GainNode, lfo::LfoNode, oscillator::OscNode},
    };

    fn context(capacity: usize) -> AudioContext<OfflineDevice> {
        let mut factory = OfflineDevice::factory(1_000);
        AudioContext::open(&mut factory, capacity).unwrap()
    }

    fn tone_patch(context: &mut AudioContext<OfflineDevice>) -> Result<Vec<NodeId>, DroneError> {
        let mut patch = context.patch();
        let tone = patch.add(NodeKind::Oscillator, OscNode::sine(55.0));
        let gain = patch.add(NodeKind::Gain, GainNode::new(0.5));
        patch
            .connect(tone, Destination::Node(gain))
            .connect(gain, Destination::Output);
        patch.commit()
    }

    #[test]
    fn commit_updates_topology_and_renderer() {
        let mut context = context(8);
        context.resume().unwrap();
        let ids = tone_patch(&mut context).unwrap();

        assert_eq!(context.topology().node_count(), 2);
        assert!(ids.iter().all(|id| context.topology().reaches_output(*id)));

        let mut out = vec![0.0; 100];
        context.device_mut().render(&mut out);
        assert_eq!(context.device().renderer().node_count(), 2);
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn invalid_patch_leaves_topology_untouched() {
        let mut context = context(8);
        let mut patch = context.patch();
        let tone = patch.add(NodeKind::Oscillator, OscNode::sine(55.0));
        let lfo = patch.add(NodeKind::Lfo, LfoNode::sine(1.0, 0.1));
        patch.connect(lfo, Destination::Node(tone));

        assert!(matches!(
            patch.commit(),
            Err(DroneError::InvalidArgument { .. })
        ));
        assert_eq!(context.topology().node_count(), 0);
        assert_eq!(context.topology().edge_count(), 0);
    }

    #[test]
    fn full_queue_rolls_back_attach() {
        let mut context = context(1);
        context.resume().unwrap();
        tone_patch(&mut context).unwrap();

        // The renderer has not pulled a block, so the only slot is taken
        let err = tone_patch(&mut context).unwrap_err();
        assert!(matches!(err, DroneError::DeviceUnavailable(_)));
        assert_eq!(context.topology().node_count(), 2);
    }

    #[test]
    fn stalled_teardown_is_delivered_before_next_attach() {
        let mut context = context(1);
        context.resume().unwrap();
        let ids = tone_patch(&mut context).unwrap();

        assert!(context.detach(ids).is_err());
        assert!(context.has_pending_teardown());
        assert_eq!(context.topology().node_count(), 0);

        // Renderer drains the attach, freeing the slot for the teardown
        context.device_mut().render(&mut [0.0; 16]);
        assert_eq!(context.device().renderer().node_count(), 2);

        context.flush_pending().unwrap();
        assert!(!context.has_pending_teardown());
        context.device_mut().render(&mut [0.0; 16]);
        assert_eq!(context.device().renderer().node_count(), 0);
    }

    #[test]
    fn set_param_rejects_missing_parameters() {
        let mut context = context(8);
        let ids = tone_patch(&mut context).unwrap();
        let (tone, gain) = (ids[0], ids[1]);

        assert!(context.set_param(gain, ParamKind::Gain, 0.7).is_ok());
        assert!(context.set_param(tone, ParamKind::Gain, 0.7).is_err());
        assert!(context
            .set_param(NodeId::from_raw(99), ParamKind::Gain, 0.7)
            .is_err());
    }
}

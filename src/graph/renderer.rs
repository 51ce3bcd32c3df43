//! Render side of the signal graph.
//!
//! `GraphRenderer` lives on the audio thread. It owns the live nodes and
//! edges, drains the command queue at the top of every block, and renders the
//! nodes in the order the control side computed. Everything it needs is
//! allocated before it arrives, so rendering does not allocate.
//!
//! Freeing does happen here: a `Detach` drops the retired nodes (noise loop
//! included) and an `Attach` drops its emptied `Subgraph`, both on the audio
//! thread. That is at most once per play/stop cycle.

use rtrb::{Consumer, Producer};

use crate::{
    dsp::gain::sum_in_place,
    graph::{
        command::{GraphCommand, LiveNode, Subgraph},
        node::{Connection, Destination, NodeId, ParamKind, RenderCtx},
    },
    MAX_BLOCK_SIZE,
};

/// Nodes the renderer can hold without reallocating
pub const NODE_CAPACITY: usize = 64;
const CONNECTION_CAPACITY: usize = NODE_CAPACITY * 2;

pub struct GraphRenderer {
    sample_rate: u32,
    commands: Consumer<GraphCommand>,
    /// Live nodes, kept in render order (sources before their consumers)
    nodes: Vec<LiveNode>,
    connections: Vec<Connection>,
    /// Scratch for summing a node's audio input
    input: Vec<f32>,
    /// Scratch for summing a node's gain modulation
    modulation: Vec<f32>,
    /// Optional copy of the mixed output for scopes and analyzers
    tap: Option<Producer<f32>>,
    last_block_len: usize,
}

impl GraphRenderer {
    pub fn new(sample_rate: u32, commands: Consumer<GraphCommand>) -> Self {
        Self {
            sample_rate,
            commands,
            nodes: Vec::with_capacity(NODE_CAPACITY),
            connections: Vec::with_capacity(CONNECTION_CAPACITY),
            input: vec![0.0; MAX_BLOCK_SIZE],
            modulation: vec![0.0; MAX_BLOCK_SIZE],
            tap: None,
            last_block_len: 0,
        }
    }

    /// Mirror every rendered output sample into `tap`. Samples are dropped
    /// when the tap is full.
    pub fn with_tap(mut self, tap: Producer<f32>) -> Self {
        self.tap = Some(tap);
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Current base value of a live node's parameter
    pub fn param(&self, id: NodeId, param: ParamKind) -> Option<f32> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .and_then(|n| n.node.get_param(param))
    }

    /// What a node produced during the most recent block
    pub fn node_output(&self, id: NodeId) -> Option<&[f32]> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| &n.output[..self.last_block_len])
    }

    /// Apply every queued command, oldest first
    pub fn process_commands(&mut self) {
        while let Ok(command) = self.commands.pop() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: GraphCommand) {
        match command {
            GraphCommand::Attach(subgraph) => self.attach(subgraph),
            GraphCommand::Detach(ids) => {
                self.nodes.retain(|n| !ids.contains(&n.id));
                self.connections
                    .retain(|c| !ids.contains(&c.from) && !ids.contains(&c.to.node()));
            }
            GraphCommand::SetParam { node, param, value } => {
                if let Some(live) = self.nodes.iter_mut().find(|n| n.id == node) {
                    live.node.set_param(param, value);
                }
            }
        }
    }

    fn attach(&mut self, mut subgraph: Subgraph) {
        self.nodes.extend(subgraph.nodes.drain(..));
        self.connections.extend_from_slice(&subgraph.connections);

        let order = &subgraph.order;
        self.nodes.sort_unstable_by_key(|n| {
            order
                .iter()
                .position(|id| *id == n.id)
                .unwrap_or(usize::MAX)
        });
    }

    /// Render any number of frames, in blocks of at most `MAX_BLOCK_SIZE`.
    ///
    /// Commands are picked up at every block boundary.
    pub fn render(&mut self, out: &mut [f32]) {
        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.process_commands();
            self.render_block(block);
        }
    }

    fn render_block(&mut self, out: &mut [f32]) {
        let len = out.len();
        debug_assert!(len <= MAX_BLOCK_SIZE);

        for idx in 0..self.nodes.len() {
            // Render order puts every source to the left of its consumers
            let (upstream, rest) = self.nodes.split_at_mut(idx);
            let current = &mut rest[0];

            let input = &mut self.input[..len];
            let modulation = &mut self.modulation[..len];
            input.fill(0.0);
            modulation.fill(0.0);

            for connection in &self.connections {
                let target: &mut [f32] = match connection.to {
                    Destination::Node(id) if id == current.id => &mut *input,
                    Destination::Param(id, ParamKind::Gain) if id == current.id => {
                        &mut *modulation
                    }
                    _ => continue,
                };
                if let Some(source) = upstream.iter().find(|n| n.id == connection.from) {
                    sum_in_place(target, &source.output[..len]);
                }
            }

            let ctx = RenderCtx {
                sample_rate: self.sample_rate as f32,
                input: &*input,
                modulation: &*modulation,
            };
            current.node.render_block(&mut current.output[..len], &ctx);
        }

        out.fill(0.0);
        for connection in &self.connections {
            if connection.to != Destination::Output {
                continue;
            }
            if let Some(source) = self.nodes.iter().find(|n| n.id == connection.from) {
                sum_in_place(out, &source.output[..len]);
            }
        }
        self.last_block_len = len;

        if let Some(tap) = self.tap.as_mut() {
            for &sample in out.iter() {
                if tap.push(sample).is_err() {
                    break;
                }
            }
        }
    }
}

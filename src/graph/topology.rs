//! Control-side view of the signal graph.
//!
//! The renderer only knows a flat list of nodes and edges. The topology keeps
//! the same graph as a petgraph `StableDiGraph` on the control thread, where
//! allocation is fine. Connections are validated here and the render order is
//! computed here, so the audio thread never runs graph algorithms. It is also
//! how callers inspect what is currently wired up.

use std::collections::HashMap;

use petgraph::{
    algo::{has_path_connecting, toposort},
    stable_graph::{NodeIndex, StableDiGraph},
    visit::EdgeRef,
    Direction,
};

use crate::{
    error::DroneError,
    graph::{
        node::{Connection, Destination, NodeId, NodeKind, ParamKind},
        renderer::NODE_CAPACITY,
    },
};

/// Which side of a node an edge lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    Input,
    Param(ParamKind),
}

#[derive(Debug, Clone, Copy)]
struct Vertex {
    id: NodeId,
    kind: NodeKind,
}

#[derive(Debug)]
pub struct Topology {
    graph: StableDiGraph<Vertex, Port>,
    indices: HashMap<NodeId, NodeIndex>,
    next_id: u32,
}

impl Topology {
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let output = graph.add_node(Vertex {
            id: NodeId::OUTPUT,
            kind: NodeKind::Output,
        });
        let mut indices = HashMap::new();
        indices.insert(NodeId::OUTPUT, output);

        Self {
            graph,
            indices,
            next_id: NodeId::OUTPUT.raw() + 1,
        }
    }

    pub(crate) fn allocate_id(&mut self) -> NodeId {
        let id = NodeId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn add_node(&mut self, id: NodeId, kind: NodeKind) -> Result<(), DroneError> {
        if kind == NodeKind::Output || self.indices.contains_key(&id) {
            return Err(DroneError::invalid(
                "node",
                format!("{} cannot be added twice", id),
            ));
        }
        if self.node_count() >= NODE_CAPACITY {
            return Err(DroneError::invalid(
                "node",
                format!("graph is full ({} nodes)", NODE_CAPACITY),
            ));
        }

        let index = self.graph.add_node(Vertex { id, kind });
        self.indices.insert(id, index);
        Ok(())
    }

    /// Add an edge after checking both ends can take it. Connecting the same
    /// pair of ports twice is a no-op.
    pub(crate) fn connect(&mut self, connection: Connection) -> Result<(), DroneError> {
        let from = match self.vertex(connection.from) {
            Some((index, vertex)) if vertex.kind != NodeKind::Output => index,
            _ => {
                return Err(DroneError::invalid(
                    "connection",
                    format!("{} is not a source node", connection.from),
                ))
            }
        };

        let target = connection.to.node();
        let (to, kind) = match self.vertex(target) {
            Some((index, vertex)) => (index, vertex.kind),
            None => {
                return Err(DroneError::invalid(
                    "connection",
                    format!("unknown target node {}", target),
                ))
            }
        };

        let port = match connection.to {
            Destination::Output | Destination::Node(_) if kind.accepts_input() => Port::Input,
            Destination::Param(_, param) if kind.accepts_modulation(param) => Port::Param(param),
            other => {
                return Err(DroneError::invalid(
                    "connection",
                    format!("{:?} node cannot take {:?}", kind, other),
                ))
            }
        };

        let exists = self
            .graph
            .edges(from)
            .any(|e| e.target() == to && *e.weight() == port);
        if !exists {
            self.graph.add_edge(from, to, port);
        }
        Ok(())
    }

    /// Remove nodes and every edge touching them. The output sink stays.
    pub(crate) fn remove_nodes(&mut self, ids: &[NodeId]) {
        for id in ids {
            if *id == NodeId::OUTPUT {
                continue;
            }
            if let Some(index) = self.indices.remove(id) {
                self.graph.remove_node(index);
            }
        }
    }

    /// Every node except the output sink, sources before consumers.
    pub fn render_order(&self) -> Result<Vec<NodeId>, DroneError> {
        let sorted = toposort(&self.graph, None).map_err(|cycle| {
            DroneError::invalid(
                "connection",
                format!("graph has a cycle through {}", self.graph[cycle.node_id()].id),
            )
        })?;

        Ok(sorted
            .into_iter()
            .map(|index| self.graph[index].id)
            .filter(|id| *id != NodeId::OUTPUT)
            .collect())
    }

    /// Number of nodes, not counting the output sink
    pub fn node_count(&self) -> usize {
        self.graph.node_count() - 1
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.indices.contains_key(&id)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.vertex(id).map(|(_, vertex)| vertex.kind)
    }

    /// Where `id` sends its signal
    pub fn outgoing(&self, id: NodeId) -> Vec<(NodeId, Port)> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// What feeds into `id`
    pub fn incoming(&self, id: NodeId) -> Vec<(NodeId, Port)> {
        self.neighbors(id, Direction::Incoming)
    }

    pub fn has_path(&self, from: NodeId, to: NodeId) -> bool {
        match (self.indices.get(&from), self.indices.get(&to)) {
            (Some(&a), Some(&b)) => has_path_connecting(&self.graph, a, b, None),
            _ => false,
        }
    }

    pub fn reaches_output(&self, id: NodeId) -> bool {
        id != NodeId::OUTPUT && self.has_path(id, NodeId::OUTPUT)
    }

    fn vertex(&self, id: NodeId) -> Option<(NodeIndex, Vertex)> {
        let index = *self.indices.get(&id)?;
        Some((index, self.graph[index]))
    }

    fn neighbors(&self, id: NodeId, direction: Direction) -> Vec<(NodeId, Port)> {
        let Some(&index) = self.indices.get(&id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(index, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (self.graph[other].id, *edge.weight())
            })
            .collect()
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

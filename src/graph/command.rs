//! Messages from the control thread to the renderer.

use crate::{
    graph::node::{Connection, GraphNode, NodeId, ParamKind},
    MAX_BLOCK_SIZE,
};

/// A node ready to be rendered, with its output buffer pre-allocated.
pub struct LiveNode {
    pub(crate) id: NodeId,
    pub(crate) node: Box<dyn GraphNode>,
    pub(crate) output: Vec<f32>,
}

impl LiveNode {
    /// Wrap a node for the renderer. Allocates, so call it off the audio thread.
    pub fn new<N: GraphNode + 'static>(id: NodeId, node: N) -> Self {
        Self {
            id,
            node: Box::new(node),
            output: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl std::fmt::Debug for LiveNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveNode").field("id", &self.id).finish()
    }
}

/// A batch of nodes and edges that joins the graph in one step.
#[derive(Debug, Default)]
pub struct Subgraph {
    pub nodes: Vec<LiveNode>,
    pub connections: Vec<Connection>,
    /// Render order for the whole graph after this subgraph is attached
    pub order: Vec<NodeId>,
}

/// Each command is applied whole, in the order it was queued, at the start
/// of the renderer's next block.
#[derive(Debug)]
pub enum GraphCommand {
    /// Add nodes and edges, then adopt the new render order
    Attach(Subgraph),
    /// Remove nodes and every edge touching them
    Detach(Vec<NodeId>),
    /// Immediate (un-ramped) write of a node parameter
    SetParam {
        node: NodeId,
        param: ParamKind,
        value: f32,
    },
}

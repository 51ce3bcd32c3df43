#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier for a node in the signal graph.
///
/// Ids are handed out by the control-side topology and never reused, so a
/// stale id from a torn-down session can never address a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The output sink. Always present, never rendered.
    pub const OUTPUT: NodeId = NodeId(0);

    pub(crate) fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == NodeId::OUTPUT {
            write!(f, "output")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Named properties a node may expose
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Gain stage level (linear)
    Gain,
    /// Oscillator frequency in Hz
    Frequency,
    /// LFO rate in Hz
    Rate,
    /// LFO depth (peak deviation)
    Depth,
}

/// What kind of node sits at a topology vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Output,
    Oscillator,
    NoiseSource,
    Gain,
    Lfo,
}

impl NodeKind {
    /// Whether audio can be connected into this node's input.
    pub fn accepts_input(self) -> bool {
        matches!(self, NodeKind::Gain | NodeKind::Output)
    }

    /// Whether `param` can be driven by an audio-rate signal.
    pub fn accepts_modulation(self, param: ParamKind) -> bool {
        matches!((self, param), (NodeKind::Gain, ParamKind::Gain))
    }

    /// Whether `param` exists on this kind of node at all.
    pub fn has_param(self, param: ParamKind) -> bool {
        matches!(
            (self, param),
            (NodeKind::Gain, ParamKind::Gain)
                | (NodeKind::Oscillator, ParamKind::Frequency)
                | (NodeKind::Lfo, ParamKind::Rate)
                | (NodeKind::Lfo, ParamKind::Depth)
        )
    }
}

/// Where a connection lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The output sink
    Output,
    /// A node's audio input
    Node(NodeId),
    /// One of a node's parameters, summed onto its base value
    Param(NodeId, ParamKind),
}

impl Destination {
    pub fn node(self) -> NodeId {
        match self {
            Destination::Output => NodeId::OUTPUT,
            Destination::Node(id) | Destination::Param(id, _) => id,
        }
    }
}

/// A directed edge in the signal graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub from: NodeId,
    pub to: Destination,
}

/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - input: Sum of everything connected to the node's audio input
/// - modulation: Sum of everything connected to the node's gain parameter
pub struct RenderCtx<'a> {
    pub sample_rate: f32,
    pub input: &'a [f32],
    pub modulation: &'a [f32],
}

/// Core trait for audio processing graph nodes
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    fn get_param(&self, _param: ParamKind) -> Option<f32> {
        None
    }

    /// Write a parameter's base value. Returns false if the node has no such
    /// parameter.
    fn set_param(&mut self, _param: ParamKind, _value: f32) -> bool {
        false
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn get_param(&self, param: ParamKind) -> Option<f32> {
        (**self).get_param(param)
    }

    fn set_param(&mut self, param: ParamKind, value: f32) -> bool {
        (**self).set_param(param, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_gain_nodes_take_modulation() {
        assert!(NodeKind::Gain.accepts_modulation(ParamKind::Gain));
        assert!(!NodeKind::Lfo.accepts_modulation(ParamKind::Rate));
        assert!(!NodeKind::Oscillator.accepts_modulation(ParamKind::Frequency));
    }

    #[test]
    fn sources_have_no_audio_input() {
        assert!(!NodeKind::Oscillator.accepts_input());
        assert!(!NodeKind::NoiseSource.accepts_input());
        assert!(!NodeKind::Lfo.accepts_input());
        assert!(NodeKind::Gain.accepts_input());
    }

    #[test]
    fn destination_resolves_target_node() {
        let id = NodeId::from_raw(3);
        assert_eq!(Destination::Output.node(), NodeId::OUTPUT);
        assert_eq!(Destination::Node(id).node(), id);
        assert_eq!(Destination::Param(id, ParamKind::Gain).node(), id);
    }
}

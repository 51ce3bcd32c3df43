//! The signal graph: nodes, how they are wired, and how they are rendered.
//!
//! The graph is split across two threads. The control side builds nodes,
//! validates wiring in a [`topology::Topology`] and sends [`command::GraphCommand`]s
//! over a lock-free queue. The audio side ([`renderer::GraphRenderer`]) applies
//! those commands between blocks and renders the nodes in dependency order.

/// Control-to-render messages.
pub mod command;
/// Gain stage with an audio-rate modulatable level.
pub mod gain;
/// Sub-audio sine used to move gain levels.
pub mod lfo;
/// Core traits and identifiers shared by all graph nodes.
pub mod node;
/// Looping playback of a pre-rendered noise buffer.
pub mod noise;
/// Fixed-frequency sine tone.
pub mod oscillator;
/// Block renderer that runs on the audio thread.
pub mod renderer;
/// Control-side graph mirror used for validation and render order.
pub mod topology;

pub use command::{GraphCommand, LiveNode, Subgraph};
pub use node::{Connection, Destination, GraphNode, NodeId, NodeKind, ParamKind, RenderCtx};
pub use renderer::GraphRenderer;
pub use topology::{Port, Topology};

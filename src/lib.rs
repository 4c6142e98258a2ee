//! `graphwalk`: seeded random walks on small undirected graphs.
//!
//! Walks come in three flavours:
//! - **uniform** first-order walks ([`start_walk`]),
//! - **weighted** first-order walks ([`start_weighted_walk`]),
//! - **biased** second-order node2vec walks ([`start_biased_walk`]).
//!
//! Every walk is a lazy, fused iterator of `Result<NodeId>` that borrows the graph and a
//! caller-owned RNG. Nothing is rendered here; consumers map node ids to positions.
//!
//! Public invariants (must not drift):
//! - **Determinism**: identical graph + start + length + RNG state yields an identical walk.
//! - **Length**: a walk that does not hit a dead end yields exactly `length + 1` nodes.
//! - **Neighbor order**: uniform draws index into the neighbor list sorted by node id.
//! - **First biased step**: a biased walk's first step is the same draw as a uniform walk.

pub mod graph;
pub mod lockstep;
pub mod node2vec;
pub mod random_walk;
pub mod record;

pub use graph::{Graph, GraphRef, NodeId};
pub use lockstep::{start_lockstep_walks, LockstepWalks};
pub use node2vec::{BiasParameters, MoveKind};
#[cfg(feature = "parallel")]
pub use random_walk::generate_walks_parallel_from_nodes;
pub use random_walk::{
    for_each_walk, generate_walks, generate_walks_from_nodes, start_biased_walk, start_walk,
    start_weighted_walk, transition_probabilities, Transition, Walk, WalkConfig,
};
pub use record::{History, HistoryConfig, HistoryEntry, WalkRecord};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("node {node} has no neighbors; the walk cannot continue")]
    DeadEnd { node: NodeId },
    #[error("start node {node} is not in the graph ({node_count} nodes)")]
    InvalidStartNode { node: NodeId, node_count: usize },
    #[error("bias parameter `{name}` must be positive and finite, got {value}")]
    InvalidBiasParameter { name: &'static str, value: f64 },
    #[error("node {node} is out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: NodeId, node_count: usize },
    #[error("self-loop on node {node} is not allowed")]
    SelfLoop { node: NodeId },
    #[error("edge ({u}, {v}) has weight {weight}; weights must be finite and non-negative")]
    InvalidWeight { u: NodeId, v: NodeId, weight: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;

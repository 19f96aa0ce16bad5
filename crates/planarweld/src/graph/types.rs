//! Node record and identifier for the half-edge arena.
//!
//! - `NodeId`: stable index into the graph's node vector. Slots are recycled
//!   when edges are freed, so an id stays valid exactly as long as its node
//!   is live.
//! - `Node`: one directed edge-end. The vertex ring is stored doubly linked
//!   (`vnext`/`vprev`); the face ring is derived from it, never stored.

use nalgebra::Vector2;

/// Identifier of one edge-end (half-edge) in a [`super::Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Cluster stamp value meaning "no cluster assigned".
pub(crate) const CLUSTER_NONE: u32 = u32::MAX;

/// Label value meaning "no caller back-reference".
pub(crate) const LABEL_NONE: i64 = -1;

/// One directed edge-end.
///
/// `label` (caller back-reference) and `cluster` (cluster stamp) are distinct
/// fields on purpose; neither is ever repurposed for the other.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub xy: Vector2<f64>,
    pub label: i64,
    pub cluster: u32,
    pub mask: u32,
    /// Opposite end of the same undirected edge; `mate(mate(n)) == n`.
    pub mate: NodeId,
    /// Next edge-end counterclockwise around the same vertex.
    pub vnext: NodeId,
    /// Inverse of `vnext`.
    pub vprev: NodeId,
    pub live: bool,
}

impl Node {
    /// Fresh live node forming a singleton vertex ring at `id`.
    pub fn fresh(xy: Vector2<f64>, id: NodeId, mate: NodeId) -> Self {
        Self {
            xy,
            label: LABEL_NONE,
            cluster: CLUSTER_NONE,
            mask: 0,
            mate,
            vnext: id,
            vprev: id,
            live: true,
        }
    }
}

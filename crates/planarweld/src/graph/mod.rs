//! Planar half-edge substrate: node arena, vertex twist, edge lifecycle.
//!
//! Purpose
//! - Hold the node set of a planar graph as a contiguous arena addressed by
//!   stable `NodeId` indices and expose the one topology-mutating primitive
//!   (`vertex_twist`) the welding passes are written against.
//!
//! Why this design
//! - Nodes store their vertex ring doubly linked (`vnext`/`vprev`); the face
//!   ring is derived (`fsucc(n) = vpred(mate(n))`), so no mutation can ever
//!   leave the face relation structurally inconsistent. With counterclockwise
//!   vertex rings, interior face walks come out counterclockwise.
//! - Freed edge slots are recycled through a free list; ids of live nodes
//!   never shift.
//!
//! Code cross-refs: `masks` (per-node tag bits), `rand` (edge-soup generator),
//! `cluster`/`merge` (the welding passes built on this substrate).

pub mod masks;
pub mod rand;
mod types;


use nalgebra::Vector2;

pub use masks::{MaskGuard, NodeMask};
pub use rand::{draw_edge_soup, ReplayToken, ScatterCfg};
pub use types::NodeId;

use types::{Node, CLUSTER_NONE, LABEL_NONE};

/// Planar half-edge graph over a node arena.
///
/// The graph exclusively owns its nodes; callers address them by `NodeId`
/// and must not hold ids across `free_edge`/`free_marked_edges` calls unless
/// they know the node survived (check `is_live`).
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    live: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn node(&self, n: NodeId) -> &Node {
        debug_assert!(self.nodes[n.0].live, "access to freed node {}", n.0);
        &self.nodes[n.0]
    }

    #[inline]
    fn node_mut(&mut self, n: NodeId) -> &mut Node {
        debug_assert!(self.nodes[n.0].live, "access to freed node {}", n.0);
        &mut self.nodes[n.0]
    }

    fn alloc(&mut self, xy: Vector2<f64>) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Node::fresh(xy, id, id);
                id
            }
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes.push(Node::fresh(xy, id, id));
                id
            }
        }
    }

    // ---------------------------------------------------------------- build

    /// Add an isolated edge from `xy0` to `xy1`.
    ///
    /// Both ends start as singleton vertex rings, which is a valid input
    /// state for the welding passes (they reassemble rings themselves).
    /// Returns `(end at xy0, end at xy1)`.
    pub fn add_edge(&mut self, xy0: Vector2<f64>, xy1: Vector2<f64>) -> (NodeId, NodeId) {
        let a = self.alloc(xy0);
        let b = self.alloc(xy1);
        self.nodes[a.0].mate = b;
        self.nodes[b.0].mate = a;
        (a, b)
    }

    /// Add an edge between the vertices of two existing edge-ends.
    ///
    /// The new ends take their coordinates from `a` and `b` and enter the
    /// rings as vertex-successors of `a` and `b` respectively.
    pub fn join_edge(&mut self, a: NodeId, b: NodeId) -> (NodeId, NodeId) {
        let (n0, n1) = self.add_edge(self.xy(a), self.xy(b));
        self.vertex_twist(n0, a);
        self.vertex_twist(n1, b);
        (n0, n1)
    }

    // ------------------------------------------------------------ accessors

    /// Coordinate of one edge-end.
    #[inline]
    pub fn xy(&self, n: NodeId) -> Vector2<f64> {
        self.node(n).xy
    }

    /// Set the coordinate of one edge-end.
    #[inline]
    pub fn set_xy(&mut self, n: NodeId, xy: Vector2<f64>) {
        self.node_mut(n).xy = xy;
    }

    /// Set the coordinate of every node in `n`'s vertex ring.
    pub fn set_xy_around_vertex(&mut self, n: NodeId, xy: Vector2<f64>) {
        let mut cur = n;
        loop {
            self.node_mut(cur).xy = xy;
            cur = self.node(cur).vnext;
            if cur == n {
                break;
            }
        }
    }

    /// Caller back-reference of one node (-1 when unset).
    #[inline]
    pub fn label(&self, n: NodeId) -> i64 {
        self.node(n).label
    }

    /// Set the caller back-reference of one node.
    #[inline]
    pub fn set_label(&mut self, n: NodeId, label: i64) {
        self.node_mut(n).label = label;
    }

    /// Cluster stamp of one node, if any pass has stamped it.
    #[inline]
    pub fn cluster_index(&self, n: NodeId) -> Option<u32> {
        let c = self.node(n).cluster;
        (c != CLUSTER_NONE).then_some(c)
    }

    /// Stamp a cluster index on every node of `n`'s vertex ring.
    pub fn set_cluster_around_vertex(&mut self, n: NodeId, cluster: u32) {
        debug_assert!(cluster != CLUSTER_NONE, "cluster index overflow");
        let mut cur = n;
        loop {
            self.node_mut(cur).cluster = cluster;
            cur = self.node(cur).vnext;
            if cur == n {
                break;
            }
        }
    }

    /// Opposite end of the same undirected edge.
    #[inline]
    pub fn mate(&self, n: NodeId) -> NodeId {
        self.node(n).mate
    }

    /// Next edge-end counterclockwise around the same vertex.
    #[inline]
    pub fn vsucc(&self, n: NodeId) -> NodeId {
        self.node(n).vnext
    }

    /// Previous edge-end around the same vertex (inverse of `vsucc`).
    #[inline]
    pub fn vpred(&self, n: NodeId) -> NodeId {
        self.node(n).vprev
    }

    /// Next edge-end around the face left of `n`; derived, never stored.
    #[inline]
    pub fn fsucc(&self, n: NodeId) -> NodeId {
        self.vpred(self.mate(n))
    }

    /// Previous edge-end around the face left of `n` (inverse of `fsucc`).
    #[inline]
    pub fn fpred(&self, n: NodeId) -> NodeId {
        self.mate(self.vsucc(n))
    }

    /// Polar angle of the vector from `n` toward its mate.
    #[inline]
    pub fn edge_theta(&self, n: NodeId) -> f64 {
        let d = self.xy(self.mate(n)) - self.xy(n);
        d.y.atan2(d.x)
    }

    /// Whether the slot behind `n` currently holds a live node.
    #[inline]
    pub fn is_live(&self, n: NodeId) -> bool {
        self.nodes[n.0].live
    }

    // ------------------------------------------------------------ iteration

    /// Arena length including freed slots, for raw index sweeps.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// All live edge-ends in arena order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(move |&n| self.nodes[n.0].live)
    }

    /// One canonical end per live edge (the end with the smaller id).
    pub fn edge_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(move |&n| n.0 < self.mate(n).0)
    }

    /// Walk `n`'s vertex ring, starting at `n`.
    pub fn around_vertex(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(n), move |&cur| {
            let next = self.vsucc(cur);
            (next != n).then_some(next)
        })
    }

    /// Walk `n`'s face ring, starting at `n`.
    pub fn around_face(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(n), move |&cur| {
            let next = self.fsucc(cur);
            (next != n).then_some(next)
        })
    }

    // --------------------------------------------------------------- counts

    /// Number of live edge-ends.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Number of live undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.live / 2
    }

    /// Number of vertex rings (mask walk).
    pub fn count_vertex_rings(&mut self) -> usize {
        let visited = MaskGuard::grab();
        self.clear_mask_in_graph(*visited);
        let mut rings = 0;
        for slot in 0..self.nodes.len() {
            let n = NodeId(slot);
            if !self.nodes[slot].live || self.test_mask(n, *visited) {
                continue;
            }
            rings += 1;
            self.set_mask_around_vertex(n, *visited);
        }
        rings
    }

    /// Number of face rings (mask walk over the derived face relation).
    pub fn count_face_rings(&mut self) -> usize {
        let visited = MaskGuard::grab();
        self.clear_mask_in_graph(*visited);
        let mut rings = 0;
        for slot in 0..self.nodes.len() {
            let n = NodeId(slot);
            if !self.nodes[slot].live || self.test_mask(n, *visited) {
                continue;
            }
            rings += 1;
            let mut cur = n;
            loop {
                self.set_mask(cur, *visited);
                cur = self.fsucc(cur);
                if cur == n {
                    break;
                }
            }
        }
        rings
    }

    // ----------------------------------------------------- extent/tolerance

    /// Min/max corner of the live coordinates, or `None` for an empty graph.
    pub fn xy_range(&self) -> Option<(Vector2<f64>, Vector2<f64>)> {
        let mut ids = self.node_ids();
        let first = ids.next()?;
        let mut lo = self.xy(first);
        let mut hi = lo;
        for n in ids {
            let xy = self.xy(n);
            lo.x = lo.x.min(xy.x);
            lo.y = lo.y.min(xy.y);
            hi.x = hi.x.max(xy.x);
            hi.y = hi.y.max(xy.y);
        }
        Some((lo, hi))
    }

    /// Tolerance appropriate to the graph's coordinate magnitudes: the larger
    /// of `abs_tol` and `rel_tol` times the largest absolute xy-coordinate.
    pub fn xy_tolerance(&self, abs_tol: f64, rel_tol: f64) -> f64 {
        let mut a_max = 0.0f64;
        for slot in 0..self.nodes.len() {
            if !self.nodes[slot].live {
                continue;
            }
            let xy = self.nodes[slot].xy;
            a_max = a_max.max(xy.x.abs()).max(xy.y.abs());
        }
        let a = rel_tol * a_max;
        if abs_tol > a {
            abs_tol
        } else {
            a
        }
    }

    // ------------------------------------------------------------- topology

    /// Exchange the vertex-successor links of two edge-ends.
    ///
    /// This is the one place graph shape changes. If `a` and `b` sit in
    /// distinct vertex rings the rings merge; if they share a ring it splits
    /// in two. `vertex_twist(a, vsucc(a))` excises `vsucc(a)` into a
    /// singleton; `vertex_twist(a, a)` is a no-op. Constant time, and the
    /// derived face relation stays structurally consistent by construction.
    pub fn vertex_twist(&mut self, a: NodeId, b: NodeId) {
        debug_assert!(self.nodes[a.0].live && self.nodes[b.0].live);
        let sa = self.node(a).vnext;
        let sb = self.node(b).vnext;
        self.node_mut(a).vnext = sb;
        self.node_mut(b).vnext = sa;
        self.node_mut(sb).vprev = a;
        self.node_mut(sa).vprev = b;
    }

    /// Excise one edge-end from its vertex ring into a singleton ring.
    /// No-op when the end is already alone.
    pub fn yank(&mut self, n: NodeId) {
        let p = self.vpred(n);
        if p != n {
            self.vertex_twist(p, n);
        }
    }

    // ------------------------------------------------------- edge lifecycle

    /// Remove an edge: excise both ends from their rings and recycle the pair.
    pub fn free_edge(&mut self, n: NodeId) {
        let m = self.mate(n);
        debug_assert!(self.node(m).mate == n, "mate links must be symmetric");
        self.yank(n);
        self.yank(m);
        self.retire(n);
        self.retire(m);
    }

    fn retire(&mut self, n: NodeId) {
        let node = &mut self.nodes[n.0];
        node.live = false;
        node.mask = 0;
        node.label = LABEL_NONE;
        node.cluster = CLUSTER_NONE;
        self.free.push(n);
        self.live -= 1;
    }

    /// Free every edge either end of which carries `mask`.
    /// Returns the number of edges freed.
    pub fn free_marked_edges(&mut self, mask: NodeMask) -> usize {
        let marked: Vec<NodeId> = self
            .edge_ids()
            .filter(|&n| self.test_mask(n, mask) || self.test_mask(self.mate(n), mask))
            .collect();
        for &n in &marked {
            self.free_edge(n);
        }
        marked.len()
    }

    // ------------------------------------------------------------ integrity

    /// Assert structural invariants: mate involution, `vnext`/`vprev` inverse
    /// consistency, and live bookkeeping. A test and debugging aid.
    pub fn validate(&self) {
        let mut live_seen = 0;
        for slot in 0..self.nodes.len() {
            let node = &self.nodes[slot];
            if !node.live {
                continue;
            }
            live_seen += 1;
            let n = NodeId(slot);
            let m = node.mate;
            assert!(m != n, "node {slot} mated to itself");
            assert!(self.nodes[m.0].live, "mate of live node {slot} is freed");
            assert_eq!(self.nodes[m.0].mate, n, "mate involution broken at {slot}");
            let s = node.vnext;
            let p = node.vprev;
            assert!(
                self.nodes[s.0].live && self.nodes[p.0].live,
                "ring link from {slot} into a freed slot"
            );
            assert_eq!(self.nodes[s.0].vprev, n, "vnext/vprev inverse broken at {slot}");
            assert_eq!(self.nodes[p.0].vnext, n, "vprev/vnext inverse broken at {slot}");
        }
        assert_eq!(live_seen, self.live, "live node bookkeeping drifted");
        for id in &self.free {
            assert!(!self.nodes[id.0].live, "free list holds a live slot");
        }
    }
}

//! Spatial vertex clustering: tolerance-group near-coincident vertex rings.
//!
//! Purpose
//! - Partition the graph's vertex rings into clusters of rings whose
//!   coordinates lie within a caller tolerance of a pivot ring, optionally
//!   rewriting every member to the pivot's coordinate and stamping the
//!   cluster index onto the member nodes.
//!
//! Why this design
//! - A plain sort along one fixed projection direction plus a bounded forward
//!   scan replaces a spatial index. Projection never lengthens a segment, so
//!   two points within `tolerance` differ by at most `tolerance` in sort
//!   coordinate; the scan window pads that with a safety factor.
//! - Candidates are tested against the *pivot*, not against each other, so a
//!   cluster's members can lie up to twice the tolerance apart. That keeps
//!   the pass a single linear scan and matches what downstream merging
//!   expects; callers who need a diameter bound must pre-shrink tolerance.
//!
//! Code cross-refs: `graph` (ring walks, coordinate rewrites), `merge`
//! (consumes the cluster stamps for edge classification).

use nalgebra::Vector2;

use crate::graph::{Graph, MaskGuard, NodeId};

#[cfg(test)]
mod tests;

// Fixed sort direction (cos 1, sin 1). Deliberately far from both axes so
// grid-aligned input does not produce whole runs of tied sort coordinates.
const SORT_UX: f64 = 0.5403023058681398;
const SORT_UY: f64 = 0.8414709848078965;

const UNASSIGNED: isize = -1;

/// Controls for [`collect_clusters`].
#[derive(Clone, Copy, Debug)]
pub struct ClusterCfg {
    /// Absolute spatial tolerance. A ring joins a cluster when its coordinate
    /// is strictly within this distance of the cluster pivot; zero therefore
    /// yields all-singleton clusters.
    pub tolerance: f64,
    /// Rewrite every member ring's coordinates to the pivot coordinate.
    pub reassign_xy: bool,
    /// Stamp the cluster index on every member ring's nodes.
    pub stamp_cluster: bool,
}

impl Default for ClusterCfg {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            reassign_xy: false,
            stamp_cluster: true,
        }
    }
}

/// One group of near-coincident vertex rings, in discovery order.
#[derive(Clone, Debug)]
pub struct Cluster {
    /// Canonical coordinate: the pivot ring's coordinate at discovery time.
    pub xy: Vector2<f64>,
    /// Seed node of each member ring, pivot first.
    pub seeds: Vec<NodeId>,
}

/// Per-ring scan record. `next_in_cluster` threads same-cluster keys into a
/// circular chain: -1 is unassigned, a self-link marks a fresh pivot.
#[derive(Clone, Copy, Debug)]
struct VertexSortKey {
    seed: NodeId,
    xy: Vector2<f64>,
    sort_coord: f64,
    next_in_cluster: isize,
}

/// Group vertex rings into tolerance clusters.
///
/// Every vertex ring is visited exactly once and lands in exactly one
/// cluster. Assignment is first-seen-pivot-wins along the sort direction:
/// each not-yet-clustered ring opens a cluster and captures every later ring
/// strictly within `cfg.tolerance` of *its* coordinate, so member-to-member
/// distances may reach twice the tolerance.
pub fn collect_clusters(graph: &mut Graph, cfg: &ClusterCfg) -> Vec<Cluster> {
    let visited = MaskGuard::grab();
    graph.clear_mask_in_graph(*visited);

    let mut keys: Vec<VertexSortKey> = Vec::new();
    for slot in 0..graph.slot_count() {
        let n = NodeId(slot);
        if !graph.is_live(n) || graph.test_mask(n, *visited) {
            continue;
        }
        graph.set_mask_around_vertex(n, *visited);
        let xy = graph.xy(n);
        keys.push(VertexSortKey {
            seed: n,
            xy,
            sort_coord: SORT_UX * xy.x + SORT_UY * xy.y,
            next_in_cluster: UNASSIGNED,
        });
    }
    // Stable: rings with tied sort coordinates keep arena discovery order,
    // so the earliest ring of a tie becomes the pivot.
    keys.sort_by(|a, b| a.sort_coord.total_cmp(&b.sort_coord));

    // sqrt(2) bounds the planar worst case; sqrt(3) adds numeric headroom.
    let window = 3.0f64.sqrt() * cfg.tolerance;
    let tol2 = cfg.tolerance * cfg.tolerance;

    let mut clusters: Vec<Cluster> = Vec::new();
    for i in 0..keys.len() {
        if keys[i].next_in_cluster != UNASSIGNED {
            continue;
        }
        keys[i].next_in_cluster = i as isize;
        let cluster_id = clusters.len() as u32;
        let pivot_xy = keys[i].xy;
        let mut seeds = vec![keys[i].seed];
        if cfg.stamp_cluster {
            graph.set_cluster_around_vertex(keys[i].seed, cluster_id);
        }
        if cfg.reassign_xy {
            graph.set_xy_around_vertex(keys[i].seed, pivot_xy);
        }
        for j in (i + 1)..keys.len() {
            if keys[j].sort_coord - keys[i].sort_coord > window {
                break;
            }
            if keys[j].next_in_cluster != UNASSIGNED {
                continue;
            }
            let d = keys[j].xy - pivot_xy;
            if d.norm_squared() < tol2 {
                keys[j].next_in_cluster = keys[i].next_in_cluster;
                keys[i].next_in_cluster = j as isize;
                seeds.push(keys[j].seed);
                if cfg.stamp_cluster {
                    graph.set_cluster_around_vertex(keys[j].seed, cluster_id);
                }
                if cfg.reassign_xy {
                    graph.set_xy_around_vertex(keys[j].seed, pivot_xy);
                }
            }
        }
        clusters.push(Cluster {
            xy: pivot_xy,
            seeds,
        });
    }

    #[cfg(debug_assertions)]
    if std::env::var_os("PLANARWELD_DEBUG_WELD").is_some() {
        eprintln!(
            "[planarweld] collect_clusters: {} rings -> {} clusters (tol {:e})",
            keys.len(),
            clusters.len(),
            cfg.tolerance
        );
    }

    clusters
}

/// Collapse near-coincident vertices onto canonical coordinates.
///
/// Runs [`collect_clusters`] with coordinate reassignment and discards the
/// cluster list. After one pass, surviving pivot coordinates are pairwise at
/// least `tolerance` apart, so a second pass with the same tolerance changes
/// nothing.
pub fn consolidate_cluster_coordinates(graph: &mut Graph, tolerance: f64) {
    let cfg = ClusterCfg {
        tolerance,
        reassign_xy: true,
        stamp_cluster: false,
    };
    let _ = collect_clusters(graph, &cfg);
}

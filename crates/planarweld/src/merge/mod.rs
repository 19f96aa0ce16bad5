//! Duplicate-edge resolution and angular resequencing over clustered
//! vertices.
//!
//! Purpose
//! - Given the cluster partition from `cluster`, tag every directed edge
//!   with its endpoint cluster pair, resolve coincident duplicates under a
//!   caller-chosen policy, and rebuild every cluster's vertex ring in
//!   ascending polar-angle order.
//!
//! Why this design
//! - Surviving edges are first torn out of their rings entirely; rotation is
//!   rebuilt from scratch by the angular pass. That turns duplicate merging
//!   into flat array passes over sort keys plus constant-time twists, with
//!   no incremental ring surgery to reason about.
//! - Duplicate runs are ordered by canonical edge id, so the `(A,B)` run and
//!   its mirror `(B,A)` run list the same undirected edges in the same order
//!   and make identical pairing and keep-first decisions.
//!
//! Code cross-refs: `graph` (twist primitive, masks, edge lifecycle),
//! `cluster` (the partition consumed here).

use crate::cluster::{collect_clusters, Cluster, ClusterCfg};
use crate::graph::{Graph, MaskGuard, NodeId, NodeMask};


/// How coincident duplicate edges between one cluster pair are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Cancel duplicates pairwise and keep the odd one out, if any. This is
    /// the boolean-union rule: an even stack of coincident edges is no
    /// boundary at all.
    Parity,
    /// Keep the first duplicate of each run, delete the rest.
    KeepOne,
    /// Keep every duplicate, splicing each run into adjacent ring positions
    /// at both endpoints. The stacked parallels enclose degenerate null
    /// faces of length two, which callers can tag via a mask.
    #[default]
    Bundle,
}

/// Classification record for one directed edge.
///
/// Produced by [`classify_and_merge_duplicate_edges`] and consumed by
/// [`sort_vertex_loops_by_angle`]; `deleted` mirrors the deletion mask so
/// the angular pass never touches freed nodes.
#[derive(Clone, Copy, Debug)]
pub struct EdgeSortKey {
    /// Cluster of this end's vertex.
    pub cluster0: u32,
    /// Cluster of the mate end's vertex.
    pub cluster1: u32,
    /// This edge-end.
    pub node: NodeId,
    /// The opposite end.
    pub mate: NodeId,
    /// Polar angle from this end toward the mate.
    pub theta: f64,
    /// The edge was removed by self-loop or duplicate resolution.
    pub deleted: bool,
}

/// Controls for [`consolidate_and_sort_by_angle`].
#[derive(Clone, Copy, Debug)]
pub struct MergeCfg {
    /// Absolute vertex-welding tolerance.
    pub tolerance: f64,
    /// Duplicate resolution rule.
    pub policy: MergePolicy,
    /// Remove edges whose endpoints weld into the same cluster.
    pub delete_self_loops: bool,
    /// Caller-grabbed mask stamped on both ends of every bundled edge.
    pub null_face_mask: Option<NodeMask>,
}

impl Default for MergeCfg {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            policy: MergePolicy::default(),
            delete_self_loops: true,
            null_face_mask: None,
        }
    }
}

fn stamped_cluster(graph: &Graph, n: NodeId) -> u32 {
    let c = graph.cluster_index(n);
    debug_assert!(c.is_some(), "edge-end {} has no cluster stamp", n.0);
    c.unwrap_or(u32::MAX)
}

/// Tag every directed edge with its endpoint clusters and resolve
/// coincident duplicates.
///
/// Stamps cluster indices around every member ring, removes self-loops when
/// requested, isolates all surviving edge-ends into singleton rings, then
/// walks maximal runs of keys sharing `(cluster0, cluster1)` and applies
/// `policy`. Marked edges are freed before returning; their keys stay in
/// the returned array with `deleted` set.
///
/// The graph is left with no meaningful rotational order; callers follow up
/// with [`sort_vertex_loops_by_angle`] on the returned keys.
pub fn classify_and_merge_duplicate_edges(
    graph: &mut Graph,
    clusters: &[Cluster],
    policy: MergePolicy,
    delete_self_loops: bool,
    null_face_mask: Option<NodeMask>,
) -> Vec<EdgeSortKey> {
    for (k, c) in clusters.iter().enumerate() {
        for &seed in &c.seeds {
            debug_assert!(graph.is_live(seed), "cluster seed {} is freed", seed.0);
            graph.set_cluster_around_vertex(seed, k as u32);
        }
    }

    let del = MaskGuard::grab();
    graph.clear_mask_in_graph(*del);

    // One key per directed edge; self-loops are masked instead of keyed
    // when they are to be deleted.
    let ends: Vec<NodeId> = graph.node_ids().collect();
    let mut keys: Vec<EdgeSortKey> = Vec::with_capacity(ends.len());
    let mut self_loops = 0usize;
    for n in ends {
        let m = graph.mate(n);
        let c0 = stamped_cluster(graph, n);
        let c1 = stamped_cluster(graph, m);
        if delete_self_loops && c0 == c1 {
            if n.0 < m.0 {
                graph.set_mask_on_edge(n, *del);
                self_loops += 1;
            }
            continue;
        }
        keys.push(EdgeSortKey {
            cluster0: c0,
            cluster1: c1,
            node: n,
            mate: m,
            theta: graph.edge_theta(n),
            deleted: false,
        });
    }
    if delete_self_loops {
        let removed = graph.free_marked_edges(*del);
        debug_assert_eq!(removed, self_loops);
    }

    // Tear every survivor out of its vertex ring; the angular pass rebuilds
    // rotation from scratch.
    for key in &keys {
        graph.yank(key.node);
    }

    keys.sort_by(|a, b| {
        (a.cluster0, a.cluster1, a.node.0.min(a.mate.0)).cmp(&(
            b.cluster0,
            b.cluster1,
            b.node.0.min(b.mate.0),
        ))
    });

    let mut start = 0;
    while start < keys.len() {
        let mut end = start + 1;
        while end < keys.len()
            && keys[end].cluster0 == keys[start].cluster0
            && keys[end].cluster1 == keys[start].cluster1
        {
            end += 1;
        }
        match policy {
            MergePolicy::Parity => {
                // Pair consecutive members; an odd trailing member survives.
                let mut k = start;
                while k + 1 < end {
                    graph.set_mask_on_edge(keys[k].node, *del);
                    graph.set_mask_on_edge(keys[k + 1].node, *del);
                    k += 2;
                }
            }
            MergePolicy::KeepOne => {
                for k in start + 1..end {
                    graph.set_mask_on_edge(keys[k].node, *del);
                }
            }
            MergePolicy::Bundle => {
                if end - start >= 2 {
                    for k in start + 1..end {
                        let prev = keys[k - 1].node;
                        graph.vertex_twist(keys[k].node, prev);
                    }
                    if let Some(mask) = null_face_mask {
                        for k in start..end {
                            graph.set_mask_on_edge(keys[k].node, mask);
                        }
                    }
                }
            }
        }
        start = end;
    }

    // Mirror the deletion mask into the keys, then free. An edge can be
    // doomed through either end, so flags are derived from the mask rather
    // than set inside the policy arms.
    for key in keys.iter_mut() {
        if graph.test_mask(key.node, *del) || graph.test_mask(key.mate, *del) {
            key.deleted = true;
        }
    }
    let dup_freed = graph.free_marked_edges(*del);
    debug_assert_eq!(2 * dup_freed, keys.iter().filter(|k| k.deleted).count());

    #[cfg(debug_assertions)]
    if std::env::var_os("PLANARWELD_DEBUG_MERGE").is_some() {
        eprintln!(
            "[planarweld] classify: {} keys, {} self-loops removed, {} duplicates freed",
            keys.len(),
            self_loops,
            dup_freed
        );
    }

    keys
}

/// Rebuild every cluster's vertex ring in ascending polar-angle order.
///
/// Expects the state [`classify_and_merge_duplicate_edges`] leaves behind:
/// every surviving edge-end is a singleton ring or part of a bundle ring.
/// Keys flagged `deleted` are skipped; a bundle ring joins as a block when
/// its first key is reached and its remaining keys are then skipped.
pub fn sort_vertex_loops_by_angle(graph: &mut Graph, keys: &mut [EdgeSortKey]) {
    keys.sort_by(|a, b| {
        a.cluster0
            .cmp(&b.cluster0)
            .then(a.theta.total_cmp(&b.theta))
    });

    let spliced = MaskGuard::grab();
    graph.clear_mask_in_graph(*spliced);

    let mut start = 0;
    while start < keys.len() {
        let mut end = start + 1;
        while end < keys.len() && keys[end].cluster0 == keys[start].cluster0 {
            end += 1;
        }
        // `anchor` is always the node whose vertex-successor is the head of
        // the ring assembled so far.
        let mut anchor: Option<NodeId> = None;
        for k in start..end {
            if keys[k].deleted {
                continue;
            }
            let n = keys[k].node;
            if graph.test_mask(n, *spliced) {
                continue;
            }
            graph.set_mask_around_vertex(n, *spliced);
            match anchor {
                None => anchor = Some(graph.vpred(n)),
                Some(a) => {
                    graph.vertex_twist(n, a);
                    anchor = Some(n);
                }
            }
        }
        start = end;
    }
}

/// Full welding pipeline: consolidate coordinates, resolve duplicates,
/// restore angular order.
///
/// Returns the cluster partition. Seed nodes of clusters whose edges were
/// all removed are no longer live; check [`Graph::is_live`] before
/// dereferencing them.
pub fn consolidate_and_sort_by_angle(graph: &mut Graph, cfg: &MergeCfg) -> Vec<Cluster> {
    let weld = ClusterCfg {
        tolerance: cfg.tolerance,
        reassign_xy: true,
        stamp_cluster: true,
    };
    let clusters = collect_clusters(graph, &weld);
    let mut keys = classify_and_merge_duplicate_edges(
        graph,
        &clusters,
        cfg.policy,
        cfg.delete_self_loops,
        cfg.null_face_mask,
    );
    sort_vertex_loops_by_angle(graph, &mut keys);
    clusters
}

//! Clustering tests: pivots, windows, consolidation, documented 2x-tolerance
//! member spread.

use nalgebra::Vector2;

use super::*;
use crate::graph::{draw_edge_soup, Graph, NodeId, ReplayToken, ScatterCfg};

fn v(x: f64, y: f64) -> Vector2<f64> {
    Vector2::new(x, y)
}

/// One edge per point, each pointing at a distinct far-off anchor, so every
/// input point is its own vertex ring and the anchors never cluster.
fn graph_with_vertices(points: &[Vector2<f64>]) -> (Graph, Vec<NodeId>) {
    let mut g = Graph::new();
    let mut seeds = Vec::new();
    for (k, &p) in points.iter().enumerate() {
        let far = v(1e3 + 7.0 * k as f64, 1e3);
        let (a, _) = g.add_edge(p, far);
        seeds.push(a);
    }
    (g, seeds)
}

#[test]
fn near_pairs_form_two_clusters() {
    let mut g = Graph::new();
    g.add_edge(v(0.0, 0.0), v(5.0, 5.0));
    g.add_edge(v(1e-7, 0.0), v(5.0, 5.0));
    let cfg = ClusterCfg {
        tolerance: 1e-6,
        ..ClusterCfg::default()
    };
    let clusters = collect_clusters(&mut g, &cfg);
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].seeds.len(), 2);
    assert_eq!(clusters[1].seeds.len(), 2);
    // Pivot coordinate is first-seen along the sort direction.
    assert_eq!(clusters[0].xy, v(0.0, 0.0));
    assert_eq!(clusters[1].xy, v(5.0, 5.0));
}

#[test]
fn consolidate_then_recollect_is_stable() {
    let mut g = Graph::new();
    g.add_edge(v(0.0, 0.0), v(5.0, 5.0));
    g.add_edge(v(1e-7, 0.0), v(5.0, 5.0));
    consolidate_cluster_coordinates(&mut g, 1e-6);
    let cfg = ClusterCfg {
        tolerance: 1e-6,
        ..ClusterCfg::default()
    };
    let clusters = collect_clusters(&mut g, &cfg);
    assert_eq!(clusters.len(), 2);
    // Every member now sits exactly on its cluster's canonical coordinate.
    for c in &clusters {
        for &s in &c.seeds {
            assert_eq!(g.xy(s), c.xy);
        }
    }
}

#[test]
fn consolidate_is_idempotent() {
    let cfg = ScatterCfg {
        sites: 6,
        edges: 12,
        extent: 50.0,
        jitter: 1e-7,
        duplicate_frac: 0.5,
    };
    let mut g = draw_edge_soup(cfg, ReplayToken { seed: 9, index: 0 });
    consolidate_cluster_coordinates(&mut g, 1e-6);
    let snapshot: Vec<_> = g.node_ids().map(|n| g.xy(n)).collect();
    consolidate_cluster_coordinates(&mut g, 1e-6);
    let after: Vec<_> = g.node_ids().map(|n| g.xy(n)).collect();
    assert_eq!(snapshot, after);
}

#[test]
fn members_stay_within_tolerance_of_pivot() {
    let cfg = ScatterCfg {
        sites: 6,
        edges: 12,
        extent: 50.0,
        jitter: 1e-7,
        duplicate_frac: 0.5,
    };
    let mut g = draw_edge_soup(cfg, ReplayToken { seed: 11, index: 3 });
    let tol = 1e-6;
    let clusters = collect_clusters(
        &mut g,
        &ClusterCfg {
            tolerance: tol,
            reassign_xy: false,
            stamp_cluster: false,
        },
    );
    let members: usize = clusters.iter().map(|c| c.seeds.len()).sum();
    assert_eq!(members, g.count_vertex_rings());
    for c in &clusters {
        assert_eq!(g.xy(c.seeds[0]), c.xy);
        for &s in &c.seeds {
            assert!((g.xy(s) - c.xy).norm() < tol);
        }
    }
}

#[test]
fn members_may_spread_to_twice_the_tolerance() {
    let tol = 1e-3;
    // Offsets perpendicular to the sort direction tie the sort coordinates;
    // a slight pull along it makes the center point the pivot.
    let u = v(SORT_UX, SORT_UY);
    let perp = v(-SORT_UY, SORT_UX);
    let p = -1e-6 * tol * u;
    let q = 0.9 * tol * perp;
    let r = -0.9 * tol * perp;
    let w = 10.0 * perp;
    let (mut g, seeds) = graph_with_vertices(&[p, q, r, w]);
    let clusters = collect_clusters(
        &mut g,
        &ClusterCfg {
            tolerance: tol,
            reassign_xy: false,
            stamp_cluster: false,
        },
    );
    // p captures q and r; w ties their sort coordinate but is far away.
    assert_eq!(clusters.len(), 6);
    assert_eq!(clusters[0].seeds[0], seeds[0]);
    let mut grouped = clusters[0].seeds.clone();
    grouped.sort_by_key(|n| n.0);
    assert_eq!(grouped, vec![seeds[0], seeds[1], seeds[2]]);
    assert_eq!(clusters[1].seeds, vec![seeds[3]]);
    // The captured members are farther than one tolerance apart.
    assert!((q - r).norm() > tol);
    assert!((q - p).norm() < tol && (r - p).norm() < tol);
}

#[test]
fn zero_tolerance_keeps_every_ring_separate() {
    let mut g = Graph::new();
    let p = v(1.0, 2.0);
    let q = v(3.0, 4.0);
    g.add_edge(p, q);
    g.add_edge(p, q);
    let cfg = ClusterCfg {
        tolerance: 0.0,
        ..ClusterCfg::default()
    };
    let clusters = collect_clusters(&mut g, &cfg);
    assert_eq!(clusters.len(), 4);
    assert!(clusters.iter().all(|c| c.seeds.len() == 1));
}

#[test]
fn stamping_leaves_labels_alone() {
    let cfg = ScatterCfg::default();
    let mut g = draw_edge_soup(cfg, ReplayToken { seed: 3, index: 1 });
    let labels: Vec<_> = g.node_ids().map(|n| g.label(n)).collect();
    let weld = ClusterCfg {
        tolerance: 1e-6,
        ..ClusterCfg::default()
    };
    let clusters = collect_clusters(&mut g, &weld);
    let after: Vec<_> = g.node_ids().map(|n| g.label(n)).collect();
    assert_eq!(labels, after);
    for (k, c) in clusters.iter().enumerate() {
        for &s in &c.seeds {
            assert_eq!(g.cluster_index(s), Some(k as u32));
        }
    }
}

#[test]
fn reassignment_rewrites_whole_rings() {
    let mut g = Graph::new();
    let a = v(0.0, 0.0);
    let (a1, _) = g.add_edge(a, v(10.0, 0.0));
    let (a2, _) = g.add_edge(a, v(0.0, 10.0));
    g.vertex_twist(a1, a2);
    let (b, _) = g.add_edge(v(1e-7, 0.0), v(10.0, 10.0));
    consolidate_cluster_coordinates(&mut g, 1e-6);
    assert_eq!(g.xy(a1), a);
    assert_eq!(g.xy(a2), a);
    assert_eq!(g.xy(b), a);
    // Far endpoints are untouched.
    assert_eq!(g.xy(g.mate(a1)), v(10.0, 0.0));
}

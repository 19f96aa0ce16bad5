//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for project-internal
//!   code and tickets. Breaking changes are allowed and expected.
//! - Prefer these re-exports for clarity and consistency across experiments.

// Half-edge substrate
pub use crate::graph::{Graph, MaskGuard, NodeId, NodeMask};
// Deterministic test/bench inputs
pub use crate::graph::rand::{draw_edge_soup, ReplayToken, ScatterCfg};
// Vertex clustering
pub use crate::cluster::{collect_clusters, consolidate_cluster_coordinates, Cluster, ClusterCfg};
// Duplicate resolution and angular resequencing
pub use crate::merge::{
    classify_and_merge_duplicate_edges, consolidate_and_sort_by_angle, sort_vertex_loops_by_angle,
    EdgeSortKey, MergeCfg, MergePolicy,
};

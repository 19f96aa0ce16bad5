//! Planar half-edge graph welding: vertex clustering and topology consolidation.
//!
//! After numerically imprecise construction (snapping, intersection, offsetting)
//! a planar graph carries vertices that are almost coincident and edges that are
//! almost duplicate or anti-parallel. Before a boolean or triangulation step can
//! run, those near-duplicates must be collapsed onto canonical vertices and the
//! duplicate edges resolved into a consistent rotational structure.
//!
//! Pipeline (each stage mutates the graph in place):
//! - `cluster`: group vertex rings within a caller tolerance, optionally rewrite
//!   coordinates to the cluster's canonical point.
//! - `merge`: tag every edge with its endpoint cluster pair, drop self-loops,
//!   cancel/keep/bundle duplicate edges, then rebuild every vertex ring in
//!   ascending polar-angle order.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Breaking changes are encouraged when they improve quality.

pub mod api;
pub mod cluster;
pub mod graph;
pub mod merge;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Convenience re-exports so callers can name the substrate without digging.
pub use graph::{Graph, NodeId};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cluster::{
        collect_clusters, consolidate_cluster_coordinates, Cluster, ClusterCfg,
    };
    pub use crate::graph::masks::{MaskGuard, NodeMask};
    pub use crate::graph::rand::{draw_edge_soup, ReplayToken, ScatterCfg};
    pub use crate::graph::{Graph, NodeId};
    pub use crate::merge::{
        classify_and_merge_duplicate_edges, consolidate_and_sort_by_angle,
        sort_vertex_loops_by_angle, EdgeSortKey, MergeCfg, MergePolicy,
    };
    pub use nalgebra::Vector2 as Vec2;
}

//! Random planar edge soups (jittered sites + replay tokens).
//!
//! Purpose
//! - Provide a small, deterministic generator of numerically dirty input
//!   graphs for tests and benchmarks: many endpoints that are almost
//!   coincident, plus a controllable share of duplicate edges.
//!
//! Model
//! - Scatter `sites` random points in a square extent, draw `edges` random
//!   site pairs as isolated edges, append anti-parallel duplicates for a
//!   fraction of them, then jitter every endpoint independently. Endpoints
//!   of one site end up within `2 * jitter` of each other but rarely equal,
//!   which is exactly the state the welding passes exist to clean up.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Graph;

/// Edge-soup generator configuration.
#[derive(Clone, Copy, Debug)]
pub struct ScatterCfg {
    /// Number of distinct sites scattered in the extent (min 2).
    pub sites: usize,
    /// Number of random site pairs drawn as edges.
    pub edges: usize,
    /// Side length of the square the sites land in.
    pub extent: f64,
    /// Per-coordinate endpoint jitter amplitude (uniform in `[-jitter, jitter]`).
    pub jitter: f64,
    /// Fraction of edges that get an anti-parallel duplicate appended.
    pub duplicate_frac: f64,
}

impl Default for ScatterCfg {
    fn default() -> Self {
        Self {
            sites: 32,
            edges: 64,
            extent: 100.0,
            jitter: 1e-7,
            duplicate_frac: 0.25,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a random dirty edge soup.
///
/// Every edge is added isolated (singleton rings at both ends) and both of
/// its ends are labeled with the edge's draw index, so callers can map the
/// welded graph back to the draw.
pub fn draw_edge_soup(cfg: ScatterCfg, tok: ReplayToken) -> Graph {
    let mut rng = tok.to_std_rng();
    let site_count = cfg.sites.max(2);
    let jitter = cfg.jitter.max(0.0);
    let sites: Vec<Vector2<f64>> = (0..site_count)
        .map(|_| {
            Vector2::new(
                rng.gen::<f64>() * cfg.extent,
                rng.gen::<f64>() * cfg.extent,
            )
        })
        .collect();

    let mut picks: Vec<(usize, usize)> = Vec::with_capacity(cfg.edges);
    for _ in 0..cfg.edges {
        let i = rng.gen_range(0..site_count);
        let mut j = rng.gen_range(0..site_count);
        if j == i {
            j = (j + 1) % site_count;
        }
        picks.push((i, j));
    }
    let dup_count = ((cfg.edges as f64) * cfg.duplicate_frac.clamp(0.0, 1.0)).round() as usize;
    for k in 0..dup_count.min(cfg.edges) {
        let (i, j) = picks[k];
        picks.push((j, i));
    }

    let mut g = Graph::new();
    for (e, &(i, j)) in picks.iter().enumerate() {
        let wobble = |rng: &mut StdRng| {
            Vector2::new(
                (rng.gen::<f64>() * 2.0 - 1.0) * jitter,
                (rng.gen::<f64>() * 2.0 - 1.0) * jitter,
            )
        };
        let d0 = wobble(&mut rng);
        let d1 = wobble(&mut rng);
        let (n0, n1) = g.add_edge(sites[i] + d0, sites[j] + d1);
        g.set_label(n0, e as i64);
        g.set_label(n1, e as i64);
    }
    g
}

//! Criterion benchmarks for the full welding pipeline, per merge policy.
//! Focus sizes: edges in {64, 256, 1024}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p planarweld

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use planarweld::graph::{draw_edge_soup, Graph, ReplayToken, ScatterCfg};
use planarweld::merge::{consolidate_and_sort_by_angle, MergeCfg, MergePolicy};

fn soup(edges: usize, seed: u64) -> Graph {
    let cfg = ScatterCfg {
        sites: (edges / 2).max(4),
        edges,
        extent: 100.0,
        jitter: 1e-7,
        duplicate_frac: 0.25,
    };
    draw_edge_soup(cfg, ReplayToken { seed, index: 0 })
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for &m in &[64usize, 256, 1024] {
        for (name, policy) in [
            ("pipeline_parity", MergePolicy::Parity),
            ("pipeline_keep_one", MergePolicy::KeepOne),
            ("pipeline_bundle", MergePolicy::Bundle),
        ] {
            group.bench_with_input(BenchmarkId::new(name, m), &m, |b, &m| {
                b.iter_batched(
                    || soup(m, 47),
                    |mut g| {
                        let cfg = MergeCfg {
                            tolerance: 1e-6,
                            policy,
                            ..MergeCfg::default()
                        };
                        let _clusters = consolidate_and_sort_by_angle(&mut g, &cfg);
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);

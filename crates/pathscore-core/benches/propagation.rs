//! Propagation throughput benchmarks.
//!
//! Paths stress round count (diameter grows with size); grids stress
//! frontier width. Run with:
//!
//! ```sh
//! cargo bench --bench propagation
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use pathscore_core::config::DirectionPolicy;
use pathscore_core::graph::{EdgeDirection, SnaGraph};
use pathscore_core::paths::{ScoreType, compute_scores};

const SIZES: [usize; 3] = [64, 256, 1024];

fn path_graph(n: usize) -> SnaGraph {
    let mut g = SnaGraph::with_vertices(n);
    for i in 1..n {
        g.add_edge(i - 1, i, EdgeDirection::Undirected);
    }
    g
}

fn grid_graph(n: usize) -> SnaGraph {
    let side = n.isqrt().max(1);
    let mut g = SnaGraph::with_vertices(side * side);
    for r in 0..side {
        for c in 0..side {
            let v = r * side + c;
            if c + 1 < side {
                g.add_edge(v, v + 1, EdgeDirection::Directed);
            }
            if r + 1 < side {
                g.add_edge(v, v + side, EdgeDirection::Directed);
            }
        }
    }
    g
}

fn bench_metric(c: &mut Criterion, name: &str, build: fn(usize) -> SnaGraph, policy: DirectionPolicy) {
    let mut group = c.benchmark_group(name);
    for n in SIZES {
        let g = build(n);
        group.throughput(Throughput::Elements(n as u64));
        for metric in [ScoreType::Eccentricity, ScoreType::Betweenness] {
            group.bench_with_input(BenchmarkId::new(metric.as_str(), n), &g, |b, g| {
                b.iter(|| {
                    let result = compute_scores(g, metric, &policy, false).expect("scores");
                    black_box(result.rounds)
                });
            });
        }
    }
    group.finish();
}

fn bench_path(c: &mut Criterion) {
    bench_metric(c, "propagate.path", path_graph, DirectionPolicy::default());
}

fn bench_grid_directed(c: &mut Criterion) {
    bench_metric(c, "propagate.grid_outgoing", grid_graph, DirectionPolicy::outgoing());
}

criterion_group!(benches, bench_path, bench_grid_directed);
criterion_main!(benches);

use bkclique::bk::{MaximalCliques, SearchOptions, VertexOrdering};
use bkclique::graph::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_graph(n: usize, density: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let edges = (0..n as Vertex)
        .tuple_combinations()
        .filter(|_| rng.gen_bool(density))
        .collect_vec();
    Graph::from_edges(n, &edges).unwrap()
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");
    for (n, density) in [(200, 0.1), (100, 0.5)] {
        let g = random_graph(n, density, 42);
        for ordering in [VertexOrdering::Degeneracy, VertexOrdering::Natural] {
            let opt = SearchOptions {
                ordering,
                ..SearchOptions::default()
            };
            let id = BenchmarkId::new(format!("{ordering:?}"), n);
            group.bench_with_input(id, &g, |b, g| {
                b.iter(|| MaximalCliques::new(g, opt.clone()).run())
            });
        }
    }
    group.finish();
}

fn bench_record_tree(c: &mut Criterion) {
    let g = random_graph(60, 0.3, 7);
    let opt = SearchOptions {
        record_tree: true,
        ..SearchOptions::default()
    };
    c.bench_function("record_tree", |b| {
        b.iter(|| MaximalCliques::new(&g, opt.clone()).run())
    });
}

criterion_group!(benches, bench_enumerate, bench_record_tree);
criterion_main!(benches);

//! Benchmarks for walk generation under each transition model.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use graphwalk::{generate_walks, BiasParameters, Graph, NodeId, Transition, WalkConfig};
use rand::prelude::*;
use std::hint::black_box;

fn ring(n: usize) -> Graph {
    Graph::from_edges(n, (0..n).map(|i| (i, (i + 1) % n))).unwrap()
}

/// Preferential attachment graph (Barabási–Albert) with `m` edges per new node.
///
/// Heavy-tailed degrees make the biased step's adjacency checks show up, unlike a ring.
fn barabasi_albert(n: usize, m: usize, seed: u64) -> Graph {
    assert!(n >= m.max(2));
    assert!(m >= 1);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = Graph::new(n);

    // Start with a clique of size m+1.
    let init = m + 1;
    let mut targets: Vec<NodeId> = Vec::new(); // node ids repeated by degree
    for i in 0..init {
        for j in (i + 1)..init {
            g.add_edge(i, j).unwrap();
            targets.push(i);
            targets.push(j);
        }
    }

    for v in init..n {
        let mut chosen: Vec<NodeId> = Vec::with_capacity(m);
        while chosen.len() < m {
            let u = targets[rng.random_range(0..targets.len())];
            if u != v && !chosen.contains(&u) {
                chosen.push(u);
            }
        }
        for &u in &chosen {
            g.add_edge(v, u).unwrap();
            targets.push(u);
            targets.push(v);
        }
    }
    g
}

fn bench_walk_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk_generation");

    for n in [1_000usize, 10_000] {
        let graphs = [("ring", ring(n)), ("ba_m4", barabasi_albert(n, 4, 123))];
        let transitions = [
            ("uniform", Transition::Uniform),
            ("weighted", Transition::Weighted),
            ("biased", Transition::Biased(BiasParameters { p: 0.5, q: 2.0 })),
        ];

        for (name, g) in &graphs {
            for (kind, transition) in transitions {
                // Keep total work bounded.
                let cfg = WalkConfig { length: 40, walks_per_node: 2, transition, seed: 123 };
                group.bench_with_input(BenchmarkId::new(format!("{name}/{kind}"), n), &n, |b, _| {
                    b.iter(|| {
                        let walks = generate_walks(black_box(g), black_box(cfg)).unwrap();
                        black_box(walks);
                    })
                });
            }
        }
    }

    group.finish();
}

criterion_group!(benches, bench_walk_generation);
criterion_main!(benches);

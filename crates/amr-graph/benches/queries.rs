use amr_graph::quad_strip;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn queries_bench(c: &mut Criterion) {
    let graph = quad_strip(2_000).unwrap();
    let quads: Vec<_> = graph.hyperedges().map(|(id, _)| id).collect();

    c.bench_function("boundary_lookup", |b| {
        b.iter(|| {
            for quad in &quads {
                let edge = graph.edge(*quad).unwrap();
                for (a, z) in edge.boundary_pairs() {
                    black_box(graph.get_edge_between(a, z));
                }
            }
        });
    });

    c.bench_function("reference_points", |b| {
        b.iter(|| {
            for quad in &quads {
                black_box(graph.reference_point(*quad).unwrap());
            }
        });
    });
}

criterion_group!(benches, queries_bench);
criterion_main!(benches);

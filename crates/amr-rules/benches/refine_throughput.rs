use amr_core::Point;
use amr_graph::{initial_mesh, single_hexagon};
use amr_rules::{
    build_all, MarkHexagon, Production, RefineHexagon, RuleKind, RuleOptions, SplitBorderEdge,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn refine_bench(c: &mut Criterion) {
    c.bench_function("refine_single_hexagon", |b| {
        b.iter(|| {
            let mut graph = single_hexagon(Point::new(0.0, 0.0), 1.0, true).unwrap();
            MarkHexagon.try_apply(&mut graph, None).unwrap();
            while SplitBorderEdge.try_apply(&mut graph, None).unwrap().is_some() {}
            black_box(RefineHexagon::new().try_apply(&mut graph, None).unwrap());
        });
    });

    let graph = initial_mesh(5.0).unwrap();
    let rules = build_all(&RuleKind::ALL, &RuleOptions::default());
    c.bench_function("match_initial_mesh", |b| {
        b.iter(|| {
            for rule in &rules {
                black_box(rule.can_apply(&graph, None));
            }
        });
    });
}

criterion_group!(benches, refine_bench);
criterion_main!(benches);

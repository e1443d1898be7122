//! Benchmarks for 3D bin packing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use u_packing_core::solver::{Config, Solver, Strategy};
use u_packing_d3::{Container3D, Item3D, Packer3D};

fn mixed_items(count: u64) -> Vec<Item3D> {
    (0..count)
        .map(|i| {
            Item3D::new(format!("B{}", i), 5 + i % 7, 4 + i % 5, 3 + i % 4).with_weight(0.5)
        })
        .collect()
}

fn packer_benchmark(c: &mut Criterion) {
    let uniform: Vec<Item3D> = (0..20)
        .map(|i| Item3D::new(format!("B{}", i), 10, 10, 10))
        .collect();

    let container = Container3D::new(100, 100, 100);
    let packer = Packer3D::default_config();

    c.bench_function("pack_20_uniform_boxes", |b| {
        b.iter(|| {
            let result = packer.solve(black_box(&uniform), black_box(&container));
            black_box(result)
        })
    });

    let mixed = mixed_items(30);
    let bin = Container3D::new(30, 30, 30).with_max_weight(10.0);
    let ga = Packer3D::new(
        Config::default()
            .with_strategy(Strategy::GeneticAlgorithm)
            .with_max_generations(20)
            .with_seed(7),
    );

    c.bench_function("ga_30_mixed_boxes", |b| {
        b.iter(|| {
            let result = ga.solve(black_box(&mixed), black_box(&bin));
            black_box(result)
        })
    });
}

criterion_group!(benches, packer_benchmark);
criterion_main!(benches);

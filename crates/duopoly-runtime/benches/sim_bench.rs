use criterion::{black_box, criterion_group, criterion_main, Criterion};
use duopoly_core::{PricePair, RunConfig, Scenario};

fn bench_runs(c: &mut Criterion) {
    let scenario = Scenario::baseline();
    c.bench_function("simulate 50 periods", |b| {
        b.iter(|| {
            let _ = black_box(duopoly_runtime::simulate_scenario(&scenario));
        })
    });

    let long = RunConfig {
        num_periods: 5_000,
        rng_seed: 42,
    };
    c.bench_function("simulate 5000 periods", |b| {
        b.iter(|| {
            let _ = black_box(duopoly_runtime::simulate_seeded(
                PricePair::new(45.0, 40.0),
                &long,
                &scenario.model,
            ));
        })
    });

    let seeds: Vec<u64> = (0..64).collect();
    c.bench_function("batch 64 x 500 periods", |b| {
        b.iter(|| {
            let _ = black_box(duopoly_runtime::simulate_batch(
                scenario.initial_prices,
                500,
                &scenario.model,
                &seeds,
            ));
        })
    });
}

criterion_group!(benches, bench_runs);
criterion_main!(benches);

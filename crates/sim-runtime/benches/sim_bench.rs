use criterion::{criterion_group, criterion_main, Criterion};
use sim_core::{Decisions, FirmState, Parameters};

fn bench_quarters(c: &mut Criterion) {
    let params = Parameters::default();
    let decisions = Decisions::default();
    c.bench_function("advance_quarter", |b| {
        b.iter(|| sim_runtime::advance_quarter(FirmState::initial(), &params, &decisions))
    });
    c.bench_function("year_with_summary", |b| {
        b.iter(|| {
            let mut engine = sim_runtime::Engine::new(params.clone());
            for _ in 0..4 {
                engine.simulate_quarter(&decisions);
            }
            engine.summary()
        })
    });
}

criterion_group!(benches, bench_quarters);
criterion_main!(benches);

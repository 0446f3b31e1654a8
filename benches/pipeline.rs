//! Pipeline benchmarks: risk metrics, valuation and a full analysis run.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use folioscope::{Analyzer, AssetId, Holdings, MarketData, RiskEngine};

/// Generate `n_assets` positions with `n_returns` periodic returns each.
///
/// Returns drift around zero using a simple deterministic RNG.
fn generate_inputs(n_assets: usize, n_returns: usize) -> (Holdings, MarketData) {
    let mut holdings = Holdings::default();
    let mut data = MarketData::default();

    // Simple deterministic PRNG (xorshift32)
    let mut rng_state: u32 = 42;
    let mut next = || {
        rng_state ^= rng_state << 13;
        rng_state ^= rng_state >> 17;
        rng_state ^= rng_state << 5;
        rng_state
    };

    for i in 0..n_assets {
        let id = AssetId::new(format!("S{i:03}"));
        let returns: Vec<f64> = (0..n_returns)
            .map(|_| ((next() % 401) as f64 - 200.0) / 10_000.0) // -2%..+2%
            .collect();
        holdings.insert(id.clone(), 10 + (next() % 500) as u64);
        data.prices.insert(id.clone(), 10.0 + (next() % 5_000) as f64 / 10.0);
        data.returns.insert(id, returns);
    }

    (holdings, data)
}

fn bench_risk_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/risk_metrics");
    let engine = RiskEngine::default();

    for n_returns in [5usize, 60, 252] {
        let (_, data) = generate_inputs(20, n_returns);
        group.bench_with_input(
            BenchmarkId::new("20_assets", n_returns),
            &data,
            |b, data| b.iter(|| black_box(engine.calculate_metrics(black_box(&data.returns)))),
        );
    }

    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/full_run");
    let analyzer = Analyzer::default();

    for n_assets in [3usize, 20, 100] {
        let (holdings, data) = generate_inputs(n_assets, 60);
        group.bench_with_input(
            BenchmarkId::new("assets", n_assets),
            &(holdings, data),
            |b, (holdings, data)| {
                b.iter(|| black_box(analyzer.run(black_box(holdings), black_box(data), None)))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_risk_metrics, bench_full_run);
criterion_main!(benches);

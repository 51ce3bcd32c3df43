//! Benchmarks for noise buffer synthesis.
//!
//! This runs on the control thread at every start, so the interesting number
//! is how long a full loop buffer takes, not a block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lowdrone::dsp::noise::{generate_pink_noise_with_rng, generate_white_noise_with_rng};
use rand::{rngs::StdRng, SeedableRng};

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");
    group.sample_size(20);

    for seconds in [1.0f32, 5.0] {
        let mut rng = StdRng::seed_from_u64(1);
        group.bench_with_input(BenchmarkId::new("pink", seconds), &seconds, |b, &s| {
            b.iter(|| generate_pink_noise_with_rng(48_000, black_box(s), &mut rng))
        });

        let mut rng = StdRng::seed_from_u64(1);
        group.bench_with_input(BenchmarkId::new("white", seconds), &seconds, |b, &s| {
            b.iter(|| generate_white_noise_with_rng(48_000, black_box(s), &mut rng))
        });
    }

    group.finish();
}

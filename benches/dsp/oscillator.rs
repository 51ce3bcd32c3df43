//! Benchmarks for sine generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lowdrone::dsp::oscillator::SineOscillator;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Audio-rate tone, A1
        let mut tone = SineOscillator::new();
        group.bench_with_input(BenchmarkId::new("tone", size), &size, |b, _| {
            b.iter(|| {
                tone.render(black_box(&mut buffer), black_box(55.0), 48_000.0);
            })
        });

        // Same math at control rate; cost should match the tone
        let mut lfo = SineOscillator::new();
        group.bench_with_input(BenchmarkId::new("lfo", size), &size, |b, _| {
            b.iter(|| {
                lfo.render(black_box(&mut buffer), black_box(0.2), 48_000.0);
            })
        });
    }

    group.finish();
}

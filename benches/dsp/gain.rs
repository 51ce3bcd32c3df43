//! Benchmarks for the modulated gain stage math.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lowdrone::dsp::gain::{apply_modulated_gain, sum_in_place};

use crate::BLOCK_SIZES;

pub fn bench_gain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/gain");

    for &size in BLOCK_SIZES {
        let source: Vec<f32> = (0..size).map(|i| (i as f32 * 0.01).sin()).collect();
        let modulation: Vec<f32> = (0..size).map(|i| 0.08 * (i as f32 * 0.001).sin()).collect();
        let mut buffer = source.clone();

        // Clamp per sample (max with zero)
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&source);
                apply_modulated_gain(black_box(&mut buffer), 0.25, black_box(&modulation));
            })
        });

        // What the renderer does for every edge
        group.bench_with_input(BenchmarkId::new("sum", size), &size, |b, _| {
            b.iter(|| {
                sum_in_place(black_box(&mut buffer), black_box(&source));
            })
        });
    }

    group.finish();
}

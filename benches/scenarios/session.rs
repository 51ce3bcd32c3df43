//! Benchmarks for rendering a full play session.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use lowdrone::{device::OfflineDevice, ParamName, SignalGraphController};

use crate::BLOCK_SIZES;

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === STEADY DRONE ===
        // Six nodes, two LFO-modulated gain stages, nothing changing
        let mut drone = SignalGraphController::new(OfflineDevice::factory(48_000));
        drone.start().expect("offline device starts");
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| {
                if let Some(device) = drone.device_mut() {
                    device.render(black_box(&mut buffer));
                }
            })
        });

        // === SLIDER DRAG ===
        // One parameter write per block, applied at the next block boundary
        let mut drone = SignalGraphController::new(OfflineDevice::factory(48_000));
        drone.start().expect("offline device starts");
        let mut step = 0u32;
        group.bench_with_input(BenchmarkId::new("slider_drag", size), &size, |b, _| {
            b.iter(|| {
                step = (step + 1) % 100;
                let value = 0.1 + step as f32 * 0.005;
                drone
                    .set(ParamName::ToneGain, value)
                    .expect("queue drains every block");
                if let Some(device) = drone.device_mut() {
                    device.render(black_box(&mut buffer));
                }
            })
        });
    }

    group.finish();
}

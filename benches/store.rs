//! Spawn/draw/cull throughput of the particle store.
//!
//! Run with: `cargo bench --bench store`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use pinwheel::config::EffectConfig;
use pinwheel::{FrameDriver, ManualClock, ParticleStore, RecordingBackend};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME: f32 = 1.0 / 60.0;

/// A store that has been spawning at 60 fps for six seconds.
fn saturated_store() -> ParticleStore<StdRng> {
    let mut store = ParticleStore::new(EffectConfig::default(), StdRng::seed_from_u64(42));
    for i in 0..360 {
        let now = i as f32 * FRAME;
        store.spawn(now);
        store.cull(now);
    }
    store
}

fn bench_update(c: &mut Criterion) {
    let store = saturated_store();
    let now = 360.0 * FRAME;

    c.bench_function("update_saturated", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for (_, pose) in store.update(black_box(now)) {
                acc += pose.matrix().x_axis.x;
            }
            acc
        })
    });
}

fn bench_spawn_cull(c: &mut Criterion) {
    c.bench_function("spawn_cull_frame", |b| {
        b.iter_batched(
            saturated_store,
            |mut store| {
                let now = 360.0 * FRAME;
                store.spawn(now);
                black_box(store.cull(now))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_driver_tick(c: &mut Criterion) {
    let mut driver = FrameDriver::new(
        RecordingBackend::new(),
        ManualClock::new(),
        StdRng::seed_from_u64(7),
        EffectConfig::default(),
    );
    let mut frame = 0u32;

    c.bench_function("driver_tick_steady_state", |b| {
        b.iter(|| {
            frame += 1;
            black_box(driver.tick_at(frame as f32 * FRAME))
        })
    });
}

criterion_group!(benches, bench_update, bench_spawn_cull, bench_driver_tick);
criterion_main!(benches);

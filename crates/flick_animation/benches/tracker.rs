use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flick_animation::{Easing, MomentumTracker, TrackerTimings};

fn bench_momentum_run(c: &mut Criterion) {
    c.bench_function("tracker_full_fling_60fps", |b| {
        b.iter(|| {
            let mut tracker = MomentumTracker::new(TrackerTimings::default());
            tracker.start(0.0, black_box(-120.0), 2000.0, -5000.0, 0.0, 0.0);
            let mut now = 0.0;
            while !tracker.done() {
                now += 1000.0 / 60.0;
                black_box(tracker.update(true, now));
            }
            tracker.position()
        })
    });
}

fn bench_easing_table(c: &mut Criterion) {
    c.bench_function("easing_out_quad_sweep", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for i in 0..1000 {
                acc += Easing::OutQuad.ease(black_box(i as f32), 0.0, 1.0, 1000.0);
            }
            acc
        })
    });
}

criterion_group!(benches, bench_momentum_run, bench_easing_table);
criterion_main!(benches);

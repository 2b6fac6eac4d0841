//! Benchmark: full place() pipeline vs raw compute_position().
//!
//! Run with: `cargo bench -p tether-layout --bench placement_bench`
//!
//! place() runs on every scroll event of an open panel, so it has to stay
//! far below a frame budget even with flip and clamp engaged.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tether_core::geometry::{BoundingBox, Size, Viewport};
use tether_layout::guard::place;
use tether_layout::placement::Placement;
use tether_layout::position::compute_position;

fn bench_compute_position(c: &mut Criterion) {
    let anchor = BoundingBox::new(100.0, 50.0, 40.0, 20.0);
    let panel = Size::new(120.0, 60.0);

    c.bench_function("compute_position/all_placements", |b| {
        b.iter(|| {
            for p in Placement::ALL {
                black_box(compute_position(black_box(&anchor), panel, p, 8.0));
            }
        })
    });
}

fn bench_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("place");
    let vp = Viewport::new(1280.0, 800.0);
    let panel = Size::new(240.0, 320.0);

    // No flip, no clamp.
    let roomy = BoundingBox::new(200.0, 500.0, 80.0, 24.0);
    group.bench_function("roomy", |b| {
        b.iter(|| place(black_box(&roomy), panel, Placement::BOTTOM, 8.0, vp, 8.0))
    });

    // Preferred side has no room: flip then clamp.
    let cramped = BoundingBox::new(4.0, 1270.0, 80.0, 24.0);
    group.bench_function("flip_and_clamp", |b| {
        b.iter(|| place(black_box(&cramped), panel, Placement::TOP_END, 8.0, vp, 8.0))
    });

    group.finish();
}

criterion_group!(benches, bench_compute_position, bench_place);
criterion_main!(benches);

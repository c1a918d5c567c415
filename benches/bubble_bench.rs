//! Criterion benches for the packers, the track walk and a full tick.

// criterion_group! emits an undocumented pub fn; the builder calls return
// `&mut Self`.
#![allow(missing_docs, unused_results)]

use std::f32::consts::FRAC_PI_4;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use thought_bubble::bubble::{BubbleMode, FrameInputs, ThoughtBubble};
use thought_bubble::geometry::{
    pack_diameters, pack_discs, DiameterBounds, DiscPackRequest, RoundedRect,
};
use thought_bubble::options::BubbleOptions;
use glam::Vec2;
use web_time::{Duration, Instant};

fn diameter_packing_benchmark(c: &mut Criterion) {
    let bounds = DiameterBounds::new(14.0, 24.0);
    c.bench_function("pack_diameters_perimeter_400", |b| {
        b.iter(|| black_box(pack_diameters(black_box(400.0), bounds, 7)))
    });
}

fn disc_packing_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_discs");

    for count in [1, 3, 6] {
        let request = DiscPackRequest {
            parent_radius: 20.0,
            count,
            pinned_angle: 3.0 * FRAC_PI_4,
            spacing: 2.0,
        };
        group.bench_function(format!("{count}_discs"), |b| {
            b.iter(|| black_box(pack_discs(black_box(&request), 7)))
        });
    }
    group.finish();
}

fn path_benchmark(c: &mut Criterion) {
    let rect = RoundedRect::new(Vec2::ZERO, Vec2::new(160.0, 60.0), 18.0);
    let perimeter = rect.perimeter();
    c.bench_function("rounded_rect_point_at", |b| {
        b.iter(|| black_box(rect.point_at(black_box(perimeter * 0.63))))
    });
}

fn frame_tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bubble_tick");

    for mode in [BubbleMode::Thinking, BubbleMode::Talking] {
        let epoch = Instant::now();
        let mut bubble =
            ThoughtBubble::with_epoch(BubbleOptions::default(), 7, epoch);
        let inputs = FrameInputs::new(180.0, 64.0).with_mode(mode);
        let mut frame = 0u32;

        group.bench_function(mode.as_str(), |b| {
            b.iter(|| {
                frame += 1;
                let now = epoch + Duration::from_millis(u64::from(frame) * 16);
                black_box(bubble.tick(now, black_box(&inputs)))
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    diameter_packing_benchmark,
    disc_packing_benchmark,
    path_benchmark,
    frame_tick_benchmark
);
criterion_main!(benches);

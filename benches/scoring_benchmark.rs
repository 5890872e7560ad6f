//! Benchmark for rack layout and pin counting.

use bevy::prelude::*;
use bevy_bowling::resources::{BowlingConfig, BowlingGame};
use bevy_bowling::systems::layout::rack_layout;
use bevy_bowling::systems::round::count_fallen;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn benchmark_rack_layout(c: &mut Criterion) {
    let config = BowlingConfig::default();
    let mut group = c.benchmark_group("Rack Layout");

    for rows in [4usize, 16, 64].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(rows), rows, |b, &rows| {
            b.iter(|| {
                std::hint::black_box(rack_layout(rows, config.rack_spacing, config.rack_front_z))
            });
        });
    }

    group.finish();
}

fn benchmark_count_fallen(c: &mut Criterion) {
    let threshold = BowlingConfig::default().fallen_threshold;
    let mut group = c.benchmark_group("Count Fallen");

    for pin_count in [10usize, 1000, 100000].iter() {
        // Every third pin lies on its side
        let rotations: Vec<Quat> = (0..*pin_count)
            .map(|i| {
                if i % 3 == 0 {
                    Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)
                } else {
                    Quat::from_rotation_y(i as f32 * 0.1)
                }
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(pin_count),
            pin_count,
            |b, &_count| {
                b.iter(|| std::hint::black_box(count_fallen(rotations.iter().copied(), threshold)));
            },
        );
    }

    group.finish();
}

fn benchmark_full_game(c: &mut Criterion) {
    c.bench_function("Record 1000 Throws", |b| {
        b.iter(|| {
            let mut game = BowlingGame::new(5);
            for throw in 0..1000usize {
                std::hint::black_box(game.record_throw(throw % 11, 10));
            }
        });
    });
}

criterion_group!(
    benches,
    benchmark_rack_layout,
    benchmark_count_fallen,
    benchmark_full_game
);
criterion_main!(benches);

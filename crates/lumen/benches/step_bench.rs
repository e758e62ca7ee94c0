use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lumen::{BoundaryMode, Field};

fn bench_step_mono(c: &mut Criterion) {
    // The default scene size with a single driven point
    let mut field = Field::new(151, 101, BoundaryMode::Absorbing).unwrap();
    field.add_point_source(76, 51, 0, 1.0, 10.0, 0.0).unwrap();

    c.bench_function("step_mono_151x101", |b| {
        b.iter(|| {
            field.step();
            black_box(field.step_count());
        })
    });
}

fn bench_step_rgb_scene(c: &mut Criterion) {
    // Lens plus plane wave, three channels
    let mut field = Field::rgb(300, 300, BoundaryMode::Absorbing).unwrap();
    field.set_lens_index(120, 150, 120.0, 30.0).unwrap();
    field.add_rect_sources(20, 21, 100, 200, 5.0, 1.0, 10.0).unwrap();

    c.bench_function("step_rgb_300x300", |b| {
        b.iter(|| {
            field.step();
            black_box(field.step_count());
        })
    });
}

fn bench_stamp_circle(c: &mut Criterion) {
    let mut field = Field::new(300, 300, BoundaryMode::Absorbing).unwrap();

    c.bench_function("stamp_circle_r100", |b| {
        b.iter(|| black_box(field.set_circle_index(150, 150, black_box(100.0), 0.4).unwrap()))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut field = Field::rgb(200, 200, BoundaryMode::Reflecting).unwrap();
    field.add_circle_sources(100, 100, 5.0, 90.0, 10.0, 1.0, 10.0).unwrap();
    field.step_n(50);

    c.bench_function("snapshot_200x200_rgb", |b| b.iter(|| black_box(field.snapshot())));
}

criterion_group!(
    benches,
    bench_step_mono,
    bench_step_rgb_scene,
    bench_stamp_circle,
    bench_snapshot
);
criterion_main!(benches);

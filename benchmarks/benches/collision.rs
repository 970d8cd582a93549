//! Collision engine benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench collision
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench collision -- broadphase

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use rein_collide::ecs::prelude::*;
use rein_collide::physics::broadphase::{coarse_collided, BoundingRadiusBroadphase};
use rein_collide::physics::contact::polygon_polygon_contact;
use rein_collide::physics::direction::classify_circle;
use rein_collide::physics::narrowphase::{circle_circle, circle_rect, detect_collision, rect_rect};
use rein_collide::{Circle, CollisionWorld, LayerMask, Rectangle};
use rein_collide_bench::*;

// ---------------------------------------------------------------------------
// Broadphase
// ---------------------------------------------------------------------------

fn bench_broadphase(c: &mut Criterion) {
    let layers = LayerMask::all();

    {
        let mut group = c.benchmark_group("broadphase/mixed_shapes");
        for &n in &[100, 500, 1000] {
            let shapes = setup_mixed_shapes(n);
            let broadphase = BoundingRadiusBroadphase::new();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| broadphase.find_pairs(&shapes, &layers));
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/sparse");
        for &n in &[100, 500, 1000] {
            let shapes = setup_sparse_shapes(n);
            let broadphase = BoundingRadiusBroadphase::new();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| broadphase.find_pairs(&shapes, &layers));
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/coarse_aabb");
        for &n in &[100, 500] {
            let shapes = setup_mixed_shapes(n);
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| coarse_collided(&shapes, &layers, 1.0 / 60.0));
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Narrowphase
// ---------------------------------------------------------------------------

fn bench_narrowphase(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("narrowphase/circle_circle");
        let circle = Circle { radius: 1.0 };
        group.bench_function("intersecting", |b| {
            b.iter(|| circle_circle(Vec2::ZERO, &circle, Vec2::new(1.5, 0.0), &circle));
        });
        group.bench_function("separated", |b| {
            b.iter(|| circle_circle(Vec2::ZERO, &circle, Vec2::new(5.0, 0.0), &circle));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/rect_rect");
        let rect = Rectangle::new(2.0, 2.0, 0.0);
        group.bench_function("intersecting", |b| {
            b.iter(|| rect_rect(Vec2::ZERO, &rect, Vec2::new(1.5, 0.0), &rect));
        });
        group.bench_function("separated", |b| {
            b.iter(|| rect_rect(Vec2::ZERO, &rect, Vec2::new(5.0, 0.0), &rect));
        });

        let rotated = Rectangle::new(2.0, 2.0, 45.0);
        group.bench_function("rotated", |b| {
            b.iter(|| rect_rect(Vec2::ZERO, &rect, Vec2::new(1.6, 1.6), &rotated));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/circle_rect");
        let circle = Circle { radius: 1.0 };
        let rect = Rectangle::new(2.0, 2.0, 30.0);
        group.bench_function("intersecting", |b| {
            b.iter(|| circle_rect(Vec2::new(1.5, 0.0), &circle, Vec2::ZERO, &rect));
        });
        group.bench_function("separated", |b| {
            b.iter(|| circle_rect(Vec2::new(5.0, 0.0), &circle, Vec2::ZERO, &rect));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/batch");
        for &n in &[100, 500, 1000] {
            let shapes = setup_mixed_shapes(n);
            group.bench_with_input(BenchmarkId::from_parameter(n), &shapes, |b, shapes| {
                b.iter(|| {
                    for pair in shapes.windows(2) {
                        detect_collision(&pair[0], &pair[1]);
                    }
                });
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Contacts and classification
// ---------------------------------------------------------------------------

fn bench_contacts(c: &mut Criterion) {
    let mut group = c.benchmark_group("contacts");

    let ground = Rectangle::new(4.0, 2.0, 0.0).vertices(Vec2::ZERO);
    let stacked = Rectangle::new(2.0, 2.0, 0.0).vertices(Vec2::new(0.5, 1.9));
    group.bench_function("polygon_polygon", |b| {
        b.iter(|| polygon_polygon_contact(&ground, &stacked));
    });

    group.bench_function("classify_circle", |b| {
        b.iter(|| classify_circle(Vec2::ZERO, Vec2::X, Vec2::new(0.7, 0.7)));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

fn bench_pipeline(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("pipeline/step");
        group.sample_size(30);
        for &n in &[100, 500, 1000] {
            let shapes = setup_mixed_shapes(n);
            let layers = LayerMask::all();
            let mut engine = CollisionWorld::default();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| {
                    engine.step(shapes.iter().cloned(), &layers);
                });
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/ecs_frame");
        group.sample_size(20);
        for &n in &[100, 500] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n),
                    |(mut world, layers)| {
                        let mut engine = CollisionWorld::default();
                        for _ in 0..10 {
                            integrate_motion(&mut world, 1.0 / 60.0);
                            collision_system(&mut world, &mut engine, &layers);
                            collision_response_system(&mut world, &engine);
                        }
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }
}

criterion_group!(
    benches,
    bench_broadphase,
    bench_narrowphase,
    bench_contacts,
    bench_pipeline
);
criterion_main!(benches);

//! Scene builders shared by the collision benchmarks.

use glam::Vec2;
use rein_collide::ecs::prelude::*;
use rein_collide::{LayerConfig, LayerMask, Rectangle, Shape};

/// Deterministic pseudo-random value in `[0, 1)` for index `i`.
pub fn hash01(i: u32) -> f32 {
    let mut x = i.wrapping_mul(0x9E37_79B9) ^ 0x85EB_CA6B;
    x ^= x >> 16;
    x = x.wrapping_mul(0x7FEB_352D);
    x ^= x >> 15;
    (x & 0x00FF_FFFF) as f32 / 16_777_216.0
}

fn scatter(i: u32, extent: f32) -> Vec2 {
    Vec2::new(hash01(2 * i), hash01(2 * i + 1)) * extent
}

/// `n` rectangles and circles packed so that roughly a third overlap a neighbour.
pub fn setup_mixed_shapes(n: usize) -> Vec<Shape> {
    let extent = (n as f32).sqrt() * 2.5;
    (0..n as u32)
        .map(|i| {
            let position = scatter(i, extent);
            if i % 2 == 0 {
                let rect = Rectangle::new(2.0, 1.0 + hash01(i + 7), hash01(i + 11) * 90.0);
                Shape::rectangle(i as i32, 0, position, rect)
            } else {
                Shape::circle(i as i32, 0, position, 0.5 + hash01(i + 3) * 0.5)
            }
        })
        .collect()
}

/// `n` unit squares spread far apart, so the broadphase rejects nearly everything.
pub fn setup_sparse_shapes(n: usize) -> Vec<Shape> {
    let extent = (n as f32).sqrt() * 20.0;
    (0..n as u32)
        .map(|i| {
            Shape::rectangle(
                i as i32,
                0,
                scatter(i, extent),
                Rectangle::new(1.0, 1.0, 0.0),
            )
        })
        .collect()
}

/// ECS scene of `n` moving colliders on top of a static floor.
pub fn setup_scene(n: usize) -> (hecs::World, LayerConfig) {
    let mut world = hecs::World::new();
    let width = (n as f32).sqrt() * 3.0;

    world.spawn((
        Transform2d::from_position(Vec2::new(width * 0.5, -1.0)),
        Collider2d::rectangle(width + 4.0, 2.0),
        EntityTag(-1),
    ));

    for i in 0..n as u32 {
        let position = scatter(i, width) + Vec2::new(0.0, 1.0);
        let collider = if i % 3 == 0 {
            Collider2d::circle(0.5)
        } else {
            Collider2d::rectangle(1.0, 1.0)
        };
        world.spawn((
            Transform2d::from_position(position),
            RigidBody2d::at(position).with_acceleration(Vec2::new(0.0, -9.81)),
            collider,
            EntityTag(i as i32),
        ));
    }

    (world, LayerConfig::new(LayerMask::all()))
}

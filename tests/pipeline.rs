//! End-to-end frames through the public API.

use rein_collide::glam::Vec2;
use rein_collide::{
    resolve_collisions, BlockedFlags, CollisionWorld, LayerConfig, LayerMask, Motion, Rectangle,
    ResponseBody, Shape,
};

fn layers_from_file() -> LayerConfig {
    let mut mask = LayerMask::new();
    mask.set_collision(0, 0, true);
    mask.set_collision(0, 1, true);
    let text = LayerConfig::new(mask).to_text();
    LayerConfig::from_text(&text).unwrap()
}

#[test]
fn test_frame_detect_then_respond() {
    let layers = layers_from_file();
    let mut world = CollisionWorld::default();

    let player = Shape::circle(1, 1, Vec2::new(0.0, 1.8), 1.0)
        .with_previous_position(Vec2::new(0.0, 2.0))
        .with_velocity(Vec2::new(0.0, -12.0));
    let floor = Shape::rectangle(2, 0, Vec2::ZERO, Rectangle::new(10.0, 2.0, 0.0));
    // Layer 1 does not collide with itself.
    let ghost = Shape::circle(3, 1, Vec2::new(0.3, 1.8), 1.0);

    let pairs = world.step([player, floor, ghost], &layers.mask).to_vec();
    assert_eq!(pairs.len(), 2);
    assert!(world.collided_with(1).contains(&2));
    assert!(!world.collided_with(1).contains(&3));

    // Falling onto the floor: the contact is straight ahead of the player's
    // heading, and on top of the floor.
    assert_eq!(world.flags(1), BlockedFlags::UP);
    assert_eq!(world.flags(2), BlockedFlags::UP);

    let mut bodies = vec![
        ResponseBody::new(
            1,
            Vec2::new(0.0, 1.8),
            Some(Motion {
                velocity: Vec2::new(0.0, -12.0),
                acceleration: Vec2::new(0.0, -9.8),
            }),
        ),
        ResponseBody::new(2, Vec2::ZERO, None),
        ResponseBody::new(3, Vec2::new(0.3, 1.8), Some(Motion::default())),
    ];
    resolve_collisions(&mut bodies, &pairs);

    let player = &bodies[0];
    assert!((player.position - Vec2::new(0.0, 2.0)).length() < 1e-4);
    assert_eq!(player.motion.unwrap().velocity, Vec2::ZERO);
    assert!(bodies[1].is_collided);
    assert_eq!(bodies[1].position, Vec2::ZERO);

    // Next frame the player rests exactly on the floor: touching is not a collision.
    let player = Shape::circle(1, 1, Vec2::new(0.0, 2.0), 1.0);
    let floor = Shape::rectangle(2, 0, Vec2::ZERO, Rectangle::new(10.0, 2.0, 0.0));
    world.step([player, floor], &layers.mask);
    assert!(world.pairs().is_empty());
    assert!(world.flags(1).is_empty());
}

#[test]
fn test_layer_file_roundtrip_on_disk() {
    let mut config = layers_from_file();
    config.set_enabled(5, false);

    let path = std::env::temp_dir().join(format!("rein_collide_layers_{}.txt", std::process::id()));
    config.save(&path).unwrap();
    let loaded = LayerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
    assert!(loaded.mask.collide(1, 0));
    assert!(!loaded.mask.collide(1, 1));
    assert!(!loaded.is_enabled(5));
}

#[test]
fn test_raycast_and_coarse_queries() {
    let mut world = CollisionWorld::default();
    world.step(
        [
            Shape::rectangle(10, 0, Vec2::new(4.0, 0.0), Rectangle::new(2.0, 2.0, 0.0)),
            Shape::rectangle(11, 0, Vec2::new(4.5, 0.5), Rectangle::new(2.0, 2.0, 0.0)),
            Shape::circle(12, 0, Vec2::new(-4.0, 0.0), 1.0),
        ],
        &LayerMask::all(),
    );

    let hit = world.raycast(Vec2::ZERO, Vec2::new(10.0, 0.0), &[0], None).unwrap();
    assert_eq!(hit.entity, 10);
    assert!((hit.point - Vec2::new(3.0, 0.0)).length() < 1e-4);
    assert!(world.raycast(Vec2::ZERO, Vec2::new(-10.0, 0.0), &[0], None).is_none());

    assert_eq!(world.coarse_collided(&LayerMask::all()), vec![10, 11]);
}

#[test]
fn test_thin_floor_reports_one_side() {
    let mut world = CollisionWorld::default();
    let ball = Shape::circle(1, 0, Vec2::new(0.3, 1.0), 1.0)
        .with_previous_position(Vec2::new(0.3, 1.1));
    let floor = Shape::rectangle(2, 0, Vec2::ZERO, Rectangle::new(10.0, 0.04, 0.0));

    world.step([ball, floor], &LayerMask::all());

    assert_eq!(world.pairs().len(), 1);
    assert_eq!(world.flags(1), BlockedFlags::UP);
    assert_eq!(world.flags(2), BlockedFlags::UP);
}

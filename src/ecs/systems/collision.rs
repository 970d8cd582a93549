//! ECS collision systems.
//!
//! Bridges `hecs` entities carrying [`Collider2d`] to a [`CollisionWorld`].
//! A frame is typically [`integrate_motion`], then [`collision_system`], then
//! [`collision_response_system`].

use std::collections::HashMap;

use glam::Vec2;
use tracing::warn;

use crate::ecs::components::physics::{Collider2d, ColliderKind, EntityTag, RigidBody2d};
use crate::ecs::components::transform::Transform2d;
use crate::physics::layer::LayerConfig;
use crate::physics::response::{resolve_collisions, Motion, ResponseBody};
use crate::physics::shape::{Rectangle, Shape};
use crate::physics::CollisionWorld;

/// Store previous positions, then integrate: v += a * dt, p += v * dt.
///
/// `last_direction` only changes on steps that actually move the body.
pub fn integrate_motion(world: &mut hecs::World, dt: f32) {
    for (_, (transform, rb)) in world.query_mut::<(&mut Transform2d, &mut RigidBody2d)>() {
        rb.previous_position = transform.position;
        rb.velocity += rb.acceleration * dt;
        let step = rb.velocity * dt;
        transform.position += step;
        if let Some(direction) = step.try_normalize() {
            rb.last_direction = direction;
        }
    }
}

fn collider_shape(
    tag: EntityTag,
    collider: &Collider2d,
    transform: &Transform2d,
    rb: Option<&RigidBody2d>,
) -> Shape {
    let position = transform.transform_point(collider.offset);
    let scale = transform.scale.abs();

    let shape = match collider.kind {
        ColliderKind::Rectangle { size } => {
            let size = size * scale;
            let rect = Rectangle::new(size.x, size.y, transform.rotation);
            Shape::rectangle(tag.0, collider.layer, position, rect)
        }
        ColliderKind::Circle { radius } => {
            Shape::circle(tag.0, collider.layer, position, radius * scale.max_element())
        }
    };

    match rb {
        Some(rb) => shape
            .with_previous_position(rb.previous_position + (position - transform.position))
            .with_velocity(rb.velocity)
            .with_last_direction(rb.last_direction),
        None => shape,
    }
}

/// Run collision detection for every tagged collider and write the results
/// back to the colliders.
///
/// Colliders with `collision_check` off or on a disabled layer are skipped
/// but still have their outputs cleared. When several entities share a tag
/// only the first one is submitted.
pub fn collision_system(world: &mut hecs::World, engine: &mut CollisionWorld, layers: &LayerConfig) {
    let mut shapes = Vec::new();
    let mut submitted: HashMap<i32, hecs::Entity> = HashMap::new();
    for (entity, (collider, transform, tag, rb)) in world.query_mut::<(
        &mut Collider2d,
        &Transform2d,
        &EntityTag,
        Option<&RigidBody2d>,
    )>() {
        collider.clear_outputs();
        if !collider.collision_check || !layers.is_enabled(collider.layer) {
            continue;
        }
        if let Some(first) = submitted.get(&tag.0) {
            warn!(
                "Entity {:?} reuses collision tag {} of {:?}, skipping",
                entity, tag.0, first
            );
            continue;
        }
        submitted.insert(tag.0, entity);
        shapes.push(collider_shape(*tag, collider, transform, rb));
    }

    engine.step(shapes, &layers.mask);

    for (entity, (collider, tag)) in world.query_mut::<(&mut Collider2d, &EntityTag)>() {
        if submitted.get(&tag.0) != Some(&entity) {
            continue;
        }
        collider.blocked = engine.flags(tag.0);
        collider.contacts = engine.contacts(tag.0).to_vec();
        collider.collided_with = engine.collided_with(tag.0).to_vec();
        collider.is_collided = !collider.collided_with.is_empty();
    }
}

/// Push colliding entities apart using the pairs of the last
/// [`collision_system`] run.
///
/// Only entities whose tag the engine knows take part, one entity per tag.
pub fn collision_response_system(world: &mut hecs::World, engine: &CollisionWorld) {
    let mut entities = Vec::new();
    let mut bodies: Vec<ResponseBody> = Vec::new();
    for (entity, (collider, transform, tag, rb)) in world.query_mut::<(
        &Collider2d,
        &Transform2d,
        &EntityTag,
        Option<&RigidBody2d>,
    )>() {
        if !collider.collision_check || engine.shape(tag.0).is_none() {
            continue;
        }
        if bodies.iter().any(|body| body.entity == tag.0) {
            warn!("Entity {:?} reuses collision tag {}, skipping", entity, tag.0);
            continue;
        }
        let motion = rb.map(|rb| Motion {
            velocity: rb.velocity,
            acceleration: rb.acceleration,
        });
        entities.push(entity);
        bodies.push(
            ResponseBody::new(tag.0, transform.position, motion)
                .with_response(collider.collision_response),
        );
    }

    resolve_collisions(&mut bodies, engine.pairs());

    for (entity, body) in entities.into_iter().zip(bodies) {
        let Ok((collider, transform, rb)) = world.query_one_mut::<(
            &mut Collider2d,
            &mut Transform2d,
            Option<&mut RigidBody2d>,
        )>(entity) else {
            continue;
        };

        collider.is_collided = body.is_collided;
        collider.collided_with = body.collided_with;
        if let (Some(rb), Some(motion)) = (rb, body.motion) {
            rb.velocity = motion.velocity;
            rb.acceleration = motion.acceleration;
            transform.position = body.position;
        }
    }
}

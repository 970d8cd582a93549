//! Positional collision response.
//!
//! Each colliding pair pushes both shapes apart by the full penetration depth
//! along the pair normal and stops them. There is no impulse solver.

use std::collections::HashMap;

use glam::Vec2;
use tracing::warn;

use super::contact::CollidedPair;

/// Motion state of a shape that has a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

/// Per-shape state read and written by [`resolve_collisions`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBody {
    pub entity: i32,
    pub position: Vec2,
    /// `None` when the shape has no rigid body. Such shapes are never moved.
    pub motion: Option<Motion>,
    /// Whether this shape is pushed out of collisions.
    pub collision_response: bool,
    pub is_collided: bool,
    pub collided_with: Vec<i32>,
}

impl ResponseBody {
    pub fn new(entity: i32, position: Vec2, motion: Option<Motion>) -> Self {
        Self {
            entity,
            position,
            motion,
            collision_response: true,
            is_collided: false,
            collided_with: Vec::new(),
        }
    }

    pub fn with_response(mut self, collision_response: bool) -> Self {
        self.collision_response = collision_response;
        self
    }
}

/// Apply the response pass for one frame.
///
/// Every body gets its `collided_with` list rebuilt from `pairs`. A body is
/// displaced only when both it and its partner have response enabled and it
/// has a rigid body: its velocity and acceleration are zeroed and it moves by
/// `-normal * depth` as the first shape of the pair or `+normal * depth` as
/// the second.
pub fn resolve_collisions(bodies: &mut [ResponseBody], pairs: &[CollidedPair]) {
    let mut responds: HashMap<i32, bool> = HashMap::with_capacity(bodies.len());
    for body in bodies.iter() {
        responds.insert(body.entity, body.collision_response);
    }

    for body in bodies.iter_mut() {
        body.collided_with.clear();
        body.is_collided = false;

        for pair in pairs {
            let (partner, sign) = if pair.entity_a == body.entity {
                (pair.entity_b, -1.0_f32)
            } else if pair.entity_b == body.entity {
                (pair.entity_a, 1.0)
            } else {
                continue;
            };

            body.collided_with.push(partner);
            body.is_collided = true;

            if !body.collision_response {
                continue;
            }
            let Some(&partner_responds) = responds.get(&partner) else {
                warn!(
                    "Entity {} collided with {} which has no response body",
                    body.entity, partner
                );
                continue;
            };
            if !partner_responds {
                continue;
            }

            if let Some(motion) = body.motion.as_mut() {
                motion.velocity = Vec2::ZERO;
                motion.acceleration = Vec2::ZERO;
                body.position += pair.normal * pair.depth * sign;
            }
        }
    }
}

//! `hecs` integration.
//!
//! Components describe colliders on entities; systems feed them through a
//! [`CollisionWorld`](crate::physics::CollisionWorld) each frame.

pub mod components;
pub mod systems;

/// Commonly used ECS types.
pub mod prelude {
    pub use super::components::physics::{Collider2d, ColliderKind, EntityTag, RigidBody2d};
    pub use super::components::transform::Transform2d;
    pub use super::systems::{collision_response_system, collision_system, integrate_motion};
}

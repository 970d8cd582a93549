//! Collision components for ECS entities.

use glam::Vec2;

use crate::physics::contact::ContactRecord;
use crate::physics::direction::BlockedFlags;

/// Motion state consumed by the collision response.
#[derive(Debug, Clone, Default)]
pub struct RigidBody2d {
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Position before the last integration step, used for the heading.
    pub previous_position: Vec2,
    /// Unit direction of the last step that moved the body. Zero until it
    /// first moves.
    pub last_direction: Vec2,
}

impl RigidBody2d {
    /// Create a rigid body at rest at `position`.
    pub fn at(position: Vec2) -> Self {
        Self {
            previous_position: position,
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }
}

/// Collider geometry in local units, before the transform's scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderKind {
    Rectangle { size: Vec2 },
    Circle { radius: f32 },
}

/// Collision component.
///
/// The `is_collided`, `collided_with`, `blocked` and `contacts` fields are
/// outputs, rewritten by the collision systems every frame.
#[derive(Debug, Clone)]
pub struct Collider2d {
    pub kind: ColliderKind,
    /// Offset from the entity's transform origin.
    pub offset: Vec2,
    pub layer: usize,
    /// If false, the entity is not submitted to the engine at all.
    pub collision_check: bool,
    /// If false, collisions are reported but the entity is never pushed out.
    pub collision_response: bool,

    pub is_collided: bool,
    pub collided_with: Vec<i32>,
    pub blocked: BlockedFlags,
    pub contacts: Vec<ContactRecord>,
}

impl Collider2d {
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::new(ColliderKind::Rectangle {
            size: Vec2::new(width, height),
        })
    }

    pub fn circle(radius: f32) -> Self {
        Self::new(ColliderKind::Circle { radius })
    }

    fn new(kind: ColliderKind) -> Self {
        Self {
            kind,
            offset: Vec2::ZERO,
            layer: 0,
            collision_check: true,
            collision_response: true,
            is_collided: false,
            collided_with: Vec::new(),
            blocked: BlockedFlags::empty(),
            contacts: Vec::new(),
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_layer(mut self, layer: usize) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_response(mut self, collision_response: bool) -> Self {
        self.collision_response = collision_response;
        self
    }

    /// Reset the per-frame outputs.
    pub fn clear_outputs(&mut self) {
        self.is_collided = false;
        self.collided_with.clear();
        self.blocked = BlockedFlags::empty();
        self.contacts.clear();
    }
}

impl Default for Collider2d {
    fn default() -> Self {
        Self::rectangle(1.0, 1.0)
    }
}

/// Integer id under which an entity is known to the collision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityTag(pub i32);

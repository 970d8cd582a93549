//! Rein 2D collision engine
//!
//! Collision detection and a minimal positional response for oriented
//! rectangles and circles.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **physics::shape** - Shape model and bounding volumes
//! 2. **physics::layer** - Layer collision matrix and its text file format
//! 3. **physics::broadphase** - Bounding-radius pruning and coarse AABB queries
//! 4. **physics::narrowphase** - SAT tests with normal and penetration depth
//! 5. **physics::contact** - Contact point generation
//! 6. **physics::direction** - Blocked-side classification
//! 7. **physics::response** - Push-out response
//! 8. **physics::raycast** - Segment queries
//! 9. **ecs** - hecs ECS integration (feature = "ecs")

pub mod physics;

#[cfg(feature = "ecs")]
pub mod ecs;

// Re-export commonly used types
pub use physics::{CollisionConfig, CollisionWorld};

pub use physics::contact::{CollidedPair, ContactInfo, ContactManifold, ContactRecord};
pub use physics::direction::BlockedFlags;
pub use physics::layer::{LayerConfig, LayerFileError, LayerMask, LAYER_COUNT, LAYER_NAMES};
pub use physics::raycast::RayHit;
pub use physics::response::{resolve_collisions, Motion, ResponseBody};
pub use physics::shape::{Aabb, Circle, Rectangle, Shape, ShapeKind};

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

// Re-export glam for convenience
pub use glam;

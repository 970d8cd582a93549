//! 2D collision detection for rectangles and circles.
//!
//! # Architecture
//!
//! [`CollisionWorld::step`] runs one frame in fixed stages:
//!
//! 1. Collect shapes (reset per-frame state, refresh bounding boxes)
//! 2. Broadphase (layer mask and bounding-radius test)
//! 3. Narrowphase (SAT for every shape pairing)
//! 4. Contact generation (one or two points per pair)
//! 5. Direction classification (blocked sides per shape)
//!
//! The results stay readable until the next step. [`response::resolve_collisions`]
//! consumes the pairs to push shapes apart.

pub mod broadphase;
pub mod contact;
pub mod direction;
pub mod layer;
pub mod narrowphase;
pub mod raycast;
pub mod response;
pub mod shape;

use std::collections::HashMap;

use glam::Vec2;
use tracing::{debug, error};

use self::broadphase::BoundingRadiusBroadphase;
use self::contact::{
    circle_circle_contact, circle_polygon_contact, polygon_polygon_contact, CollidedPair,
    ContactManifold, ContactRecord,
};
use self::direction::{classify_circle, classify_rectangle, BlockedFlags};
use self::layer::LayerMask;
use self::narrowphase::detect_collision;
use self::raycast::RayHit;
use self::shape::{Shape, ShapeKind};

/// Tolerance for near-equal distances and degenerate segments.
pub const GEOMETRIC_EPSILON: f32 = 5e-4;
/// Tolerance for treating two contact points as the same point, and for
/// corner contacts on rectangles.
pub const CONTACT_EPSILON: f32 = 5e-2;

/// Configuration for the collision pipeline.
#[derive(Debug, Clone)]
pub struct CollisionConfig {
    /// Time window for swept tests in the coarse path. Default: 1/60.
    pub sweep_dt: f32,
    /// Heading used for circles that have neither moved nor have a velocity.
    /// Default: +Y.
    pub fallback_heading: Vec2,
    /// Whether to compute blocked sides. Default: true.
    pub classify_directions: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            sweep_dt: 1.0 / 60.0,
            fallback_heading: Vec2::Y,
            classify_directions: true,
        }
    }
}

impl CollisionConfig {
    pub fn sweep_dt(mut self, dt: f32) -> Self {
        self.sweep_dt = dt;
        self
    }

    pub fn fallback_heading(mut self, heading: Vec2) -> Self {
        self.fallback_heading = heading;
        self
    }

    pub fn classify_directions(mut self, enabled: bool) -> Self {
        self.classify_directions = enabled;
        self
    }
}

/// Per-frame collision state.
///
/// Holds the shapes of the current frame and everything derived from them.
/// Each [`step`](Self::step) replaces the previous frame wholesale.
pub struct CollisionWorld {
    config: CollisionConfig,
    broadphase: BoundingRadiusBroadphase,
    shapes: Vec<Shape>,
    index: HashMap<i32, usize>,
    pairs: Vec<CollidedPair>,
    collided: Vec<i32>,
    contacts: Vec<Vec<ContactRecord>>,
    collided_with: Vec<Vec<i32>>,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

impl CollisionWorld {
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            config,
            broadphase: BoundingRadiusBroadphase::new(),
            shapes: Vec::new(),
            index: HashMap::new(),
            pairs: Vec::new(),
            collided: Vec::new(),
            contacts: Vec::new(),
            collided_with: Vec::new(),
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Drop all shapes and results of the previous frame.
    pub fn clear_frame(&mut self) {
        self.shapes.clear();
        self.index.clear();
        self.pairs.clear();
        self.collided.clear();
        self.contacts.clear();
        self.collided_with.clear();
    }

    /// Run one frame over `shapes` and return the colliding pairs.
    pub fn step(
        &mut self,
        shapes: impl IntoIterator<Item = Shape>,
        layers: &LayerMask,
    ) -> &[CollidedPair] {
        self.clear_frame();
        self.collect(shapes);
        self.detect(layers);
        self.generate_contacts();

        debug!(
            "Collision step: {} shapes, {} pairs, {} collided",
            self.shapes.len(),
            self.pairs.len(),
            self.collided.len()
        );

        &self.pairs
    }

    fn collect(&mut self, shapes: impl IntoIterator<Item = Shape>) {
        for mut shape in shapes {
            if self.index.contains_key(&shape.entity) {
                error!("Duplicate collision shape for entity {}, skipping", shape.entity);
                continue;
            }
            shape.flags = BlockedFlags::empty();
            shape.update_aabb();
            self.index.insert(shape.entity, self.shapes.len());
            self.shapes.push(shape);
        }

        self.contacts.resize_with(self.shapes.len(), Vec::new);
        self.collided_with.resize_with(self.shapes.len(), Vec::new);
    }

    fn detect(&mut self, layers: &LayerMask) {
        let candidates = self.broadphase.find_pairs(&self.shapes, layers);

        for (i, j) in candidates {
            let (a, b) = (&self.shapes[i], &self.shapes[j]);
            let Some(info) = detect_collision(a, b) else {
                continue;
            };

            self.pairs.push(CollidedPair {
                a: i,
                b: j,
                entity_a: a.entity,
                entity_b: b.entity,
                normal: info.normal,
                depth: info.penetration,
            });
            for entity in [a.entity, b.entity] {
                if !self.collided.contains(&entity) {
                    self.collided.push(entity);
                }
            }
            self.collided_with[i].push(b.entity);
            self.collided_with[j].push(a.entity);
        }
    }

    fn generate_contacts(&mut self) {
        let fallback = self.config.fallback_heading;

        for pair in &self.pairs {
            let (a, b) = (&self.shapes[pair.a], &self.shapes[pair.b]);
            let manifold = pair_contacts(a, b);

            for &point in manifold.points() {
                self.contacts[pair.a].push(ContactRecord {
                    point,
                    partner: b.entity,
                    count: manifold.len(),
                });
                self.contacts[pair.b].push(ContactRecord {
                    point,
                    partner: a.entity,
                    count: manifold.len(),
                });
            }

            if !self.config.classify_directions {
                continue;
            }
            let flags_a = blocked_sides(a, &manifold, fallback);
            let flags_b = blocked_sides(b, &manifold, fallback);
            self.shapes[pair.a].flags |= flags_a;
            self.shapes[pair.b].flags |= flags_b;
        }
    }

    /// Shapes of the current frame, in insertion order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, entity: i32) -> Option<&Shape> {
        self.index.get(&entity).map(|&i| &self.shapes[i])
    }

    /// Pairs that passed the narrowphase this frame.
    pub fn pairs(&self) -> &[CollidedPair] {
        &self.pairs
    }

    /// Entity ids involved in at least one collision, first-seen order.
    pub fn collided_shapes(&self) -> &[i32] {
        &self.collided
    }

    pub fn is_collided(&self, entity: i32) -> bool {
        self.collided.contains(&entity)
    }

    /// Blocked sides of `entity`. Empty for unknown ids.
    pub fn flags(&self, entity: i32) -> BlockedFlags {
        self.shape(entity)
            .map(|shape| shape.flags)
            .unwrap_or_default()
    }

    pub fn contacts(&self, entity: i32) -> &[ContactRecord] {
        match self.index.get(&entity) {
            Some(&i) => &self.contacts[i],
            None => &[],
        }
    }

    pub fn collided_with(&self, entity: i32) -> &[i32] {
        match self.index.get(&entity) {
            Some(&i) => &self.collided_with[i],
            None => &[],
        }
    }

    /// Coarse AABB-only query over the current frame's shapes.
    pub fn coarse_collided(&self, layers: &LayerMask) -> Vec<i32> {
        broadphase::coarse_collided(&self.shapes, layers, self.config.sweep_dt)
    }

    /// Nearest rectangle on one of `layers` crossed by `from..to`.
    pub fn raycast(
        &self,
        from: Vec2,
        to: Vec2,
        layers: &[usize],
        ignore: Option<i32>,
    ) -> Option<RayHit> {
        raycast::raycast(&self.shapes, from, to, layers, ignore)
    }
}

fn pair_contacts(a: &Shape, b: &Shape) -> ContactManifold {
    match (&a.kind, &b.kind) {
        (ShapeKind::Circle(ca), ShapeKind::Circle(_)) => {
            ContactManifold::single(circle_circle_contact(a.position, ca.radius, b.position))
        }
        (ShapeKind::Circle(_), ShapeKind::Rectangle(rb)) => {
            ContactManifold::single(circle_polygon_contact(a.position, &rb.vertices(b.position)))
        }
        (ShapeKind::Rectangle(ra), ShapeKind::Circle(_)) => {
            ContactManifold::single(circle_polygon_contact(b.position, &ra.vertices(a.position)))
        }
        (ShapeKind::Rectangle(ra), ShapeKind::Rectangle(rb)) => {
            polygon_polygon_contact(&ra.vertices(a.position), &rb.vertices(b.position))
        }
    }
}

fn blocked_sides(shape: &Shape, manifold: &ContactManifold, fallback: Vec2) -> BlockedFlags {
    match &shape.kind {
        ShapeKind::Circle(_) => manifold
            .points()
            .iter()
            .fold(BlockedFlags::empty(), |flags, &point| {
                flags | classify_circle(shape.position, shape.heading(fallback), point)
            }),
        ShapeKind::Rectangle(rect) => classify_rectangle(rect, shape.position, manifold.points()),
    }
}

//! Broadphase collision detection.
//!
//! The main path prunes pairs with a layer test and a bounding-circle test.
//! The coarse path works on cached AABBs only and is used where an exact
//! answer is not needed.

use glam::Vec2;

use super::layer::LayerMask;
use super::shape::{Aabb, Shape, ShapeKind};

/// Whether the bounding circles of two shapes overlap or touch.
#[inline]
pub fn within_bounding_radius(a: &Shape, b: &Shape) -> bool {
    let radii = a.bounding_radius() + b.bounding_radius();
    a.position.distance_squared(b.position) <= radii * radii
}

/// Bounding-radius broadphase (O(n^2) pair-wise test in insertion order).
#[derive(Debug, Default)]
pub struct BoundingRadiusBroadphase;

impl BoundingRadiusBroadphase {
    pub fn new() -> Self {
        Self
    }

    /// Find candidate pairs `(i, j)` with `i < j`, as indices into `shapes`.
    ///
    /// Pairs sharing an entity id or on non-colliding layers are skipped.
    pub fn find_pairs(&self, shapes: &[Shape], layers: &LayerMask) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();

        for i in 0..shapes.len() {
            for j in (i + 1)..shapes.len() {
                let (a, b) = (&shapes[i], &shapes[j]);
                if a.entity == b.entity {
                    continue;
                }
                if layers.collide(a.layer, b.layer) && within_bounding_radius(a, b) {
                    pairs.push((i, j));
                }
            }
        }

        pairs
    }
}

/// Swept AABB test: do the boxes overlap now, or will they within `dt` given
/// their velocities?
pub fn swept_aabb(a: &Aabb, velocity_a: Vec2, b: &Aabb, velocity_b: Vec2, dt: f32) -> bool {
    if a.overlaps(b) {
        return true;
    }

    let relative = velocity_a - velocity_b;
    let mut t_first = 0.0_f32;
    let mut t_last = dt;

    for axis in 0..2 {
        let v = relative[axis];
        let (a_min, a_max) = (a.min[axis], a.max[axis]);
        let (b_min, b_max) = (b.min[axis], b.max[axis]);

        if v < 0.0 {
            if b_min > a_max {
                return false;
            }
            if b_max < a_min {
                t_first = t_first.max((b_max - a_min) / v);
            }
            if b_min < a_max {
                t_last = t_last.min((b_min - a_max) / v);
            }
        } else if v > 0.0 {
            if b_min > a_max {
                t_first = t_first.max((b_min - a_max) / v);
            }
            if b_max > a_min {
                t_last = t_last.min((b_max - a_min) / v);
            }
            if b_max < a_min {
                return false;
            }
        } else if b_max < a_min || b_min > a_max {
            return false;
        }

        if t_first > t_last {
            return false;
        }
    }

    true
}

/// Circle against an AABB: clamp the center into the box and compare distances.
pub fn circle_aabb(center: Vec2, radius: f32, aabb: &Aabb) -> bool {
    center.distance_squared(aabb.clamp(center)) <= radius * radius
}

/// Coarse AABB-only pair test.
///
/// Rectangle pairs use [`swept_aabb`] over `dt`; circle-rectangle pairs use
/// [`circle_aabb`]. Circle pairs use their plain radii and must overlap
/// strictly, so touching circles are not reported.
pub fn coarse_overlap(a: &Shape, b: &Shape, dt: f32) -> bool {
    match (&a.kind, &b.kind) {
        (ShapeKind::Rectangle(_), ShapeKind::Rectangle(_)) => {
            swept_aabb(a.aabb(), a.velocity, b.aabb(), b.velocity, dt)
        }
        (ShapeKind::Circle(c), ShapeKind::Rectangle(_)) => circle_aabb(a.position, c.radius, b.aabb()),
        (ShapeKind::Rectangle(_), ShapeKind::Circle(c)) => circle_aabb(b.position, c.radius, a.aabb()),
        (ShapeKind::Circle(ca), ShapeKind::Circle(cb)) => {
            let radii = ca.radius + cb.radius;
            a.position.distance_squared(b.position) < radii * radii
        }
    }
}

/// Entity ids of shapes that coarsely overlap at least one other shape on a
/// colliding layer, in insertion order.
pub fn coarse_collided(shapes: &[Shape], layers: &LayerMask, dt: f32) -> Vec<i32> {
    let mut collided = Vec::new();

    for (i, a) in shapes.iter().enumerate() {
        let hit = shapes.iter().enumerate().any(|(j, b)| {
            i != j && a.entity != b.entity && layers.collide(a.layer, b.layer) && coarse_overlap(a, b, dt)
        });
        if hit && !collided.contains(&a.entity) {
            collided.push(a.entity);
        }
    }

    collided
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::shape::Rectangle;

    fn square(entity: i32, x: f32, y: f32) -> Shape {
        Shape::rectangle(entity, 0, Vec2::new(x, y), Rectangle::new(2.0, 2.0, 0.0))
    }

    #[test]
    fn test_broadphase_overlapping() {
        let shapes = [
            Shape::circle(1, 0, Vec2::ZERO, 1.0),
            Shape::circle(2, 0, Vec2::new(1.0, 0.0), 1.0),
        ];
        let pairs = BoundingRadiusBroadphase::new().find_pairs(&shapes, &LayerMask::all());
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn test_broadphase_rejects_distant_squares() {
        // Bounding radii are sqrt(2) each, centers ~4.24 apart.
        let shapes = [square(1, 0.0, 0.0), square(2, 3.0, 3.0)];
        let pairs = BoundingRadiusBroadphase::new().find_pairs(&shapes, &LayerMask::all());
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_broadphase_layer_gate() {
        let mut shapes = [square(1, 0.0, 0.0), square(2, 0.5, 0.0)];
        shapes[1].layer = 3;

        let mut layers = LayerMask::new();
        layers.set_collision(0, 0, true);
        assert!(BoundingRadiusBroadphase::new()
            .find_pairs(&shapes, &layers)
            .is_empty());

        layers.set_collision(3, 0, true);
        assert_eq!(
            BoundingRadiusBroadphase::new().find_pairs(&shapes, &layers),
            vec![(0, 1)]
        );
    }

    #[test]
    fn test_broadphase_skips_same_entity() {
        let shapes = [square(7, 0.0, 0.0), square(7, 0.5, 0.0)];
        assert!(BoundingRadiusBroadphase::new()
            .find_pairs(&shapes, &LayerMask::all())
            .is_empty());
    }

    #[test]
    fn test_swept_aabb_static_overlap() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::from_center(Vec2::new(1.5, 0.0), Vec2::ONE);
        assert!(swept_aabb(&a, Vec2::ZERO, &b, Vec2::ZERO, 1.0 / 60.0));
    }

    #[test]
    fn test_swept_aabb_hits_within_dt() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::from_center(Vec2::new(3.0, 0.0), Vec2::ONE);
        // Gap of 1.0 closed at 2.0 units/s relative in 0.5 s.
        assert!(swept_aabb(&a, Vec2::new(2.0, 0.0), &b, Vec2::ZERO, 1.0));
        assert!(!swept_aabb(&a, Vec2::new(2.0, 0.0), &b, Vec2::ZERO, 0.25));
        // Moving away never hits.
        assert!(!swept_aabb(&a, Vec2::new(-2.0, 0.0), &b, Vec2::ZERO, 10.0));
        // Relative velocity from B moving toward A.
        assert!(swept_aabb(&a, Vec2::ZERO, &b, Vec2::new(-4.0, 0.0), 0.5));
    }

    #[test]
    fn test_swept_aabb_misses_on_other_axis() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::ONE);
        let b = Aabb::from_center(Vec2::new(3.0, 5.0), Vec2::ONE);
        assert!(!swept_aabb(&a, Vec2::new(10.0, 0.0), &b, Vec2::ZERO, 1.0));
    }

    #[test]
    fn test_circle_aabb() {
        let aabb = Aabb::from_center(Vec2::ZERO, Vec2::ONE);
        assert!(circle_aabb(Vec2::new(1.5, 0.0), 0.5, &aabb));
        assert!(circle_aabb(Vec2::new(0.2, 0.2), 0.1, &aabb));
        assert!(!circle_aabb(Vec2::new(1.5, 1.5), 0.5, &aabb));
    }

    #[test]
    fn test_coarse_collided_lists_each_entity_once() {
        let shapes = [
            square(1, 0.0, 0.0),
            square(2, 1.0, 0.0),
            Shape::circle(3, 0, Vec2::new(-1.5, 0.0), 1.0),
            square(4, 20.0, 0.0),
        ];
        let ids = coarse_collided(&shapes, &LayerMask::all(), 1.0 / 60.0);
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_coarse_touching_circles_not_collided() {
        let shapes = [
            Shape::circle(1, 0, Vec2::ZERO, 1.0),
            Shape::circle(2, 0, Vec2::new(2.0, 0.0), 1.0),
        ];
        assert!(coarse_collided(&shapes, &LayerMask::all(), 1.0 / 60.0).is_empty());

        let shapes = [
            Shape::circle(1, 0, Vec2::ZERO, 1.0),
            Shape::circle(2, 0, Vec2::new(1.99, 0.0), 1.0),
        ];
        assert_eq!(coarse_collided(&shapes, &LayerMask::all(), 1.0 / 60.0), vec![1, 2]);
    }
}

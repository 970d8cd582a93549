//! Segment queries against rectangle bounding boxes.

use glam::Vec2;

use super::shape::{Aabb, Shape};

const RAY_EPSILON: f32 = 1e-4;

/// Nearest rectangle hit by a segment query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: i32,
    pub point: Vec2,
    /// Distance from the segment start to `point`.
    pub distance: f32,
}

#[inline]
fn within_segment_box(point: Vec2, start: Vec2, end: Vec2) -> bool {
    let min = start.min(end) - Vec2::splat(RAY_EPSILON);
    let max = start.max(end) + Vec2::splat(RAY_EPSILON);
    point.cmpge(min).all() && point.cmple(max).all()
}

/// Intersection point of segments `p1..p2` and `q1..q2`.
///
/// Collinear overlapping segments report the midpoint of the shared range.
pub fn segment_intersection(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> Option<Vec2> {
    // Each line as a*x + b*y = c.
    let (a1, b1) = (p2.y - p1.y, p1.x - p2.x);
    let c1 = a1 * p1.x + b1 * p1.y;
    let (a2, b2) = (q2.y - q1.y, q1.x - q2.x);
    let c2 = a2 * q1.x + b2 * q1.y;

    let determinant = a1 * b2 - a2 * b1;

    if determinant.abs() < RAY_EPSILON {
        let collinear = (a1 * q1.x + b1 * q1.y - c1).abs() < RAY_EPSILON;
        let (p_min, p_max) = (p1.min(p2), p1.max(p2));
        let (q_min, q_max) = (q1.min(q2), q1.max(q2));
        let overlapping = p_max.cmpge(q_min).all() && q_max.cmpge(p_min).all();
        if !(collinear && overlapping) {
            return None;
        }
        return Some((p_min.max(q_min) + p_max.min(q_max)) * 0.5);
    }

    let point = Vec2::new(
        (b2 * c1 - b1 * c2) / determinant,
        (a1 * c2 - a2 * c1) / determinant,
    );

    if within_segment_box(point, p1, p2) && within_segment_box(point, q1, q2) {
        Some(point)
    } else {
        None
    }
}

/// Nearest point where `from..to` crosses the boundary of `aabb`.
pub fn segment_aabb(from: Vec2, to: Vec2, aabb: &Aabb) -> Option<Vec2> {
    let bottom_left = aabb.min;
    let top_right = aabb.max;
    let bottom_right = Vec2::new(top_right.x, bottom_left.y);
    let top_left = Vec2::new(bottom_left.x, top_right.y);

    let edges = [
        (bottom_left, bottom_right),
        (bottom_right, top_right),
        (top_right, top_left),
        (top_left, bottom_left),
    ];

    edges
        .iter()
        .filter_map(|&(start, end)| segment_intersection(from, to, start, end))
        .fold(None, |best: Option<Vec2>, point| match best {
            Some(b) if from.distance_squared(b) <= from.distance_squared(point) => Some(b),
            _ => Some(point),
        })
}

/// Cast the segment `from..to` against the AABBs of every rectangle whose
/// layer is listed in `layers`, skipping `ignore`. Circles are never hit.
pub fn raycast(
    shapes: &[Shape],
    from: Vec2,
    to: Vec2,
    layers: &[usize],
    ignore: Option<i32>,
) -> Option<RayHit> {
    let mut nearest: Option<RayHit> = None;

    for shape in shapes {
        if !shape.is_rectangle() || !layers.contains(&shape.layer) || ignore == Some(shape.entity) {
            continue;
        }
        let Some(point) = segment_aabb(from, to, shape.aabb()) else {
            continue;
        };

        let distance = from.distance(point);
        if nearest.map_or(true, |hit| distance < hit.distance) {
            nearest = Some(RayHit {
                entity: shape.entity,
                point,
                distance,
            });
        }
    }

    nearest
}

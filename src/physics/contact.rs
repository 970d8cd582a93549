//! Contact data structures and contact point generation.

use glam::Vec2;

use super::{CONTACT_EPSILON, GEOMETRIC_EPSILON};

/// Result of a narrowphase test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactInfo {
    /// Unit separation normal (from shape A to shape B).
    pub normal: Vec2,
    /// Penetration depth, always positive.
    pub penetration: f32,
}

/// A pair confirmed by the narrowphase this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollidedPair {
    /// Index of the first shape in the frame's shape list.
    pub a: usize,
    /// Index of the second shape in the frame's shape list.
    pub b: usize,
    pub entity_a: i32,
    pub entity_b: i32,
    /// Unit normal from A toward B.
    pub normal: Vec2,
    pub depth: f32,
}

/// One or two world-space contact points between a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactManifold {
    points: [Vec2; 2],
    count: usize,
}

impl ContactManifold {
    pub fn single(point: Vec2) -> Self {
        Self {
            points: [point, point],
            count: 1,
        }
    }

    pub fn pair(first: Vec2, second: Vec2) -> Self {
        Self {
            points: [first, second],
            count: 2,
        }
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points[..self.count]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// A contact point recorded on a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactRecord {
    pub point: Vec2,
    /// Entity id of the shape on the other side of the contact.
    pub partner: i32,
    /// Number of points in the manifold this one came from.
    pub count: usize,
}

/// Closest point to `point` on the segment `start..end`, and its squared distance.
pub fn point_segment_distance(point: Vec2, start: Vec2, end: Vec2) -> (Vec2, f32) {
    let segment = end - start;
    let length_sq = segment.length_squared();

    let closest = if length_sq <= GEOMETRIC_EPSILON {
        start
    } else {
        let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
        if t <= GEOMETRIC_EPSILON {
            start
        } else if t >= 1.0 {
            end
        } else {
            start + segment * t
        }
    };

    (closest, point.distance_squared(closest))
}

/// Contact between two circles, on the surface of A facing B.
pub fn circle_circle_contact(center_a: Vec2, radius_a: f32, center_b: Vec2) -> Vec2 {
    center_a + (center_b - center_a).normalize_or_zero() * radius_a
}

/// Contact between a circle and a convex polygon: the closest boundary point
/// of the polygon to the circle center. First minimum wins.
pub fn circle_polygon_contact(center: Vec2, vertices: &[Vec2]) -> Vec2 {
    let mut best = center;
    let mut min_dist_sq = f32::MAX;

    for (i, &start) in vertices.iter().enumerate() {
        let end = vertices[(i + 1) % vertices.len()];
        let (point, dist_sq) = point_segment_distance(center, start, end);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
            best = point;
        }
    }

    best
}

#[inline]
fn almost_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < GEOMETRIC_EPSILON
}

#[inline]
fn almost_same_point(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < CONTACT_EPSILON && (a.y - b.y).abs() < CONTACT_EPSILON
}

/// Contact points between two convex polygons.
///
/// Every vertex of each polygon is tested against every edge of the other.
/// A candidate that ties the current minimum and is distinct from the points
/// found so far becomes the second contact; a strictly closer one replaces
/// the first and resets the count to one.
pub fn polygon_polygon_contact(vertices_a: &[Vec2], vertices_b: &[Vec2]) -> ContactManifold {
    let mut first = Vec2::ZERO;
    let mut second: Option<Vec2> = None;
    let mut min_dist_sq = f32::MAX;

    let mut visit = |points: &[Vec2], edges: &[Vec2]| {
        for &point in points {
            for (i, &start) in edges.iter().enumerate() {
                let end = edges[(i + 1) % edges.len()];
                let (candidate, dist_sq) = point_segment_distance(point, start, end);

                if almost_equal(dist_sq, min_dist_sq) {
                    let distinct = !almost_same_point(first, candidate)
                        && second.map_or(true, |s| !almost_same_point(s, candidate));
                    if distinct {
                        second = Some(candidate);
                    }
                } else if dist_sq < min_dist_sq {
                    min_dist_sq = dist_sq;
                    first = candidate;
                    second = None;
                }
            }
        }
    };

    visit(vertices_a, vertices_b);
    visit(vertices_b, vertices_a);

    match second {
        Some(second) => ContactManifold::pair(first, second),
        None => ContactManifold::single(first),
    }
}

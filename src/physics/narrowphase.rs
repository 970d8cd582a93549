//! Narrowphase collision detection: SAT tests for rectangles and circles.

use glam::Vec2;

use super::contact::ContactInfo;
use super::shape::{Circle, Rectangle, Shape, ShapeKind};

/// Projection interval of a point set onto `axis`.
#[inline]
fn project_vertices(vertices: &[Vec2], axis: Vec2) -> (f32, f32) {
    vertices
        .iter()
        .map(|v| v.dot(axis))
        .fold((f32::MAX, f32::MIN), |(min, max), p| (min.min(p), max.max(p)))
}

/// Projection interval of a circle onto a unit `axis`.
#[inline]
fn project_circle(center: Vec2, radius: f32, axis: Vec2) -> (f32, f32) {
    let a = (center + axis * radius).dot(axis);
    let b = (center - axis * radius).dot(axis);
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Intervals that only touch are treated as separated.
#[inline]
fn is_separating((min_a, max_a): (f32, f32), (min_b, max_b): (f32, f32)) -> bool {
    min_a >= max_b || min_b >= max_a
}

/// Overlap of two intervals measured as the shorter push-out distance.
#[inline]
fn push_out_depth((min_a, max_a): (f32, f32), (min_b, max_b): (f32, f32)) -> f32 {
    (max_b - min_a).min(max_a - min_b)
}

/// Orient `normal` so it points from `from` toward `to`.
#[inline]
fn orient(normal: Vec2, from: Vec2, to: Vec2) -> Vec2 {
    if (to - from).dot(normal) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// SAT test between two oriented rectangles.
///
/// Tests the four edge normals of each rectangle. The first axis with the
/// smallest overlap wins.
pub fn rect_rect(
    position_a: Vec2,
    rect_a: &Rectangle,
    position_b: Vec2,
    rect_b: &Rectangle,
) -> Option<ContactInfo> {
    let vertices_a = rect_a.vertices(position_a);
    let vertices_b = rect_b.vertices(position_b);
    let axes = rect_a
        .normals(position_a)
        .into_iter()
        .chain(rect_b.normals(position_b));

    let mut depth = f32::MAX;
    let mut normal = Vec2::ZERO;

    for axis in axes {
        if axis == Vec2::ZERO {
            continue;
        }
        let a = project_vertices(&vertices_a, axis);
        let b = project_vertices(&vertices_b, axis);
        if is_separating(a, b) {
            return None;
        }

        let axis_depth = push_out_depth(a, b);
        if axis_depth < depth {
            depth = axis_depth;
            normal = axis;
        }
    }

    if normal == Vec2::ZERO {
        return None;
    }

    Some(ContactInfo {
        normal: orient(normal, position_a, position_b),
        penetration: depth,
    })
}

/// SAT test between a circle and an oriented rectangle.
///
/// Tests the rectangle's edge normals plus the axis from the circle center to
/// the nearest rectangle corner. The normal points from the circle to the
/// rectangle.
pub fn circle_rect(
    center: Vec2,
    circle: &Circle,
    position: Vec2,
    rect: &Rectangle,
) -> Option<ContactInfo> {
    let vertices = rect.vertices(position);
    let mut depth = f32::MAX;
    let mut normal = Vec2::ZERO;

    for axis in rect.normals(position) {
        if axis == Vec2::ZERO {
            continue;
        }
        let a = project_vertices(&vertices, axis);
        let b = project_circle(center, circle.radius, axis);
        if is_separating(a, b) {
            return None;
        }

        let axis_depth = a.1.min(b.1) - a.0.max(b.0);
        if axis_depth < depth {
            depth = axis_depth;
            normal = axis;
        }
    }

    let closest = closest_vertex(center, &vertices);
    if let Some(axis) = (closest - center).try_normalize() {
        let a = project_vertices(&vertices, axis);
        let b = project_circle(center, circle.radius, axis);
        if is_separating(a, b) {
            return None;
        }

        let axis_depth = push_out_depth(a, b);
        if axis_depth < depth {
            depth = axis_depth;
            normal = axis;
        }
    }

    if normal == Vec2::ZERO {
        return None;
    }

    Some(ContactInfo {
        normal: orient(normal, center, position),
        penetration: depth,
    })
}

/// Nearest vertex to `point`, first one wins on ties.
fn closest_vertex(point: Vec2, vertices: &[Vec2; 4]) -> Vec2 {
    let mut best = vertices[0];
    let mut best_dist = point.distance_squared(best);
    for &v in &vertices[1..] {
        let d = point.distance_squared(v);
        if d < best_dist {
            best_dist = d;
            best = v;
        }
    }
    best
}

/// Circle-circle intersection test.
///
/// Touching circles do not collide. Coincident centers separate along +Y.
pub fn circle_circle(
    center_a: Vec2,
    circle_a: &Circle,
    center_b: Vec2,
    circle_b: &Circle,
) -> Option<ContactInfo> {
    let diff = center_b - center_a;
    let dist_sq = diff.length_squared();
    let radii = circle_a.radius + circle_b.radius;

    if dist_sq >= radii * radii {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-6 { diff / dist } else { Vec2::Y };

    Some(ContactInfo {
        normal,
        penetration: radii - dist,
    })
}

/// Detect collision between two shapes. The normal always points from `a` to `b`.
pub fn detect_collision(a: &Shape, b: &Shape) -> Option<ContactInfo> {
    match (&a.kind, &b.kind) {
        (ShapeKind::Rectangle(ra), ShapeKind::Rectangle(rb)) => {
            rect_rect(a.position, ra, b.position, rb)
        }
        (ShapeKind::Circle(ca), ShapeKind::Rectangle(rb)) => {
            circle_rect(a.position, ca, b.position, rb)
        }
        (ShapeKind::Rectangle(ra), ShapeKind::Circle(cb)) => {
            circle_rect(b.position, cb, a.position, ra).map(|info| ContactInfo {
                normal: -info.normal,
                ..info
            })
        }
        (ShapeKind::Circle(ca), ShapeKind::Circle(cb)) => {
            circle_circle(a.position, ca, b.position, cb)
        }
    }
}

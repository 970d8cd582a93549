//! Shape descriptors fed to the collision engine once per frame.

use glam::Vec2;

use super::direction::BlockedFlags;

/// Axis-aligned bounding box used by the coarse collision path.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build a box from a center point and half extents.
    #[inline]
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Test whether two boxes overlap. Touching boxes count as overlapping.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y)
    }

    /// Closest point inside the box to `point`.
    #[inline]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Oriented rectangle. Dimensions are in world units, rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

impl Rectangle {
    pub fn new(width: f32, height: f32, rotation: f32) -> Self {
        Self {
            width,
            height,
            rotation,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// World-space corners centered on `position`.
    ///
    /// Order is top-left, top-right, bottom-right, bottom-left (y up). Edge `i`
    /// runs from corner `i` to corner `(i + 1) % 4`, so in the unrotated frame
    /// edges 0..4 face up, right, down and left.
    pub fn vertices(&self, position: Vec2) -> [Vec2; 4] {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        let rotate = |x: f32, y: f32| Vec2::new(x * cos - y * sin, x * sin + y * cos) + position;

        [
            rotate(-hw, hh),
            rotate(hw, hh),
            rotate(hw, -hh),
            rotate(-hw, -hh),
        ]
    }

    /// Edge vectors between consecutive corners.
    pub fn edges(&self, position: Vec2) -> [Vec2; 4] {
        let v = self.vertices(position);
        [v[1] - v[0], v[2] - v[1], v[3] - v[2], v[0] - v[3]]
    }

    /// Unit outward normals of each edge, `(-e.y, e.x)` normalized.
    pub fn normals(&self, position: Vec2) -> [Vec2; 4] {
        self.edges(position).map(edge_normal)
    }
}

/// Outward normal of a clockwise edge.
#[inline]
pub(crate) fn edge_normal(edge: Vec2) -> Vec2 {
    Vec2::new(-edge.y, edge.x).normalize_or_zero()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f32,
}

/// Geometry of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Rectangle(Rectangle),
    Circle(Circle),
}

/// A collidable shape for one frame.
///
/// Built fresh every frame by the caller and consumed by
/// [`CollisionWorld::step`](super::CollisionWorld::step).
#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Caller-side entity id. Must be unique within one frame.
    pub entity: i32,
    /// Collision layer index, see [`LayerMask`](super::layer::LayerMask).
    pub layer: usize,
    pub position: Vec2,
    /// Position during the previous frame, used to derive the heading.
    pub previous_position: Vec2,
    pub velocity: Vec2,
    /// Last non-zero movement direction, kept across frames by the caller.
    /// Zero when unknown.
    pub last_direction: Vec2,
    /// Blocked sides accumulated during the current frame.
    pub flags: BlockedFlags,
    aabb: Aabb,
}

impl Shape {
    /// Create a rectangle shape. `width` and `height` are world-space sizes.
    pub fn rectangle(entity: i32, layer: usize, position: Vec2, rect: Rectangle) -> Self {
        Self::new(entity, layer, position, ShapeKind::Rectangle(rect))
    }

    /// Create a circle shape.
    pub fn circle(entity: i32, layer: usize, position: Vec2, radius: f32) -> Self {
        Self::new(entity, layer, position, ShapeKind::Circle(Circle { radius }))
    }

    fn new(entity: i32, layer: usize, position: Vec2, kind: ShapeKind) -> Self {
        let mut shape = Self {
            kind,
            entity,
            layer,
            position,
            previous_position: position,
            velocity: Vec2::ZERO,
            last_direction: Vec2::ZERO,
            flags: BlockedFlags::empty(),
            aabb: Aabb::default(),
        };
        shape.update_aabb();
        shape
    }

    /// Set the previous-frame position.
    pub fn with_previous_position(mut self, previous_position: Vec2) -> Self {
        self.previous_position = previous_position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_last_direction(mut self, direction: Vec2) -> Self {
        self.last_direction = direction;
        self
    }

    /// Recompute the cached bounding box from position and half extents.
    ///
    /// Rectangle rotation is not taken into account.
    pub fn update_aabb(&mut self) {
        let half = match &self.kind {
            ShapeKind::Rectangle(rect) => rect.half_extents(),
            ShapeKind::Circle(circle) => Vec2::splat(circle.radius),
        };
        self.aabb = Aabb::from_center(self.position, half);
    }

    /// Cached bounding box from the last [`update_aabb`](Self::update_aabb).
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Radius of a circle enclosing the whole shape.
    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        match &self.kind {
            ShapeKind::Circle(circle) => circle.radius,
            ShapeKind::Rectangle(rect) => rect.half_extents().length(),
        }
    }

    /// Direction of movement this frame. Falls back to velocity, then to the
    /// last recorded direction, then to `fallback`.
    pub fn heading(&self, fallback: Vec2) -> Vec2 {
        let moved = self.position - self.previous_position;
        moved
            .try_normalize()
            .or_else(|| self.velocity.try_normalize())
            .or_else(|| self.last_direction.try_normalize())
            .unwrap_or(fallback)
    }

    pub fn is_rectangle(&self) -> bool {
        matches!(self.kind, ShapeKind::Rectangle(_))
    }
}

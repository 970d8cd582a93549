//! Blocked-side classification of contacts.
//!
//! Circles are classified by the angle between their heading and the vector
//! to the contact, split into four 90 degree sectors. Rectangles are
//! classified by which edge the contact lies on. Both go through
//! [`resolve_sides`], which picks the best-scoring side from an ordered table
//! and adds its runner-up when the two are within a tolerance, so a contact
//! on a sector boundary or a corner reports two adjacent sides.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use glam::Vec2;

use super::shape::Rectangle;
use super::{CONTACT_EPSILON, GEOMETRIC_EPSILON};

/// Set of blocked sides, packed into the low four bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockedFlags(u8);

impl BlockedFlags {
    pub const UP: Self = Self(1 << 0);
    pub const RIGHT: Self = Self(1 << 1);
    pub const DOWN: Self = Self(1 << 2);
    pub const LEFT: Self = Self(1 << 3);

    const ALL_BITS: u8 = 0b1111;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from raw bits, dropping anything above the low four.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL_BITS)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Number of sides set.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for BlockedFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for BlockedFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for BlockedFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::UP, "UP"),
            (Self::RIGHT, "RIGHT"),
            (Self::DOWN, "DOWN"),
            (Self::LEFT, "LEFT"),
        ];
        let mut set = f.debug_set();
        for (flag, name) in names {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// Sector centers in degrees, in heading space.
const SECTORS: [(f32, BlockedFlags); 4] = [
    (0.0, BlockedFlags::UP),
    (90.0, BlockedFlags::RIGHT),
    (180.0, BlockedFlags::DOWN),
    (270.0, BlockedFlags::LEFT),
];

/// Bits owned by each rectangle edge, in vertex order.
const EDGE_SIDES: [BlockedFlags; 4] = [
    BlockedFlags::UP,
    BlockedFlags::RIGHT,
    BlockedFlags::DOWN,
    BlockedFlags::LEFT,
];

/// Pick the highest scoring side, plus the better of its two cyclic
/// neighbours when that one scores within `tolerance` of the best. Earlier
/// entries win ties for first place.
///
/// `sides` must be in cyclic order, so the two bits reported are always
/// adjacent and never opposite.
fn resolve_sides<T>(
    sides: &[(T, BlockedFlags)],
    tolerance: f32,
    score: impl Fn(&T) -> f32,
) -> BlockedFlags {
    let scores: Vec<f32> = sides.iter().map(|(side, _)| score(side)).collect();
    let mut best = match scores.first() {
        Some(_) => 0,
        None => return BlockedFlags::empty(),
    };
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }

    let mut flags = sides[best].1;
    let n = sides.len();
    if n < 2 {
        return flags;
    }
    let prev = (best + n - 1) % n;
    let next = (best + 1) % n;
    let neighbour = if scores[next] > scores[prev] { next } else { prev };
    if scores[best] - scores[neighbour] < tolerance {
        flags |= sides[neighbour].1;
    }
    flags
}

/// Shortest angular distance between two angles in degrees.
#[inline]
fn angular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Angle in `[0, 360)` degrees from the contact direction to `heading`.
///
/// 0 means the contact is straight ahead, 90 to the right of the heading.
pub fn contact_angle(center: Vec2, heading: Vec2, contact: Vec2) -> f32 {
    let to_contact = (contact - center).normalize_or_zero();
    let angle = to_contact
        .perp_dot(heading)
        .atan2(to_contact.dot(heading))
        .to_degrees();
    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Map a heading-space angle to its sector. Angles within
/// [`GEOMETRIC_EPSILON`] degrees of a sector boundary set both sides.
pub fn classify_angle(angle: f32) -> BlockedFlags {
    // A boundary hit within eps moves both distances by eps in opposite directions.
    resolve_sides(&SECTORS, 2.0 * GEOMETRIC_EPSILON, |center| {
        -angular_distance(angle, *center)
    })
}

/// Blocked sides of a circle touching `contact` while moving along `heading`.
pub fn classify_circle(center: Vec2, heading: Vec2, contact: Vec2) -> BlockedFlags {
    classify_angle(contact_angle(center, heading, contact))
}

/// Blocked sides of a rectangle for one or two contact points.
///
/// Two contacts are reduced to their midpoint. The edge whose supporting
/// line is closest to that point on its outward side wins. A point within
/// [`CONTACT_EPSILON`] of a corner sets both adjacent edges. Opposite edges
/// are never set together, however thin the rectangle.
pub fn classify_rectangle(rect: &Rectangle, position: Vec2, contacts: &[Vec2]) -> BlockedFlags {
    let point = match contacts {
        [] => return BlockedFlags::empty(),
        [single] => *single,
        [first, second, ..] => (*first + *second) * 0.5,
    };

    let vertices = rect.vertices(position);
    let normals = rect.normals(position);
    let mut sides = [((Vec2::ZERO, 0.0_f32), BlockedFlags::empty()); 4];
    for i in 0..4 {
        sides[i] = ((normals[i], normals[i].dot(vertices[i])), EDGE_SIDES[i]);
    }

    resolve_sides(&sides, CONTACT_EPSILON, |(normal, offset)| {
        normal.dot(point) - offset
    })
}

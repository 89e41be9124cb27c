//! Static arena geometry and collision queries
//!
//! Everything here works on the XZ plane except tier tops, which give the
//! ground height under a point.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BASE_GROUND_Y;

/// One step of a stepped platform: an XZ footprint with a flat top
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    pub top_y: f32,
}

impl Tier {
    /// Square tier centered on the origin
    pub fn centered(size: f32, top_y: f32) -> Self {
        let half = size / 2.0;
        Self {
            min_x: -half,
            max_x: half,
            min_z: -half,
            max_z: half,
            top_y,
        }
    }

    /// Inclusive footprint test
    pub fn contains(&self, xz: Vec2) -> bool {
        xz.x >= self.min_x && xz.x <= self.max_x && xz.y >= self.min_z && xz.y <= self.max_z
    }
}

/// Axis-aligned box on the XZ plane (pillar footprint)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn from_center(center: Vec2, half_extent: f32) -> Self {
        Self {
            min: center - Vec2::splat(half_extent),
            max: center + Vec2::splat(half_extent),
        }
    }

    /// Closest point on (or in) the box to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Result of a circle vs box check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the box
    pub point: Vec2,
    /// Direction to push the circle out (unit length when hit)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    /// Translation that resolves the overlap
    pub fn push(&self) -> Vec2 {
        self.normal * self.penetration
    }
}

/// Check a circle against a box and compute the minimum translation out of it
pub fn circle_box_collision(center: Vec2, radius: f32, aabb: &Aabb2) -> CollisionResult {
    let closest = aabb.closest_point(center);
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Center inside the box: leave through the nearest face
    let faces = [
        (center.x - aabb.min.x, Vec2::NEG_X),
        (aabb.max.x - center.x, Vec2::X),
        (center.y - aabb.min.y, Vec2::NEG_Y),
        (aabb.max.y - center.y, Vec2::Y),
    ];
    let (depth, normal) = faces
        .into_iter()
        .fold((f32::INFINITY, Vec2::ZERO), |best, face| {
            if face.0 < best.0 { face } else { best }
        });
    CollisionResult {
        hit: true,
        point: center + normal * depth,
        normal,
        penetration: depth + radius,
    }
}

/// Static collision geometry for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionGeometry {
    /// Platform tiers, in any order
    pub tiers: Vec<Tier>,
    /// Pillar footprints
    pub pillars: Vec<Aabb2>,
    /// Half side length of the square arena
    pub half_extent: f32,
}

impl CollisionGeometry {
    /// Highest tier whose footprint contains `xz`
    pub fn supporting_tier(&self, xz: Vec2) -> Option<&Tier> {
        self.tiers
            .iter()
            .filter(|t| t.contains(xz))
            .fold(None, |best: Option<&Tier>, t| match best {
                Some(b) if b.top_y >= t.top_y => Some(b),
                _ => Some(t),
            })
    }

    /// Ground height under `xz`, falling back to the base floor
    pub fn ground_height(&self, xz: Vec2) -> f32 {
        self.supporting_tier(xz)
            .map_or(BASE_GROUND_Y, |t| t.top_y.max(BASE_GROUND_Y))
    }

    /// Clamp a circle center so the circle stays inside the arena
    pub fn clamp_to_bounds(&self, xz: Vec2, radius: f32) -> Vec2 {
        let limit = (self.half_extent - radius).max(0.0);
        xz.clamp(Vec2::splat(-limit), Vec2::splat(limit))
    }
}

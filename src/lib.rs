//! Arena Core - simulation core for a real-time arena boss fight
//!
//! Core modules:
//! - `sim`: Fixed-order simulation (units, combat, abilities, auras, physics)
//! - `arena`: Default encounter layout (platform tiers, pillars, horsemen)
//! - `tuning`: Data-driven game balance

pub mod arena;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::{Vec2, Vec3};

/// Engine constants that are not data-driven
pub mod consts {
    /// Largest frame delta the orchestrator will simulate in one tick (seconds)
    pub const MAX_FRAME_DT: f32 = 0.033;
    /// Number of ability slots on the action bar
    pub const ABILITY_SLOTS: usize = 3;
    /// Tolerance added to the step height so exact one-unit stairs stay walkable
    pub const STEP_EPSILON: f32 = 0.001;
    /// Base ground plane height used when no tier supports the player
    pub const BASE_GROUND_Y: f32 = 0.0;
    /// Events kept for a caller that has not drained them; older ones are dropped
    pub const MAX_QUEUED_EVENTS: usize = 1024;
}

/// Normalized angle to [-π, π); non-finite input maps to 0
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid rounds up to TAU for tiny negative remainders
    if wrapped >= PI { -PI } else { wrapped }
}

/// Project a world position onto the XZ ground plane
#[inline]
pub fn planar(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

/// Distance between two world positions ignoring height
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}

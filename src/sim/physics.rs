//! Player kinematics against static arena geometry
//!
//! One call to [`PhysicsResolver::step`] runs the whole pipeline in a fixed
//! order: integrate, ground resolution (step-up or wall), landing, jump,
//! pillar push-out, bounds clamp.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::{CollisionGeometry, circle_box_collision};
use crate::consts::STEP_EPSILON;
use crate::tuning::PhysicsTuning;
use crate::{normalize_angle, planar};

/// Movement intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveIntent {
    /// World-space XZ direction; longer than 1 is normalized
    pub direction: Vec2,
    /// Jump requested this tick
    pub jump: bool,
    /// Change in facing (radians)
    pub yaw_delta: f32,
    /// Move at boosted speed
    pub boost: bool,
}

/// The player's kinematic body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Center of the player sphere
    pub position: Vec3,
    pub vertical_velocity: f32,
    /// Facing (radians, [-π, π))
    pub yaw: f32,
    pub grounded: bool,
    /// Last XZ where the player stood on ground or was pushed clear of a pillar
    pub last_safe_xz: Vec2,
}

impl PlayerBody {
    pub fn spawn(position: Vec3) -> Self {
        Self {
            position,
            vertical_velocity: 0.0,
            yaw: 0.0,
            grounded: false,
            last_safe_xz: planar(position),
        }
    }

    fn xz(&self) -> Vec2 {
        planar(self.position)
    }

    fn set_xz(&mut self, xz: Vec2) {
        self.position.x = xz.x;
        self.position.z = xz.y;
    }
}

/// What the pipeline did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicsReport {
    /// Snapped up onto a walkable step
    pub stepped_up: bool,
    /// Horizontal motion was blocked by a rise too tall to step
    pub blocked: bool,
    /// Touched down this tick after being airborne
    pub landed: bool,
    pub jumped: bool,
    /// Number of pillars that pushed the player out
    pub pillar_contacts: u32,
}

/// Player movement and collision
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsResolver {
    radius: f32,
    move_speed: f32,
    boost_mult: f32,
    gravity: f32,
    jump_impulse: f32,
    step_height: f32,
}

impl PhysicsResolver {
    pub fn new(tuning: &PhysicsTuning) -> Self {
        Self {
            radius: tuning.player_radius,
            move_speed: tuning.move_speed,
            boost_mult: tuning.boost_mult,
            gravity: tuning.gravity,
            jump_impulse: tuning.jump_impulse,
            step_height: tuning.step_height,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Advance the body by `dt` seconds
    pub fn step(
        &self,
        body: &mut PlayerBody,
        intent: &MoveIntent,
        geometry: &CollisionGeometry,
        dt: f32,
    ) -> PhysicsReport {
        let mut report = PhysicsReport::default();
        if !(dt > 0.0) {
            return report;
        }

        let was_grounded = body.grounded;
        let start_xz = body.xz();
        let start_foot = body.position.y - self.radius;

        if intent.yaw_delta.is_finite() {
            body.yaw = normalize_angle(body.yaw + intent.yaw_delta);
        }

        // 1. Integrate
        let horizontal = self.horizontal_velocity(intent);
        body.vertical_velocity -= self.gravity * dt;
        body.position.x += horizontal.x * dt;
        body.position.z += horizontal.y * dt;
        body.position.y += body.vertical_velocity * dt;

        // 2. Ground resolution
        let mut ground = geometry.ground_height(body.xz());
        let rise = ground - start_foot;
        if rise > 0.0 {
            if rise <= self.step_height + STEP_EPSILON {
                body.position.y = ground + self.radius;
                report.stepped_up = true;
                log::trace!("Stepped up {rise:.2} onto {ground:.2}");
            } else {
                // Too tall to step: a wall. Mid-air, only this tick's motion is undone.
                let revert = if body.grounded {
                    body.last_safe_xz
                } else {
                    start_xz
                };
                body.set_xz(revert);
                ground = geometry.ground_height(revert);
                report.blocked = true;
                log::trace!("Blocked by {rise:.2} rise at {:?}", body.xz());
            }
        }

        // 3. Landing
        let floor = ground + self.radius;
        if body.position.y <= floor {
            body.position.y = floor;
            body.vertical_velocity = 0.0;
            body.grounded = true;
            body.last_safe_xz = body.xz();
            report.landed = !was_grounded;
        } else {
            body.grounded = false;
        }

        // 4. Jump
        if body.grounded && intent.jump {
            body.vertical_velocity = self.jump_impulse;
            body.grounded = false;
            report.jumped = true;
        }

        // 5. Pillars
        let mut xz = body.xz();
        for pillar in &geometry.pillars {
            let hit = circle_box_collision(xz, self.radius, pillar);
            if hit.hit {
                xz += hit.push();
                body.last_safe_xz = xz;
                report.pillar_contacts += 1;
            }
        }

        // 6. Bounds
        body.set_xz(geometry.clamp_to_bounds(xz, self.radius));

        report
    }

    fn horizontal_velocity(&self, intent: &MoveIntent) -> Vec2 {
        let dir = intent.direction;
        if !dir.is_finite() {
            return Vec2::ZERO;
        }
        let dir = if dir.length_squared() > 1.0 {
            dir.normalize()
        } else {
            dir
        };
        let speed = if intent.boost {
            self.move_speed * self.boost_mult
        } else {
            self.move_speed
        };
        dir * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{Aabb2, Tier};

    const DT: f32 = 0.1;

    fn resolver() -> PhysicsResolver {
        PhysicsResolver::new(&PhysicsTuning::default())
    }

    fn flat() -> CollisionGeometry {
        CollisionGeometry {
            tiers: Vec::new(),
            pillars: Vec::new(),
            half_extent: 100.0,
        }
    }

    /// A body resting on ground height `ground` at `xz`
    fn settled(physics: &PhysicsResolver, geometry: &CollisionGeometry, xz: Vec2) -> PlayerBody {
        let ground = geometry.ground_height(xz);
        let mut body = PlayerBody::spawn(Vec3::new(xz.x, ground + physics.radius(), xz.y));
        physics.step(&mut body, &MoveIntent::default(), geometry, DT);
        assert!(body.grounded);
        body
    }

    fn walk_x() -> MoveIntent {
        MoveIntent {
            direction: Vec2::X,
            ..Default::default()
        }
    }

    fn block(min_x: f32, max_x: f32, top_y: f32) -> Tier {
        Tier {
            min_x,
            max_x,
            min_z: -10.0,
            max_z: 10.0,
            top_y,
        }
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let physics = resolver();
        let geometry = flat();
        let mut body = PlayerBody::spawn(Vec3::new(0.0, 5.0, 0.0));

        let mut landed = false;
        for _ in 0..20 {
            landed |= physics.step(&mut body, &MoveIntent::default(), &geometry, DT).landed;
        }
        assert!(landed);
        assert!(body.grounded);
        assert_eq!(body.position.y, physics.radius());
        assert_eq!(body.vertical_velocity, 0.0);
    }

    #[test]
    fn test_step_up_in_one_tick() {
        let physics = resolver();
        let geometry = CollisionGeometry {
            tiers: vec![block(2.0, 10.0, 1.0)],
            ..flat()
        };
        let mut body = settled(&physics, &geometry, Vec2::new(1.0, 0.0));

        let report = physics.step(&mut body, &walk_x(), &geometry, DT);
        assert!(report.stepped_up);
        assert!(body.grounded);
        assert!((body.position.x - 2.5).abs() < 1e-5);
        assert_eq!(body.position.y, 1.0 + physics.radius());
    }

    #[test]
    fn test_tall_rise_blocks_and_reverts() {
        let physics = resolver();
        let geometry = CollisionGeometry {
            tiers: vec![block(2.0, 10.0, 1.5)],
            ..flat()
        };
        let mut body = settled(&physics, &geometry, Vec2::new(1.0, 0.0));

        let report = physics.step(&mut body, &walk_x(), &geometry, DT);
        assert!(report.blocked);
        assert_eq!(body.position.x, 1.0);
        assert_eq!(body.position.y, physics.radius());
        assert!(body.grounded);
    }

    #[test]
    fn test_overlapping_tiers_pick_highest() {
        let physics = resolver();
        let geometry = CollisionGeometry {
            tiers: vec![block(2.0, 10.0, 1.0), block(2.0, 10.0, 0.5)],
            ..flat()
        };
        let mut body = settled(&physics, &geometry, Vec2::new(1.0, 0.0));

        physics.step(&mut body, &walk_x(), &geometry, DT);
        assert_eq!(body.position.y, 1.0 + physics.radius());
    }

    #[test]
    fn test_climbs_stairs() {
        let physics = resolver();
        let geometry = CollisionGeometry {
            tiers: (0..5)
                .map(|i| Tier::centered(60.0 - i as f32 * 3.0, (i + 1) as f32))
                .collect(),
            ..flat()
        };
        let mut body = settled(&physics, &geometry, Vec2::new(-40.0, 0.0));

        for _ in 0..40 {
            physics.step(&mut body, &walk_x(), &geometry, DT);
        }
        // Walked onto the top tier
        assert!(body.position.x > -24.0);
        assert_eq!(body.position.y, 5.0 + physics.radius());
    }

    #[test]
    fn test_walks_off_ledge_and_falls() {
        let physics = resolver();
        let geometry = CollisionGeometry {
            tiers: vec![block(-10.0, 2.0, 3.0)],
            ..flat()
        };
        let mut body = settled(&physics, &geometry, Vec2::new(1.5, 0.0));
        assert_eq!(body.position.y, 3.0 + physics.radius());

        physics.step(&mut body, &walk_x(), &geometry, DT);
        assert!(!body.grounded);
        for _ in 0..10 {
            physics.step(&mut body, &MoveIntent::default(), &geometry, DT);
        }
        assert!(body.grounded);
        assert_eq!(body.position.y, physics.radius());
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let physics = resolver();
        let geometry = flat();
        let jump = MoveIntent {
            jump: true,
            ..Default::default()
        };

        let mut airborne = PlayerBody::spawn(Vec3::new(0.0, 10.0, 0.0));
        assert!(!physics.step(&mut airborne, &jump, &geometry, DT).jumped);

        let mut body = settled(&physics, &geometry, Vec2::ZERO);
        let report = physics.step(&mut body, &jump, &geometry, DT);
        assert!(report.jumped);
        assert!(!body.grounded);
        assert_eq!(body.vertical_velocity, 25.0);

        physics.step(&mut body, &MoveIntent::default(), &geometry, DT);
        assert!(body.position.y > physics.radius());
    }

    #[test]
    fn test_airborne_wall_undoes_tick_motion() {
        let physics = resolver();
        let geometry = CollisionGeometry {
            tiers: vec![block(2.0, 10.0, 5.0)],
            ..flat()
        };
        let mut body = PlayerBody::spawn(Vec3::new(1.0, 2.0, 0.0));
        body.last_safe_xz = Vec2::new(-20.0, 0.0);

        let report = physics.step(&mut body, &walk_x(), &geometry, DT);
        assert!(report.blocked);
        assert_eq!(body.position.x, 1.0);
    }

    #[test]
    fn test_pillar_pushes_out_and_records_safe_spot() {
        let physics = resolver();
        let geometry = CollisionGeometry {
            pillars: vec![Aabb2::from_center(Vec2::new(5.0, 0.0), 3.0)],
            ..flat()
        };
        let mut body = settled(&physics, &geometry, Vec2::new(0.0, 0.0));

        for _ in 0..5 {
            physics.step(&mut body, &walk_x(), &geometry, DT);
        }
        let edge = 2.0 - physics.radius();
        assert!((body.position.x - edge).abs() < 1e-4);
        assert!((body.last_safe_xz.x - edge).abs() < 1e-4);
    }

    #[test]
    fn test_bounds_clamp() {
        let physics = resolver();
        let geometry = CollisionGeometry {
            half_extent: 10.0,
            ..flat()
        };
        let mut body = settled(&physics, &geometry, Vec2::new(8.0, 0.0));
        for _ in 0..10 {
            physics.step(&mut body, &walk_x(), &geometry, DT);
        }
        assert_eq!(body.position.x, 10.0 - physics.radius());
    }

    #[test]
    fn test_boost_and_direction_normalization() {
        let physics = resolver();
        let geometry = flat();
        let mut body = settled(&physics, &geometry, Vec2::ZERO);

        let intent = MoveIntent {
            direction: Vec2::new(3.0, 0.0),
            boost: true,
            ..Default::default()
        };
        physics.step(&mut body, &intent, &geometry, DT);
        assert!((body.position.x - 15.0 * 1.6 * DT).abs() < 1e-4);
    }

    #[test]
    fn test_yaw_accumulates_and_wraps() {
        let physics = resolver();
        let geometry = flat();
        let mut body = settled(&physics, &geometry, Vec2::ZERO);
        let turn = MoveIntent {
            yaw_delta: 2.0,
            ..Default::default()
        };
        physics.step(&mut body, &turn, &geometry, DT);
        physics.step(&mut body, &turn, &geometry, DT);
        assert!((body.yaw - (4.0 - std::f32::consts::TAU)).abs() < 1e-5);
    }

    #[test]
    fn test_huge_yaw_delta_wraps() {
        use std::f32::consts::PI;
        let physics = resolver();
        let geometry = flat();
        let mut body = settled(&physics, &geometry, Vec2::ZERO);
        let spin = MoveIntent {
            yaw_delta: 2.0e8,
            ..Default::default()
        };
        physics.step(&mut body, &spin, &geometry, DT);
        assert!((-PI..PI).contains(&body.yaw));
    }
}

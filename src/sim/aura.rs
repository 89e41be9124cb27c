//! Stacking aura debuffs
//!
//! Each aura source periodically checks whether the player stands inside its
//! radius. Every check that finds the player adds one stack and refreshes the
//! decay timer; damage for the new stack level follows the source's curve.
//! Stacks never decay one at a time: when the timer runs out the aura drops
//! back to zero in one go.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::unit::{UnitId, UnitStore};
use crate::planar_distance;

/// Damage dealt when an aura reaches a given stack level
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DamageCurve {
    /// 10, 20, then doubling from 40 (40, 80, 160, ...)
    #[default]
    Doubling,
    /// `level * per_stack`
    Linear { per_stack: f32 },
}

impl DamageCurve {
    pub fn damage_for_level(&self, level: u32) -> f32 {
        match *self {
            DamageCurve::Doubling => match level {
                0 => 0.0,
                1 => 10.0,
                2 => 20.0,
                n => 40.0 * 2f32.powi((n - 3).min(i32::MAX as u32) as i32),
            },
            DamageCurve::Linear { per_stack } => level as f32 * per_stack,
        }
    }
}

/// A stationary hazard the player should keep away from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuraSource {
    /// Debuff key ("shadow", "plague", ...)
    pub id: String,
    pub position: Vec3,
    pub radius: f32,
    /// Display color (0xRRGGBB)
    pub color: u32,
    pub curve: DamageCurve,
    /// Unit that projects the aura, if any
    #[serde(default)]
    pub owner: Option<UnitId>,
}

impl AuraSource {
    pub fn contains(&self, point: Vec3) -> bool {
        planar_distance(self.position, point) <= self.radius
    }
}

/// Live debuff on the player for one aura
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebuffState {
    pub stacks: u32,
    /// Seconds until the stacks fall off
    pub remaining: f32,
    /// Absolute simulation time the stacks fall off
    pub expires_at: f32,
}

/// Debuff bar entry for one aura source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebuffSnapshot {
    pub id: String,
    pub color: u32,
    pub stack_count: u32,
    pub seconds_remaining: f32,
}

/// One stack applied during an interval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuraApplication {
    pub aura_id: String,
    pub stacks: u32,
    pub damage: f32,
}

/// What happened during one engine tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuraTickReport {
    /// Auras whose timer ran out this tick
    pub expired: Vec<String>,
    /// Stacks added this tick (empty unless the apply interval elapsed)
    pub applied: Vec<AuraApplication>,
    pub total_damage: f32,
    /// The player is at 0 hp; all debuffs were cleared
    pub player_died: bool,
}

/// Status effect engine
#[derive(Debug, Clone)]
pub struct StatusEffectEngine {
    apply_interval: f32,
    decay_duration: f32,
    accumulator: f32,
    debuffs: BTreeMap<String, DebuffState>,
}

impl StatusEffectEngine {
    pub fn new(apply_interval: f32, decay_duration: f32) -> Self {
        Self {
            apply_interval,
            decay_duration,
            accumulator: 0.0,
            debuffs: BTreeMap::new(),
        }
    }

    pub fn debuff(&self, aura_id: &str) -> Option<&DebuffState> {
        self.debuffs.get(aura_id)
    }

    pub fn stacks(&self, aura_id: &str) -> u32 {
        self.debuffs.get(aura_id).map_or(0, |d| d.stacks)
    }

    pub fn active_count(&self) -> usize {
        self.debuffs.len()
    }

    /// Advance timers and, once per apply interval, stack auras the player is
    /// standing in.
    ///
    /// `now` is the simulation time at the end of this tick.
    pub fn tick(
        &mut self,
        dt: f32,
        now: f32,
        sources: &[AuraSource],
        player_pos: Vec3,
        units: &mut UnitStore,
        player: UnitId,
    ) -> AuraTickReport {
        let mut report = AuraTickReport::default();
        if !(dt > 0.0) {
            return report;
        }

        self.accumulator += dt;

        for (id, debuff) in self.debuffs.iter_mut() {
            debuff.remaining -= dt;
            if debuff.remaining <= 0.0 {
                debuff.stacks = 0;
                report.expired.push(id.clone());
            }
        }
        if !report.expired.is_empty() {
            self.debuffs.retain(|_, d| d.stacks > 0);
            log::debug!("Auras expired: {:?}", report.expired);
        }

        if self.accumulator >= self.apply_interval {
            self.accumulator = 0.0;

            for source in sources.iter().filter(|s| s.contains(player_pos)) {
                let debuff = self
                    .debuffs
                    .entry(source.id.clone())
                    .or_insert(DebuffState {
                        stacks: 0,
                        remaining: 0.0,
                        expires_at: now,
                    });
                debuff.stacks += 1;
                debuff.remaining = self.decay_duration;
                debuff.expires_at = now + self.decay_duration;

                let damage = source.curve.damage_for_level(debuff.stacks);
                report.total_damage += damage;
                log::debug!(
                    "Aura {} stacks={} damage={}",
                    source.id,
                    debuff.stacks,
                    damage
                );
                report.applied.push(AuraApplication {
                    aura_id: source.id.clone(),
                    stacks: debuff.stacks,
                    damage,
                });
            }

            if report.total_damage > 0.0 {
                if let Some(unit) = units.get_mut(player) {
                    unit.take_damage(report.total_damage);
                }
            }
        }

        if units.get(player).is_some_and(|u| u.hp() <= 0.0) {
            self.clear();
            report.player_died = true;
        }

        report
    }

    /// Debuff bar contents, one entry per source in source order
    pub fn snapshot(&self, sources: &[AuraSource]) -> Vec<DebuffSnapshot> {
        sources
            .iter()
            .map(|source| {
                let (stack_count, seconds_remaining) = self
                    .debuffs
                    .get(&source.id)
                    .map_or((0, 0.0), |d| (d.stacks, d.remaining.max(0.0)));
                DebuffSnapshot {
                    id: source.id.clone(),
                    color: source.color,
                    stack_count,
                    seconds_remaining,
                }
            })
            .collect()
    }

    /// Drop every debuff immediately
    pub fn clear(&mut self) {
        self.debuffs.clear();
    }

    /// Clear all aura state and restore the player to full health
    pub fn reset(&mut self, units: &mut UnitStore, player: UnitId) {
        self.debuffs.clear();
        self.accumulator = 0.0;
        if let Some(unit) = units.get_mut(player) {
            unit.restore_full();
        }
    }
}

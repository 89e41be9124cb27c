//! Combat resolution: the single path by which damage, healing and power
//! spending reach units, plus passive power regeneration.

use std::collections::BTreeMap;

use super::unit::{UnitId, UnitStore};

/// Routes stat changes onto units and runs passive power regen
#[derive(Debug, Clone)]
pub struct CombatResolver {
    /// Power points regenerated per second
    regen_rate: f32,
    /// Fractional regen carried between ticks, per unit
    regen_accum: BTreeMap<UnitId, f32>,
}

impl CombatResolver {
    pub fn new(regen_rate: f32) -> Self {
        Self {
            regen_rate: regen_rate.max(0.0),
            regen_accum: BTreeMap::new(),
        }
    }

    /// Unknown ids are ignored
    pub fn deal_damage(&self, units: &mut UnitStore, target: UnitId, amount: f32) {
        if let Some(unit) = units.get_mut(target) {
            unit.take_damage(amount);
        }
    }

    pub fn heal(&self, units: &mut UnitStore, target: UnitId, amount: f32) {
        if let Some(unit) = units.get_mut(target) {
            unit.heal(amount);
        }
    }

    /// Returns whether the power was spent. Callers must check this before
    /// committing an effect.
    pub fn spend_power(&self, units: &mut UnitStore, unit: UnitId, amount: f32) -> bool {
        units
            .get_mut(unit)
            .is_some_and(|unit| unit.spend_power(amount))
    }

    /// Accumulate `dt * regen_rate` for `unit` and commit whole points
    pub fn regen_tick(&mut self, units: &mut UnitStore, unit: UnitId, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        let Some(target) = units.get_mut(unit) else {
            return;
        };

        let accum = self.regen_accum.entry(unit).or_insert(0.0);
        *accum += dt * self.regen_rate;

        let whole = accum.floor();
        if whole >= 1.0 {
            target.regen_power(whole);
            *accum -= whole;
        }
    }

    /// Fractional regen pending for `unit`
    pub fn pending_regen(&self, unit: UnitId) -> f32 {
        self.regen_accum.get(&unit).copied().unwrap_or(0.0)
    }

    pub fn reset(&mut self) {
        self.regen_accum.clear();
    }
}

//! Ability slots, cooldowns and cast resolution
//!
//! A cast is evaluated atomically within one tick: slot cooldown, then target
//! validity, then power cost, then the effect. Any rejection leaves every unit
//! and cooldown untouched.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::combat::CombatResolver;
use super::target::TargetSelector;
use super::unit::{UnitId, UnitStore};
use crate::consts::ABILITY_SLOTS;
use crate::planar_distance;

/// What an ability does when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Damage the current target
    Damage { amount: f32 },
    /// Heal the caster
    Heal { amount: f32 },
}

impl AbilityEffect {
    pub fn requires_target(&self) -> bool {
        matches!(self, AbilityEffect::Damage { .. })
    }
}

/// Static ability definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: String,
    pub name: String,
    /// Seconds before the slot can be used again
    pub cooldown: f32,
    pub power_cost: f32,
    /// Maximum planar distance to the target (ignored for self effects)
    pub range: f32,
    pub effect: AbilityEffect,
}

impl AbilityDef {
    /// Short range strike, free
    pub fn melee() -> Self {
        Self {
            id: "MELEE".to_string(),
            name: "Melee Strike".to_string(),
            cooldown: 1.0,
            power_cost: 0.0,
            range: 6.0,
            effect: AbilityEffect::Damage { amount: 15.0 },
        }
    }

    /// Ranged nuke, costs power
    pub fn ranged() -> Self {
        Self {
            id: "CAST".to_string(),
            name: "Ranged Attack".to_string(),
            cooldown: 3.0,
            power_cost: 20.0,
            range: 40.0,
            effect: AbilityEffect::Damage { amount: 30.0 },
        }
    }

    /// Self heal, costs power
    pub fn heal() -> Self {
        Self {
            id: "HEAL".to_string(),
            name: "Heal".to_string(),
            cooldown: 5.0,
            power_cost: 30.0,
            range: 0.0,
            effect: AbilityEffect::Heal { amount: 25.0 },
        }
    }
}

/// Melee / ranged / heal, in slot order
pub fn default_loadout() -> [Option<AbilityDef>; ABILITY_SLOTS] {
    [
        Some(AbilityDef::melee()),
        Some(AbilityDef::ranged()),
        Some(AbilityDef::heal()),
    ]
}

/// Why a cast was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CastError {
    #[error("no ability in slot {slot}")]
    EmptySlot { slot: usize },
    #[error("ability on cooldown: {remaining:.1}s remaining")]
    OnCooldown { remaining: f32 },
    #[error("no target selected")]
    NoTarget,
    #[error("target is dead")]
    TargetDead,
    #[error("target out of range: distance {distance:.1}, range {range}")]
    OutOfRange { distance: f32, range: f32 },
    #[error("not enough power: need {cost}, have {available}")]
    InsufficientPower { cost: f32, available: f32 },
}

/// A successful cast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastSuccess {
    pub slot: usize,
    pub ability_id: String,
    /// Unit the effect landed on
    pub target: UnitId,
    pub effect: AbilityEffect,
}

pub type CastResult = Result<CastSuccess, CastError>;

/// Plain `{ok, reason}` view of a cast result for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastOutcome {
    pub ok: bool,
    pub reason: Option<String>,
}

impl From<&CastResult> for CastOutcome {
    fn from(result: &CastResult) -> Self {
        match result {
            Ok(_) => Self {
                ok: true,
                reason: None,
            },
            Err(e) => Self {
                ok: false,
                reason: Some(e.to_string()),
            },
        }
    }
}

/// Everything a cast reads or writes outside the ability system
pub struct CastContext<'a> {
    pub units: &'a mut UnitStore,
    pub combat: &'a CombatResolver,
    pub targets: &'a TargetSelector,
    /// World positions of targetable units
    pub positions: &'a BTreeMap<UnitId, Vec3>,
    pub caster: UnitId,
    /// Caster position after this tick's collision resolution
    pub caster_pos: Vec3,
}

/// Runtime state of one action bar slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilitySlot {
    pub ability: Option<AbilityDef>,
    /// Seconds until the slot is usable (never negative)
    pub cooldown_remaining: f32,
}

/// Snapshot for ability bar rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityBarState {
    pub loadout: [Option<AbilityDef>; ABILITY_SLOTS],
    pub cooldowns: [f32; ABILITY_SLOTS],
}

/// Three-slot action bar
#[derive(Debug, Clone)]
pub struct AbilitySystem {
    slots: [AbilitySlot; ABILITY_SLOTS],
}

impl AbilitySystem {
    pub fn new(loadout: [Option<AbilityDef>; ABILITY_SLOTS]) -> Self {
        Self {
            slots: loadout.map(|ability| AbilitySlot {
                ability,
                cooldown_remaining: 0.0,
            }),
        }
    }

    pub fn slot(&self, index: usize) -> Option<&AbilitySlot> {
        self.slots.get(index)
    }

    /// Count down every slot's cooldown, flooring at zero
    pub fn tick_cooldowns(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        for slot in &mut self.slots {
            if slot.cooldown_remaining > 0.0 {
                slot.cooldown_remaining = (slot.cooldown_remaining - dt).max(0.0);
            }
        }
    }

    /// Attempt to cast the ability in `slot`
    pub fn try_cast(&mut self, slot: usize, ctx: &mut CastContext<'_>) -> CastResult {
        let Some(entry) = self.slots.get(slot) else {
            return Err(CastError::EmptySlot { slot });
        };
        let Some(ability) = entry.ability.as_ref() else {
            return Err(CastError::EmptySlot { slot });
        };
        if entry.cooldown_remaining > 0.0 {
            return Err(CastError::OnCooldown {
                remaining: entry.cooldown_remaining,
            });
        }

        let target = if ability.effect.requires_target() {
            resolve_target(ability, ctx)?
        } else {
            ctx.caster
        };

        if ability.power_cost > 0.0 && !ctx.combat.spend_power(ctx.units, ctx.caster, ability.power_cost)
        {
            let available = ctx.units.get(ctx.caster).map_or(0.0, |u| u.power());
            return Err(CastError::InsufficientPower {
                cost: ability.power_cost,
                available,
            });
        }

        match ability.effect {
            AbilityEffect::Damage { amount } => ctx.combat.deal_damage(ctx.units, target, amount),
            AbilityEffect::Heal { amount } => ctx.combat.heal(ctx.units, target, amount),
        }

        let success = CastSuccess {
            slot,
            ability_id: ability.id.clone(),
            target,
            effect: ability.effect,
        };
        let cooldown = ability.cooldown.max(0.0);
        self.slots[slot].cooldown_remaining = cooldown;
        Ok(success)
    }

    pub fn runtime_state(&self) -> AbilityBarState {
        AbilityBarState {
            loadout: self.slots.clone().map(|s| s.ability),
            cooldowns: self.slots.each_ref().map(|s| s.cooldown_remaining),
        }
    }

    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.cooldown_remaining = 0.0;
        }
    }
}

impl Default for AbilitySystem {
    fn default() -> Self {
        Self::new(default_loadout())
    }
}

/// Validate the selected target against the ability, fresh on every cast
fn resolve_target(ability: &AbilityDef, ctx: &CastContext<'_>) -> Result<UnitId, CastError> {
    let id = ctx.targets.current().ok_or(CastError::NoTarget)?;
    let unit = ctx.units.get(id).ok_or(CastError::NoTarget)?;
    if unit.hp() <= 0.0 {
        return Err(CastError::TargetDead);
    }
    let pos = ctx.positions.get(&id).ok_or(CastError::NoTarget)?;
    let distance = planar_distance(ctx.caster_pos, *pos);
    if distance > ability.range {
        return Err(CastError::OutOfRange {
            distance,
            range: ability.range,
        });
    }
    Ok(id)
}

//! Frame-driven simulation tick
//!
//! Advances the session in a fixed order: physics, status effects, regen,
//! abilities. Ability range checks see the post-collision position and any
//! aura damage dealt earlier in the same tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ability::{CastContext, CastOutcome};
use super::physics::{MoveIntent, PlayerBody};
use super::state::{ArenaState, GamePhase, SimEvent};
use crate::consts::{ABILITY_SLOTS, MAX_FRAME_DT};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub movement: MoveIntent,
    /// Cast requests, one per action bar slot
    pub cast: [bool; ABILITY_SLOTS],
}

impl TickInput {
    pub fn moving(direction: Vec2) -> Self {
        Self {
            movement: MoveIntent {
                direction,
                ..MoveIntent::default()
            },
            ..Self::default()
        }
    }

    pub fn with_cast(mut self, slot: usize) -> Self {
        if let Some(flag) = self.cast.get_mut(slot) {
            *flag = true;
        }
        self
    }

    pub fn with_jump(mut self) -> Self {
        self.movement.jump = true;
        self
    }
}

/// Advance the session by one frame
pub fn tick(state: &mut ArenaState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    if !(dt > 0.0) {
        return;
    }
    let dt = dt.min(MAX_FRAME_DT);

    state.time_ticks += 1;
    state.elapsed += dt;

    // Physics
    let report = state
        .physics
        .step(&mut state.body, &input.movement, &state.geometry, dt);
    if report.blocked {
        log::trace!("Player blocked at {:?}", state.body.position);
    }
    if report.stepped_up {
        log::trace!("Player stepped up to y={:.2}", state.body.position.y);
    }

    // Status effects
    let auras = state.status.tick(
        dt,
        state.elapsed,
        &state.auras,
        state.body.position,
        &mut state.units,
        state.player,
    );
    for aura_id in auras.expired {
        state.push_event(SimEvent::AuraExpired { aura_id });
    }
    for applied in auras.applied {
        state.push_event(SimEvent::AuraStacked {
            aura_id: applied.aura_id,
            stacks: applied.stacks,
            damage: applied.damage,
        });
    }
    if auras.player_died {
        state.phase = GamePhase::GameOver;
        log::info!("Player died after {:.1}s", state.elapsed);
        state.push_event(SimEvent::GameOver {
            elapsed: state.elapsed,
        });
        return;
    }

    // Passive regen
    state.combat.regen_tick(&mut state.units, state.player, dt);

    // Abilities
    state.abilities.tick_cooldowns(dt);
    for slot in 0..ABILITY_SLOTS {
        if !input.cast[slot] {
            continue;
        }
        let mut ctx = CastContext {
            units: &mut state.units,
            combat: &state.combat,
            targets: &state.target,
            positions: &state.positions,
            caster: state.player,
            caster_pos: state.body.position,
        };
        let result = state.abilities.try_cast(slot, &mut ctx);
        if let Err(e) = &result {
            log::debug!("Cast in slot {} rejected: {}", slot, e);
        }
        let ability_id = state
            .abilities
            .slot(slot)
            .and_then(|s| s.ability.as_ref())
            .map(|a| a.id.clone());
        state.push_event(SimEvent::AbilityCast {
            slot,
            ability_id,
            outcome: CastOutcome::from(&result),
        });
    }
}

/// Restart the encounter from the spawn point with full resources
pub fn reset(state: &mut ArenaState) {
    state.status.reset(&mut state.units, state.player);
    for boss in &state.bosses {
        if let Some(unit) = state.units.get_mut(*boss) {
            unit.restore_full();
        }
    }
    state.combat.reset();
    state.abilities.reset();
    state.target.clear();
    state.body = PlayerBody::spawn(state.spawn_point());
    state.elapsed = 0.0;
    state.time_ticks = 0;
    state.phase = GamePhase::Playing;
    state.drain_events();
    state.push_event(SimEvent::Reset);
    log::info!("Session reset");
}

//! Session state and core simulation types
//!
//! `ArenaState` is the explicit simulation context: geometry, the unit store,
//! the player body and every system that acts on them. It is threaded through
//! each tick; nothing lives in globals.

use std::collections::{BTreeMap, VecDeque};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ability::{AbilityBarState, AbilitySystem, CastOutcome};
use super::aura::{AuraSource, DebuffSnapshot, StatusEffectEngine};
use super::collision::CollisionGeometry;
use super::combat::CombatResolver;
use super::physics::{PhysicsResolver, PlayerBody};
use super::target::TargetSelector;
use super::unit::{Unit, UnitId, UnitStore, UnitTemplate};
use crate::consts::MAX_QUEUED_EVENTS;
use crate::planar;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player alive, all systems ticking
    Playing,
    /// Player died; nothing player-related ticks until reset
    GameOver,
}

/// Notable things that happened during a tick, drained by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    AbilityCast {
        slot: usize,
        ability_id: Option<String>,
        outcome: CastOutcome,
    },
    AuraStacked {
        aura_id: String,
        stacks: u32,
        damage: f32,
    },
    AuraExpired {
        aura_id: String,
    },
    GameOver {
        elapsed: f32,
    },
    Reset,
}

/// The whole simulation context
#[derive(Debug)]
pub struct ArenaState {
    /// Static collision geometry
    pub geometry: CollisionGeometry,
    pub units: UnitStore,
    /// The player's unit
    pub player: UnitId,
    /// Boss units, in spawn order
    pub bosses: Vec<UnitId>,
    /// World positions of targetable units
    pub positions: BTreeMap<UnitId, Vec3>,
    /// Aura sources, in debuff bar order
    pub auras: Vec<AuraSource>,
    pub body: PlayerBody,
    pub physics: PhysicsResolver,
    pub status: StatusEffectEngine,
    pub combat: CombatResolver,
    pub abilities: AbilitySystem,
    pub target: TargetSelector,
    /// Simulated seconds since the session started or was reset
    pub elapsed: f32,
    /// Tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    spawn: Vec3,
    events: VecDeque<SimEvent>,
}

impl ArenaState {
    /// Create a session with a full-health player at the tuning's spawn point
    pub fn new(tuning: &Tuning, geometry: CollisionGeometry) -> Self {
        let mut units = UnitStore::new();
        let player = units.spawn(
            UnitTemplate::named("Player")
                .with_hp(tuning.combat.player_max_hp)
                .with_power(tuning.combat.player_max_power)
                .with_tag("player"),
        );
        let spawn = Vec3::from_array(tuning.physics.spawn);

        Self {
            geometry,
            units,
            player,
            bosses: Vec::new(),
            positions: BTreeMap::new(),
            auras: Vec::new(),
            body: PlayerBody::spawn(spawn),
            physics: PhysicsResolver::new(&tuning.physics),
            status: StatusEffectEngine::new(tuning.aura.apply_interval, tuning.aura.decay_duration),
            combat: CombatResolver::new(tuning.combat.power_regen_per_sec),
            abilities: AbilitySystem::default(),
            target: TargetSelector::new(),
            elapsed: 0.0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            spawn,
            events: VecDeque::new(),
        }
    }

    /// Place a stationary boss unit
    pub fn add_boss(&mut self, template: UnitTemplate, position: Vec3) -> UnitId {
        let id = self.units.spawn(template.with_tag("boss"));
        self.bosses.push(id);
        self.positions.insert(id, position);
        id
    }

    pub fn add_aura(&mut self, source: AuraSource) {
        self.auras.push(source);
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    /// Mutable access for subscribing to a unit's notifications
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id)
    }

    pub fn player_unit(&self) -> Option<&Unit> {
        self.units.get(self.player)
    }

    pub fn player_position(&self) -> Vec3 {
        self.body.position
    }

    pub fn player_yaw(&self) -> f32 {
        self.body.yaw
    }

    pub fn player_grounded(&self) -> bool {
        self.body.grounded
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Move the player body (teleports, tests); velocity is cleared
    pub fn place_player(&mut self, position: Vec3) {
        self.body = PlayerBody {
            yaw: self.body.yaw,
            ..PlayerBody::spawn(position)
        };
    }

    pub fn set_target(&mut self, target: UnitId) {
        self.target.set(target);
    }

    pub fn clear_target(&mut self) {
        self.target.clear();
    }

    pub fn debuff_snapshot(&self) -> Vec<DebuffSnapshot> {
        self.status.snapshot(&self.auras)
    }

    pub fn ability_bar(&self) -> AbilityBarState {
        self.abilities.runtime_state()
    }

    /// Boss closest to `point` on the ground plane
    pub fn nearest_boss(&self, point: Vec3) -> Option<UnitId> {
        let from = planar(point);
        self.bosses
            .iter()
            .filter_map(|id| self.positions.get(id).map(|p| (*id, planar(*p))))
            .min_by(|a, b| from.distance(a.1).total_cmp(&from.distance(b.1)))
            .map(|(id, _)| id)
    }

    pub(crate) fn spawn_point(&self) -> Vec3 {
        self.spawn
    }

    /// Queue an event, dropping the oldest once the queue is full
    pub(crate) fn push_event(&mut self, event: SimEvent) {
        if self.events.len() >= MAX_QUEUED_EVENTS {
            if let Some(dropped) = self.events.pop_front() {
                log::trace!("Event queue full, dropped {:?}", dropped);
            }
        }
        self.events.push_back(event);
    }

    pub fn queued_events(&self) -> usize {
        self.events.len()
    }

    /// Take every event queued since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain(..).collect()
    }
}

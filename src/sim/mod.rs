//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit session context, no globals
//! - Fixed intra-tick order
//! - Stable iteration order (by unit ID / source order)
//! - No rendering or platform dependencies

pub mod ability;
pub mod aura;
pub mod collision;
pub mod combat;
pub mod physics;
pub mod state;
pub mod target;
pub mod tick;
pub mod unit;

pub use ability::{
    AbilityBarState, AbilityDef, AbilityEffect, AbilitySystem, CastContext, CastError,
    CastOutcome, CastResult, CastSuccess, default_loadout,
};
pub use aura::{AuraSource, DamageCurve, DebuffSnapshot, StatusEffectEngine};
pub use collision::{Aabb2, CollisionGeometry, CollisionResult, Tier, circle_box_collision};
pub use combat::CombatResolver;
pub use physics::{MoveIntent, PhysicsResolver, PlayerBody};
pub use state::{ArenaState, GamePhase, SimEvent};
pub use target::TargetSelector;
pub use tick::{TickInput, reset, tick};
pub use unit::{Unit, UnitId, UnitStats, UnitStore, UnitTemplate};

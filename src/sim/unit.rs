//! Combat units and the store that owns them
//!
//! A unit's hp and power can only change through its stat methods, which clamp
//! every result into range and notify subscribers. Callers never write stats
//! directly.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle to a unit in a [`UnitStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit_{}", self.0)
    }
}

/// Value snapshot of a unit's stats, handed to subscribers and renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub id: UnitId,
    pub hp: f32,
    pub max_hp: f32,
    pub power: f32,
    pub max_power: f32,
    pub dead: bool,
}

/// Subscriber callback for stat and death notifications
pub type UnitListener = Box<dyn FnMut(&UnitStats)>;

/// Construction parameters for a unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTemplate {
    pub name: String,
    pub max_hp: f32,
    /// Starting hp (defaults to `max_hp`)
    pub hp: Option<f32>,
    pub max_power: f32,
    /// Starting power (defaults to `max_power`)
    pub power: Option<f32>,
    pub tags: Vec<String>,
}

impl Default for UnitTemplate {
    fn default() -> Self {
        Self {
            name: "Unit".to_string(),
            max_hp: 100.0,
            hp: None,
            max_power: 100.0,
            power: None,
            tags: Vec::new(),
        }
    }
}

impl UnitTemplate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_hp(mut self, max_hp: f32) -> Self {
        self.max_hp = max_hp;
        self
    }

    pub fn with_power(mut self, max_power: f32) -> Self {
        self.max_power = max_power;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// A combat stat entity
pub struct Unit {
    id: UnitId,
    name: String,
    max_hp: f32,
    hp: f32,
    max_power: f32,
    power: f32,
    tags: BTreeSet<String>,
    dead: bool,
    stats_changed: Vec<UnitListener>,
    died: Vec<UnitListener>,
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("hp", &self.hp)
            .field("max_hp", &self.max_hp)
            .field("power", &self.power)
            .field("max_power", &self.max_power)
            .field("tags", &self.tags)
            .field("dead", &self.dead)
            .finish_non_exhaustive()
    }
}

/// Positive, finite amounts are the only ones that mutate
#[inline]
fn effective(amount: f32) -> Option<f32> {
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

#[inline]
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

impl Unit {
    fn new(id: UnitId, template: UnitTemplate) -> Self {
        let max_hp = finite_or(template.max_hp, 0.0).max(0.0);
        let max_power = finite_or(template.max_power, 0.0).max(0.0);
        let hp = template
            .hp
            .map_or(max_hp, |hp| finite_or(hp, max_hp))
            .clamp(0.0, max_hp);
        let power = template
            .power
            .map_or(max_power, |power| finite_or(power, max_power))
            .clamp(0.0, max_power);
        Self {
            id,
            name: template.name,
            max_hp,
            hp,
            max_power,
            power,
            tags: template.tags.into_iter().collect(),
            dead: false,
            stats_changed: Vec::new(),
            died: Vec::new(),
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hp(&self) -> f32 {
        self.hp
    }

    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn max_power(&self) -> f32 {
        self.max_power
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn stats(&self) -> UnitStats {
        UnitStats {
            id: self.id,
            hp: self.hp,
            max_hp: self.max_hp,
            power: self.power,
            max_power: self.max_power,
            dead: self.dead,
        }
    }

    /// Subscribe to hp/power changes
    pub fn on_stats_changed(&mut self, callback: impl FnMut(&UnitStats) + 'static) {
        self.stats_changed.push(Box::new(callback));
    }

    /// Subscribe to the unit's death (fires at most once per life)
    pub fn on_died(&mut self, callback: impl FnMut(&UnitStats) + 'static) {
        self.died.push(Box::new(callback));
    }

    fn emit_stats_changed(&mut self) {
        let stats = self.stats();
        for listener in &mut self.stats_changed {
            listener(&stats);
        }
    }

    fn emit_died(&mut self) {
        let stats = self.stats();
        for listener in &mut self.died {
            listener(&stats);
        }
    }

    pub fn take_damage(&mut self, amount: f32) {
        let Some(amount) = effective(amount) else {
            return;
        };
        self.hp = (self.hp - amount).max(0.0);
        self.emit_stats_changed();

        if !self.dead && self.hp <= 0.0 {
            self.dead = true;
            self.emit_died();
        }
    }

    pub fn heal(&mut self, amount: f32) {
        let Some(amount) = effective(amount) else {
            return;
        };
        self.hp = (self.hp + amount).min(self.max_hp);
        self.emit_stats_changed();
    }

    /// Returns false (without mutating) when the unit cannot afford `amount`
    pub fn spend_power(&mut self, amount: f32) -> bool {
        let Some(amount) = effective(amount) else {
            return true;
        };
        if self.power < amount {
            return false;
        }
        self.power = (self.power - amount).max(0.0);
        self.emit_stats_changed();
        true
    }

    pub fn regen_power(&mut self, amount: f32) {
        let Some(amount) = effective(amount) else {
            return;
        };
        self.power = (self.power + amount).min(self.max_power);
        self.emit_stats_changed();
    }

    /// Session reset: full hp and power, alive again. Subscribers are kept.
    pub fn restore_full(&mut self) {
        self.hp = self.max_hp;
        self.power = self.max_power;
        self.dead = false;
        self.emit_stats_changed();
    }
}

/// Owns every unit in the session, indexed by [`UnitId`]
#[derive(Debug, Default)]
pub struct UnitStore {
    units: BTreeMap<UnitId, Unit>,
    next_id: u32,
}

impl UnitStore {
    pub fn new() -> Self {
        Self {
            units: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create a unit and return its id
    pub fn spawn(&mut self, template: UnitTemplate) -> UnitId {
        // Default-constructed stores start at 0; keep ids non-zero either way
        let id = UnitId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.units.insert(id, Unit::new(id, template));
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

}

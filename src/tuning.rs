//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so encounters can be
//! retuned from JSON without a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Player kinematics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Player sphere radius
    pub player_radius: f32,
    /// Horizontal speed in units/s
    pub move_speed: f32,
    /// Speed multiplier while boosting
    pub boost_mult: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Initial vertical velocity of a jump
    pub jump_impulse: f32,
    /// Tallest rise the player can walk onto without jumping
    pub step_height: f32,
    /// Player spawn point (center of the sphere)
    pub spawn: [f32; 3],
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            player_radius: 1.2,
            move_speed: 15.0,
            boost_mult: 1.6,
            gravity: 60.0,
            jump_impulse: 25.0,
            step_height: 1.0,
            spawn: [0.0, 5.0, 45.0],
        }
    }
}

/// Status-effect engine timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraTuning {
    /// Seconds between aura proximity checks
    pub apply_interval: f32,
    /// Seconds an aura's stacks survive without being refreshed
    pub decay_duration: f32,
}

impl Default for AuraTuning {
    fn default() -> Self {
        Self {
            apply_interval: 10.0,
            decay_duration: 30.0,
        }
    }
}

/// Unit stats and resource economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub player_max_hp: f32,
    pub player_max_power: f32,
    /// Passive power regeneration (points/s)
    pub power_regen_per_sec: f32,
    pub boss_max_hp: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            player_max_hp: 100.0,
            player_max_power: 100.0,
            power_regen_per_sec: 5.0,
            boss_max_hp: 1000.0,
        }
    }
}

/// Dimensions used by the default arena builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    /// Full side length of the square board
    pub board_size: f32,
    pub wall_thickness: f32,
    /// Side length of the bottom platform tier
    pub platform_size: f32,
    pub tier_count: u32,
    /// Footprint shrink per tier (side length)
    pub tier_size_step: f32,
    /// Height of each tier
    pub tier_height: f32,
    /// Side length of the square corner pillars
    pub pillar_size: f32,
    /// Distance the horsemen keep from the walls
    pub horseman_margin: f32,
    /// Aura detection radius around each horseman
    pub aura_radius: f32,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            board_size: 200.0,
            wall_thickness: 1.0,
            platform_size: 60.0,
            tier_count: 5,
            tier_size_step: 3.0,
            tier_height: 1.0,
            pillar_size: 6.1,
            horseman_margin: 15.0,
            aura_radius: 75.0,
        }
    }
}

impl ArenaLayout {
    /// Half-extent of the walkable square (inner face of the walls)
    pub fn half_extent(&self) -> f32 {
        self.board_size / 2.0 - self.wall_thickness / 2.0
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub aura: AuraTuning,
    pub combat: CombatTuning,
    pub arena: ArenaLayout,
}

impl Tuning {
    /// Parse tuning overrides from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let contents = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&contents)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }

        positive("physics.player_radius", self.physics.player_radius)?;
        positive("physics.move_speed", self.physics.move_speed)?;
        positive("physics.gravity", self.physics.gravity)?;
        positive("physics.step_height", self.physics.step_height)?;
        positive("aura.apply_interval", self.aura.apply_interval)?;
        positive("aura.decay_duration", self.aura.decay_duration)?;
        positive("combat.player_max_hp", self.combat.player_max_hp)?;
        positive("combat.player_max_power", self.combat.player_max_power)?;
        positive("combat.boss_max_hp", self.combat.boss_max_hp)?;
        positive("arena.board_size", self.arena.board_size)?;

        if self.arena.half_extent() <= self.physics.player_radius {
            return Err(TuningError::Invalid {
                field: "arena.board_size",
                reason: "arena is smaller than the player".to_string(),
            });
        }
        if self.combat.power_regen_per_sec < 0.0 {
            return Err(TuningError::Invalid {
                field: "combat.power_regen_per_sec",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

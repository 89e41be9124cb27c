//! Default encounter: stepped central platform, corner pillars and the four
//! horsemen with their auras.

use glam::{Vec2, Vec3};

use crate::sim::{Aabb2, ArenaState, AuraSource, CollisionGeometry, DamageCurve, Tier, UnitTemplate};
use crate::tuning::{ArenaLayout, Tuning};

/// Pillars sit this far outside the bottom tier's corner
const PILLAR_OUTSET: f32 = 0.1;

/// One horseman: name, aura id, debuff color, and which corner (sign of x, z)
struct Horseman {
    name: &'static str,
    aura_id: &'static str,
    color: u32,
    corner: (f32, f32),
}

const HORSEMEN: [Horseman; 4] = [
    Horseman {
        name: "Sir Zeliek",
        aura_id: "shadow",
        color: 0xb8a0ff,
        corner: (1.0, 1.0),
    },
    Horseman {
        name: "Thane Korth'azz",
        aura_id: "plague",
        color: 0xa0ff4a,
        corner: (1.0, -1.0),
    },
    Horseman {
        name: "Lady Blaumeux",
        aura_id: "frost",
        color: 0xbfd7ff,
        corner: (-1.0, 1.0),
    },
    Horseman {
        name: "Highlord Mograine",
        aura_id: "blood",
        color: 0xffa8dc,
        corner: (-1.0, -1.0),
    },
];

/// Stepped platform tiers, bottom first
pub fn platform_tiers(layout: &ArenaLayout) -> Vec<Tier> {
    (0..layout.tier_count)
        .map(|i| {
            let size = layout.platform_size - i as f32 * layout.tier_size_step;
            Tier::centered(size, (i + 1) as f32 * layout.tier_height)
        })
        .filter(|tier| tier.max_x > 0.0)
        .collect()
}

/// Square pillars just outside the four corners of the bottom tier
pub fn corner_pillars(layout: &ArenaLayout) -> Vec<Aabb2> {
    let half = layout.pillar_size / 2.0;
    let offset = layout.platform_size / 2.0 - half + PILLAR_OUTSET;
    [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)]
        .into_iter()
        .map(|(sx, sz)| Aabb2::from_center(Vec2::new(sx * offset, sz * offset), half))
        .collect()
}

pub fn geometry(layout: &ArenaLayout) -> CollisionGeometry {
    CollisionGeometry {
        tiers: platform_tiers(layout),
        pillars: corner_pillars(layout),
        half_extent: layout.half_extent(),
    }
}

/// Build the four horsemen encounter
pub fn build(tuning: &Tuning) -> ArenaState {
    let layout = &tuning.arena;
    let mut state = ArenaState::new(tuning, geometry(layout));

    let corner = layout.board_size / 2.0 - layout.horseman_margin;
    for horseman in &HORSEMEN {
        let position = Vec3::new(horseman.corner.0 * corner, 0.0, horseman.corner.1 * corner);
        let boss = state.add_boss(
            UnitTemplate::named(horseman.name).with_hp(tuning.combat.boss_max_hp),
            position,
        );
        state.add_aura(AuraSource {
            id: horseman.aura_id.to_string(),
            position,
            radius: layout.aura_radius,
            color: horseman.color,
            curve: DamageCurve::Doubling,
            owner: Some(boss),
        });
    }

    log::info!(
        "Arena built: {} tiers, {} pillars, {} horsemen",
        state.geometry.tiers.len(),
        state.geometry.pillars.len(),
        state.bosses.len()
    );
    state
}

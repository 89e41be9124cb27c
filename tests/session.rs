//! End-to-end sessions on the default four horsemen arena

use std::cell::Cell;
use std::rc::Rc;

use arena_core::arena;
use arena_core::sim::{self, ArenaState, CastError, SimEvent, TickInput, tick};
use arena_core::Tuning;
use glam::{Vec2, Vec3};

const DT: f32 = 1.0 / 60.0;

fn run(state: &mut ArenaState, input: TickInput, seconds: f32) {
    let frames = (seconds / DT).round() as u32;
    for _ in 0..frames {
        tick(state, &input, DT);
    }
}

fn player_hp(state: &ArenaState) -> f32 {
    state.player_unit().unwrap().hp()
}

fn cast_reasons(state: &mut ArenaState) -> Vec<Option<String>> {
    state
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            SimEvent::AbilityCast { outcome, .. } => Some(outcome.reason),
            _ => None,
        })
        .collect()
}

#[test]
fn test_spawn_is_safe() {
    let mut state = arena::build(&Tuning::default());
    run(&mut state, TickInput::default(), 60.0);

    assert_eq!(player_hp(&state), 100.0);
    assert!(state.player_grounded());
    assert!((state.player_position().y - 1.2).abs() < 1e-4);
    assert!(state.debuff_snapshot().iter().all(|d| d.stack_count == 0));
}

#[test]
fn test_walk_up_the_platform() {
    let mut state = arena::build(&Tuning::default());
    state.place_player(Vec3::new(0.0, 1.2, 45.0));

    // 45 units at 15/s reaches the center through all five tiers
    run(&mut state, TickInput::moving(Vec2::NEG_Y), 3.0);

    let position = state.player_position();
    assert!(position.z.abs() < 1.0);
    assert!(state.player_grounded());
    assert!((position.y - 6.2).abs() < 1e-3);
}

#[test]
fn test_standing_in_an_aura_stacks_debuff() {
    let mut state = arena::build(&Tuning::default());
    state.place_player(Vec3::new(60.0, 1.2, 60.0));

    run(&mut state, TickInput::default(), 10.5);

    assert_eq!(state.status.stacks("shadow"), 1);
    assert_eq!(player_hp(&state), 90.0);
    let shadow = state
        .debuff_snapshot()
        .into_iter()
        .find(|d| d.id == "shadow")
        .unwrap();
    assert_eq!(shadow.color, 0xb8a0ff);
    assert!(shadow.seconds_remaining > 29.0 && shadow.seconds_remaining <= 30.0);
}

#[test]
fn test_debuff_expires_after_leaving() {
    let mut state = arena::build(&Tuning::default());
    state.place_player(Vec3::new(60.0, 1.2, 60.0));
    run(&mut state, TickInput::default(), 10.5);
    assert_eq!(state.status.stacks("shadow"), 1);

    state.place_player(Vec3::new(0.0, 1.2, 45.0));
    run(&mut state, TickInput::default(), 35.0);

    assert_eq!(state.status.stacks("shadow"), 0);
    assert!(
        state
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimEvent::AuraExpired { aura_id } if aura_id == "shadow"))
    );
}

#[test]
fn test_overlapping_auras_sum_damage() {
    let mut tuning = Tuning::default();
    tuning.arena.aura_radius = 90.0;
    let mut state = arena::build(&tuning);
    state.place_player(Vec3::new(85.0, 1.2, 0.0));

    run(&mut state, TickInput::default(), 10.5);

    assert_eq!(state.status.stacks("shadow"), 1);
    assert_eq!(state.status.stacks("plague"), 1);
    assert_eq!(player_hp(&state), 80.0);
}

#[test]
fn test_aura_death_fires_once_and_ends_session() {
    let mut state = arena::build(&Tuning::default());
    let deaths = Rc::new(Cell::new(0));
    let counter = Rc::clone(&deaths);
    let player = state.player;
    state
        .unit_mut(player)
        .unwrap()
        .on_died(move |_| counter.set(counter.get() + 1));
    state.place_player(Vec3::new(60.0, 1.2, 60.0));

    // 10 + 20 + 40 + 80 on the fourth interval
    run(&mut state, TickInput::default(), 50.0);

    assert!(state.is_game_over());
    assert_eq!(player_hp(&state), 0.0);
    assert_eq!(deaths.get(), 1);
    assert_eq!(state.status.active_count(), 0);

    sim::reset(&mut state);
    assert!(!state.is_game_over());
    assert_eq!(player_hp(&state), 100.0);
    assert!(!state.player_unit().unwrap().is_dead());
    assert_eq!(deaths.get(), 1);
}

#[test]
fn test_ranged_cast_rules() {
    let mut state = arena::build(&Tuning::default());
    let shadow = state.bosses[0];

    // No target yet
    tick(&mut state, &TickInput::default().with_cast(1), DT);
    assert_eq!(
        cast_reasons(&mut state),
        vec![Some(CastError::NoTarget.to_string())]
    );

    // Spawn is ~94 units from the shadow horseman
    state.set_target(shadow);
    tick(&mut state, &TickInput::default().with_cast(1), DT);
    let reasons = cast_reasons(&mut state);
    assert!(reasons[0].as_deref().unwrap().contains("out of range"));
    assert_eq!(state.player_unit().unwrap().power(), 100.0);

    state.place_player(Vec3::new(60.0, 1.2, 60.0));
    tick(&mut state, &TickInput::default().with_cast(1), DT);
    assert_eq!(cast_reasons(&mut state), vec![None]);
    assert_eq!(state.unit(shadow).unwrap().hp(), 970.0);
    assert_eq!(state.player_unit().unwrap().power(), 80.0);
}

#[test]
fn test_dead_target_rejected() {
    let mut state = arena::build(&Tuning::default());
    let shadow = state.bosses[0];
    state.combat.deal_damage(&mut state.units, shadow, 5000.0);
    state.set_target(shadow);
    state.place_player(Vec3::new(80.0, 1.2, 80.0));

    tick(&mut state, &TickInput::default().with_cast(0), DT);

    assert_eq!(
        cast_reasons(&mut state),
        vec![Some(CastError::TargetDead.to_string())]
    );
    assert_eq!(state.ability_bar().cooldowns[0], 0.0);
}

#[test]
fn test_same_inputs_same_session() {
    let script = |state: &mut ArenaState| {
        for frame in 0..600u32 {
            let direction = Vec2::from_angle(frame as f32 * 0.01);
            let mut input = TickInput::moving(direction);
            input.movement.jump = frame % 90 == 0;
            input.movement.yaw_delta = 0.02;
            tick(state, &input, DT);
        }
    };

    let mut a = arena::build(&Tuning::default());
    let mut b = arena::build(&Tuning::default());
    script(&mut a);
    script(&mut b);

    assert_eq!(a.player_position(), b.player_position());
    assert_eq!(a.player_yaw(), b.player_yaw());
    assert_eq!(a.drain_events(), b.drain_events());
}

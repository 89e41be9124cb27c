//! Arena Core headless runner
//!
//! Drives the four horsemen encounter with a seeded wandering player and
//! prints what happened.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use arena_core::sim::{ArenaState, DebuffSnapshot, SimEvent, TickInput, tick};
use arena_core::{Tuning, TuningError, arena, planar, planar_distance};

/// Frame delta the runner feeds the simulation (60 fps)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Seconds between wander direction changes
const WANDER_PERIOD: f32 = 2.0;
/// Cast the self heal below this fraction of max hp
const HEAL_BELOW: f32 = 0.5;

/// Headless arena encounter simulator
#[derive(Parser, Debug)]
#[command(name = "arena-sim")]
#[command(about = "Headless arena boss fight simulator")]
#[command(version)]
struct Args {
    /// Simulated seconds to run
    #[arg(long, default_value = "120")]
    seconds: f32,

    /// Seed for the wandering player
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// JSON tuning overrides
    #[arg(long, value_name = "TUNING_FILE")]
    tuning: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seconds_simulated: f32,
    ticks: u64,
    game_over: bool,
    player_hp: f32,
    player_power: f32,
    final_position: [f32; 3],
    casts_ok: u32,
    casts_rejected: u32,
    aura_stacks_applied: u32,
    auras_expired: u32,
    bosses: Vec<BossSummary>,
    debuffs: Vec<DebuffSnapshot>,
}

#[derive(Debug, Serialize)]
struct BossSummary {
    name: String,
    hp: f32,
    max_hp: f32,
}

/// Seeded stand-in for a human player
struct Wanderer {
    rng: Pcg32,
    heading: Vec2,
    until_turn: f32,
}

impl Wanderer {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            heading: Vec2::ZERO,
            until_turn: 0.0,
        }
    }

    fn next_input(&mut self, state: &mut ArenaState) -> TickInput {
        self.until_turn -= FRAME_DT;
        if self.until_turn <= 0.0 {
            self.until_turn = WANDER_PERIOD;
            self.heading = Vec2::new(
                self.rng.random_range(-1.0..1.0),
                self.rng.random_range(-1.0..1.0),
            );
        }

        let position = state.player_position();
        let mut input = TickInput::default();
        let Some(boss) = state.nearest_boss(position) else {
            input.movement.direction = self.heading.normalize_or_zero();
            return input;
        };
        if state.target.current() != Some(boss) {
            state.set_target(boss);
        }

        let boss_pos = state.positions.get(&boss).copied().unwrap_or(position);
        let toward = (planar(boss_pos) - planar(position)).normalize_or_zero();
        input.movement.direction = (toward * 0.7 + self.heading * 0.3).normalize_or_zero();
        input.movement.jump = self.rng.random_bool(0.01);
        input.movement.boost = self.rng.random_bool(0.2);

        let distance = planar_distance(position, boss_pos);
        let bar = state.ability_bar();
        let slot_range = |slot: usize| bar.loadout[slot].as_ref().map_or(0.0, |a| a.range);
        if distance <= slot_range(0) {
            input = input.with_cast(0);
        } else if distance <= slot_range(1) {
            input = input.with_cast(1);
        }
        if let Some(player) = state.player_unit() {
            if player.hp() < player.max_hp() * HEAL_BELOW {
                input = input.with_cast(2);
            }
        }
        input
    }
}

fn run(args: &Args) -> Result<Summary, TuningError> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut state = arena::build(&tuning);
    let mut wanderer = Wanderer::new(args.seed);
    let mut summary = Summary::default();

    let frames = (args.seconds.max(0.0) / FRAME_DT).round() as u64;
    for _ in 0..frames {
        let input = wanderer.next_input(&mut state);
        tick(&mut state, &input, FRAME_DT);

        for event in state.drain_events() {
            match event {
                SimEvent::AbilityCast { outcome, .. } if outcome.ok => summary.casts_ok += 1,
                SimEvent::AbilityCast { .. } => summary.casts_rejected += 1,
                SimEvent::AuraStacked {
                    aura_id,
                    stacks,
                    damage,
                } => {
                    summary.aura_stacks_applied += 1;
                    log::info!("{} x{} hit for {}", aura_id, stacks, damage);
                }
                SimEvent::AuraExpired { .. } => summary.auras_expired += 1,
                SimEvent::GameOver { elapsed } => {
                    log::info!("Game over at {:.1}s", elapsed);
                }
                SimEvent::Reset => {}
            }
        }
        if state.is_game_over() {
            break;
        }
    }

    summary.seconds_simulated = state.elapsed;
    summary.ticks = state.time_ticks;
    summary.game_over = state.is_game_over();
    if let Some(player) = state.player_unit() {
        summary.player_hp = player.hp();
        summary.player_power = player.power();
    }
    summary.final_position = state.player_position().to_array();
    summary.bosses = state
        .bosses
        .iter()
        .filter_map(|id| state.unit(*id))
        .map(|unit| BossSummary {
            name: unit.name().to_string(),
            hp: unit.hp(),
            max_hp: unit.max_hp(),
        })
        .collect();
    summary.debuffs = state.debuff_snapshot();
    Ok(summary)
}

fn print_summary(summary: &Summary) {
    println!(
        "Simulated {:.1}s ({} ticks){}",
        summary.seconds_simulated,
        summary.ticks,
        if summary.game_over { ", player died" } else { "" }
    );
    println!(
        "Player: {:.0} hp, {:.0} power at ({:.1}, {:.1}, {:.1})",
        summary.player_hp,
        summary.player_power,
        summary.final_position[0],
        summary.final_position[1],
        summary.final_position[2]
    );
    println!(
        "Casts: {} ok, {} rejected; aura stacks applied: {}, expired: {}",
        summary.casts_ok, summary.casts_rejected, summary.aura_stacks_applied, summary.auras_expired
    );
    for boss in &summary.bosses {
        println!("  {:<20} {:>6.0} / {:.0}", boss.name, boss.hp, boss.max_hp);
    }
    for debuff in summary.debuffs.iter().filter(|d| d.stack_count > 0) {
        println!(
            "  debuff {:<8} x{} ({:.1}s left)",
            debuff.id, debuff.stack_count, debuff.seconds_remaining
        );
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    log::info!("arena-sim starting (seed {})", args.seed);

    let summary = match run(&args) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                log::error!("failed to serialize summary: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&summary);
    }
    ExitCode::SUCCESS
}

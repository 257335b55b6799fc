//! duel-runner: headless driver for the gravity-well duel simulation.
//!
//! Usage:
//!   duel-runner run --seed 7 --ticks 3000 --weapon standard
//!   duel-runner run --config duel.json --ticks 600
//!   duel-runner preview --seed 7 --angle 0.1 --power 300 --weapon delayed

use std::process;

use log::{debug, info};
use serde_json::json;

use gravwell_core::commands::PlayerCommand;
use gravwell_core::config::SimConfig;
use gravwell_core::constants::MAX_TICK_DELTA_MS;
use gravwell_core::enums::{RoundPhase, WeaponKind};
use gravwell_core::events::SimEvent;
use gravwell_core::types::PlayerId;
use gravwell_sim::SimulationEngine;

/// Ticks between scripted shots.
const FIRE_INTERVAL_TICKS: u64 = 90;

/// Aim offsets (radians) cycled through by the scripted shooters.
const AIM_SPREAD: [f64; 5] = [0.0, 0.08, -0.08, 0.16, -0.16];

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("duel_runner=info,gravwell_sim=info"),
    )
    .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "preview" => cmd_preview(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "duel-runner: headless gravity-well duel\n\
         \n\
         Commands:\n\
         \n\
         run       Play a scripted duel and print a JSON summary\n\
         \n\
           --seed <N>         Arena seed (default: from config, 42)\n\
           --config <path>    JSON SimConfig file (optional)\n\
           --ticks <N>        Maximum ticks to run (default: 3000)\n\
           --weapon <kind>    ballistic | standard | delayed | burst (default: ballistic)\n\
         \n\
         preview   Print the predicted path of player 1's shot as JSON\n\
         \n\
           --seed <N>         Arena seed\n\
           --config <path>    JSON SimConfig file (optional)\n\
           --angle <rad>      Aim angle (default: 0)\n\
           --power <N>        Launch power (default: 300)\n\
           --weapon <kind>    Weapon to preview (default: ballistic)\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match flag_value(args, flag) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid value for {flag}: {raw}");
            process::exit(1);
        }),
    }
}

fn parse_weapon(name: &str) -> Option<WeaponKind> {
    match name {
        "ballistic" | "bullet" => Some(WeaponKind::Ballistic),
        "standard" | "missile" => Some(WeaponKind::StandardHoming),
        "delayed" => Some(WeaponKind::DelayedHoming),
        "burst" => Some(WeaponKind::BurstHoming),
        _ => None,
    }
}

fn weapon_flag(args: &[String]) -> WeaponKind {
    match flag_value(args, "--weapon") {
        None => WeaponKind::Ballistic,
        Some(name) => parse_weapon(name).unwrap_or_else(|| {
            eprintln!("Unknown weapon: {name}");
            process::exit(1);
        }),
    }
}

/// Build the engine from `--config` and `--seed`, exiting on any error.
fn load_engine(args: &[String]) -> SimulationEngine {
    let mut config = match flag_value(args, "--config") {
        None => SimConfig::default(),
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Failed to read {path}: {e}");
                process::exit(1);
            });
            SimConfig::from_json_str(&text).unwrap_or_else(|e| {
                eprintln!("Failed to load {path}: {e}");
                process::exit(1);
            })
        }
    };
    config.seed = parse_flag(args, "--seed", config.seed);

    SimulationEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to start simulation: {e}");
        process::exit(1);
    })
}

fn cmd_run(args: &[String]) {
    let max_ticks: u64 = parse_flag(args, "--ticks", 3000);
    let weapon = weapon_flag(args);

    let mut engine = load_engine(args);
    engine.queue_commands([PlayerId::ONE, PlayerId::TWO].map(|player| {
        PlayerCommand::SelectWeapon { player, weapon }
    }));

    let mut shots = 0u64;
    let mut refused = 0u64;
    let mut impacts = 0u64;
    let mut bounces = 0u64;
    let mut last_phase = engine.phase();

    for tick in 0..max_ticks {
        if tick % FIRE_INTERVAL_TICKS == 0 {
            let volley = tick / FIRE_INTERVAL_TICKS;
            let shooter = if volley % 2 == 0 {
                PlayerId::ONE
            } else {
                PlayerId::TWO
            };
            let base = if shooter == PlayerId::ONE {
                0.0
            } else {
                std::f64::consts::PI
            };
            let spread = AIM_SPREAD[(volley / 2) as usize % AIM_SPREAD.len()];
            engine.queue_commands([
                PlayerCommand::SetAim {
                    player: shooter,
                    angle: base + spread,
                    power: 320.0,
                },
                PlayerCommand::Fire { player: shooter },
            ]);
        }

        let snapshot = engine.tick(MAX_TICK_DELTA_MS);
        for event in &snapshot.events {
            match event {
                SimEvent::Fired { .. } => shots += 1,
                SimEvent::FireRefused { .. } => refused += 1,
                SimEvent::ProjectileImpact { .. } => impacts += 1,
                SimEvent::WellBounce { .. } => bounces += 1,
                SimEvent::CraftDestroyed { player, position } => {
                    info!("{player} destroyed at ({:.0}, {:.0})", position.x, position.y);
                }
                _ => {}
            }
            debug!("tick {}: {event:?}", snapshot.time.tick);
        }

        last_phase = snapshot.phase;
        if let RoundPhase::Over { .. } = last_phase {
            break;
        }
    }

    let winner = match last_phase {
        RoundPhase::Over { winner: Some(p) } => json!(p.to_string()),
        RoundPhase::Over { winner: None } => json!("draw"),
        RoundPhase::Active => json!(null),
    };
    let summary = json!({
        "seed": engine.config().seed,
        "ticks": engine.time().tick,
        "elapsed_ms": engine.time().elapsed_ms,
        "finished": last_phase != RoundPhase::Active,
        "winner": winner,
        "shots_fired": shots,
        "shots_refused": refused,
        "projectile_impacts": impacts,
        "well_bounces": bounces,
    });
    info!(
        "duel finished after {} ticks, winner: {winner}",
        engine.time().tick
    );
    println!("{summary:#}");
}

fn cmd_preview(args: &[String]) {
    let angle: f64 = parse_flag(args, "--angle", 0.0);
    let power: f64 = parse_flag(args, "--power", 300.0);
    let weapon = weapon_flag(args);

    let mut engine = load_engine(args);
    engine.queue_commands([
        PlayerCommand::SelectWeapon {
            player: PlayerId::ONE,
            weapon,
        },
        PlayerCommand::SetAim {
            player: PlayerId::ONE,
            angle,
            power,
        },
    ]);
    engine.apply_commands();

    let path = engine.preview_shot(PlayerId::ONE).unwrap_or_default();
    info!("preview: {} points", path.len());
    match serde_json::to_string_pretty(&path) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Failed to serialize path: {e}");
            process::exit(1);
        }
    }
}

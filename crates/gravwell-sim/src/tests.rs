//! Tests for the simulation engine: determinism, firing, round outcome and guidance.

use test_log::test;

use gravwell_core::commands::PlayerCommand;
use gravwell_core::components::{Body, Craft, Projectile};
use gravwell_core::config::SimConfig;
use gravwell_core::constants::*;
use gravwell_core::enums::*;
use gravwell_core::error::{ConfigError, SimError};
use gravwell_core::events::SimEvent;
use gravwell_core::state::GameSnapshot;
use gravwell_core::timing::ThrustState;
use gravwell_core::types::{PlayerId, Vector2D};

use crate::engine::SimulationEngine;
use crate::trajectory::Launch;

const DT: f64 = MAX_TICK_DELTA_MS;

/// Engine over an empty arena (no wells).
fn empty_arena() -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        well_count: 0,
        ..Default::default()
    })
    .unwrap()
}

fn craft_body(engine: &SimulationEngine, player: PlayerId) -> Option<Body> {
    engine
        .world()
        .query::<(&Body, &Craft)>()
        .iter()
        .find(|(_, (_, craft))| craft.player == player)
        .map(|(_, (body, _))| *body)
}

fn craft_ammo(engine: &SimulationEngine, player: PlayerId) -> gravwell_core::components::Ammo {
    engine
        .world()
        .query::<&Craft>()
        .iter()
        .find(|(_, craft)| craft.player == player)
        .map(|(_, craft)| craft.ammo)
        .unwrap()
}

fn projectile_entities(engine: &SimulationEngine) -> Vec<hecs::Entity> {
    engine
        .world()
        .query::<&Projectile>()
        .iter()
        .map(|(e, _)| e)
        .collect()
}

// ---- Setup ----

#[test]
fn test_new_round_layout() {
    let mut engine = SimulationEngine::new(SimConfig::default()).unwrap();
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, RoundPhase::Active);
    assert_eq!(snap.craft.len(), 2);
    assert_eq!(snap.craft[0].player, PlayerId::ONE);
    assert_eq!(snap.craft[1].player, PlayerId::TWO);
    assert!(!snap.wells.is_empty());
    assert!(snap.wells.len() <= WELL_COUNT);
    assert!(snap.projectiles.is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = SimulationEngine::new(SimConfig {
        arena_width: 0.0,
        ..Default::default()
    });
    assert!(matches!(
        result,
        Err(SimError::Config(ConfigError::Invalid {
            field: "arena_width",
            ..
        }))
    ));
}

#[test]
fn test_spawn_well_rejects_bad_radius() {
    let mut engine = empty_arena();
    let result = engine.spawn_well(Vector2D::new(600.0, 400.0), Vector2D::ZERO, 0.0);
    assert!(matches!(result, Err(SimError::Body(_))));
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SimConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = SimulationEngine::new(config.clone()).unwrap();
    let mut engine_b = SimulationEngine::new(config).unwrap();

    let volley = [
        PlayerCommand::SetAim {
            player: PlayerId::ONE,
            angle: -0.2,
            power: 320.0,
        },
        PlayerCommand::Fire {
            player: PlayerId::ONE,
        },
        PlayerCommand::SetAim {
            player: PlayerId::TWO,
            angle: 3.0,
            power: 280.0,
        },
        PlayerCommand::SelectWeapon {
            player: PlayerId::TWO,
            weapon: WeaponKind::StandardHoming,
        },
        PlayerCommand::Fire {
            player: PlayerId::TWO,
        },
    ];
    engine_a.queue_commands(volley.clone());
    engine_b.queue_commands(volley);

    for _ in 0..120 {
        let snap_a = engine_a.tick(DT);
        let snap_b = engine_b.tick(DT);
        assert_eq!(
            serde_json::to_string(&snap_a).unwrap(),
            serde_json::to_string(&snap_b).unwrap()
        );
    }
}

#[test]
fn test_different_seeds_differ() {
    let mut a = SimulationEngine::new(SimConfig {
        seed: 1,
        ..Default::default()
    })
    .unwrap();
    let mut b = SimulationEngine::new(SimConfig {
        seed: 2,
        ..Default::default()
    })
    .unwrap();
    let wa: Vec<Vector2D> = a.tick(DT).wells.iter().map(|w| w.position).collect();
    let wb: Vec<Vector2D> = b.tick(DT).wells.iter().map(|w| w.position).collect();
    assert_ne!(wa, wb);
}

// ---- Ticking ----

#[test]
fn test_delta_is_clamped() {
    let mut engine = empty_arena();
    engine.tick(1000.0);
    assert!((engine.time().elapsed_ms - MAX_TICK_DELTA_MS).abs() < 1e-9);
    engine.tick(-5.0);
    engine.tick(f64::NAN);
    assert!((engine.time().elapsed_ms - MAX_TICK_DELTA_MS).abs() < 1e-9);
    assert_eq!(engine.time().tick, 3);
}

#[test]
fn test_anchored_craft_do_not_fall() {
    let mut engine = empty_arena();
    engine
        .spawn_well(Vector2D::new(150.0, 400.0), Vector2D::ZERO, 40.0)
        .unwrap();
    let before = craft_body(&engine, PlayerId::ONE).unwrap();
    for _ in 0..30 {
        engine.tick(DT);
    }
    let after = craft_body(&engine, PlayerId::ONE).unwrap();
    assert_eq!(before.position, after.position);
    assert_eq!(after.velocity, Vector2D::ZERO);
}

#[test]
fn test_free_craft_fall_into_wells() {
    let mut engine = SimulationEngine::new(SimConfig {
        well_count: 0,
        anchored_craft: false,
        ..Default::default()
    })
    .unwrap();
    engine
        .spawn_well(Vector2D::new(150.0, 400.0), Vector2D::ZERO, 40.0)
        .unwrap();
    engine.tick(DT);
    let craft = craft_body(&engine, PlayerId::ONE).unwrap();
    assert!(craft.velocity.x > 0.0);
}

// ---- Firing ----

#[test]
fn test_fire_spawns_from_muzzle_and_spends_ammo() {
    let mut engine = empty_arena();
    engine.queue_commands([
        PlayerCommand::SetAim {
            player: PlayerId::ONE,
            angle: 0.0,
            power: 200.0,
        },
        PlayerCommand::Fire {
            player: PlayerId::ONE,
        },
    ]);
    let snap = engine.tick(DT);

    let fired = snap
        .events
        .iter()
        .find_map(|e| match e {
            SimEvent::Fired {
                player, position, ..
            } => Some((*player, *position)),
            _ => None,
        })
        .unwrap();
    assert_eq!(fired.0, PlayerId::ONE);
    assert_eq!(fired.1, Vector2D::new(50.0 + CRAFT_RADIUS + MUZZLE_OFFSET, 400.0));

    assert_eq!(snap.projectiles.len(), 1);
    assert_eq!(snap.projectiles[0].velocity, Vector2D::new(200.0, 0.0));
    assert_eq!(craft_ammo(&engine, PlayerId::ONE).bullets, STARTING_BULLETS - 1);
    assert_eq!(craft_ammo(&engine, PlayerId::TWO).bullets, STARTING_BULLETS);
}

#[test]
fn test_low_power_uses_minimum_speed() {
    let mut engine = empty_arena();
    engine.queue_command(PlayerCommand::Fire {
        player: PlayerId::TWO,
    });
    let snap = engine.tick(DT);
    let v = snap.projectiles[0].velocity;
    assert!((v.magnitude() - MIN_LAUNCH_SPEED).abs() < 1e-9);
    assert!(v.x < 0.0);
}

#[test]
fn test_empty_magazine_refuses_fire() {
    let mut engine = empty_arena();
    engine.queue_commands(
        std::iter::repeat(PlayerCommand::Fire {
            player: PlayerId::ONE,
        })
        .take(STARTING_BULLETS as usize + 1),
    );
    let snap = engine.tick(DT);

    let fired = snap
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::Fired { .. }))
        .count();
    let refused = snap
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::FireRefused { .. }))
        .count();
    assert_eq!(fired, STARTING_BULLETS as usize);
    assert_eq!(refused, 1);
    assert_eq!(craft_ammo(&engine, PlayerId::ONE).bullets, 0);
}

#[test]
fn test_select_weapon_and_aim_clamp() {
    let mut engine = empty_arena();
    engine.queue_commands([
        PlayerCommand::SelectWeapon {
            player: PlayerId::TWO,
            weapon: WeaponKind::BurstHoming,
        },
        PlayerCommand::SetAim {
            player: PlayerId::TWO,
            angle: 2.5,
            power: 10_000.0,
        },
    ]);
    let snap = engine.tick(DT);
    let p2 = &snap.craft[1];
    assert_eq!(p2.weapon, WeaponKind::BurstHoming);
    assert_eq!(p2.aim_power, CRAFT_MAX_POWER);
    assert_eq!(snap.craft[0].weapon, WeaponKind::Ballistic);
}

#[test]
fn test_non_finite_aim_is_ignored() {
    let mut engine = empty_arena();
    engine.queue_commands([
        PlayerCommand::SetAim {
            player: PlayerId::ONE,
            angle: f64::NAN,
            power: 200.0,
        },
        PlayerCommand::Fire {
            player: PlayerId::ONE,
        },
    ]);
    let snap = engine.tick(DT);

    // The shot goes out along the previous aim and costs exactly one round.
    assert_eq!(snap.craft[0].aim_angle, 0.0);
    assert_eq!(snap.projectiles.len(), 1);
    assert!(snap.projectiles[0].velocity.x > 0.0);
    assert!(snap.projectiles[0].position.x.is_finite());
    assert_eq!(craft_ammo(&engine, PlayerId::ONE).bullets, STARTING_BULLETS - 1);
    assert_eq!(
        snap.events
            .iter()
            .filter(|e| matches!(e, SimEvent::Fired { .. }))
            .count(),
        1
    );
}

#[test]
fn test_apply_commands_does_not_advance_time() {
    let mut engine = empty_arena();
    engine.queue_commands([
        PlayerCommand::SetAim {
            player: PlayerId::ONE,
            angle: 0.3,
            power: 150.0,
        },
        PlayerCommand::Fire {
            player: PlayerId::ONE,
        },
    ]);
    engine.apply_commands();
    assert_eq!(engine.time().tick, 0);
    assert_eq!(engine.time().elapsed_ms, 0.0);
    assert_eq!(projectile_entities(&engine).len(), 1);

    // Events raised by the commands arrive with the next tick.
    let snap = engine.tick(DT);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::Fired { .. })));
}

// ---- Round outcome ----

#[test]
fn test_shot_across_empty_arena_wins_round() {
    let mut engine = empty_arena();
    engine.queue_commands([
        PlayerCommand::SetAim {
            player: PlayerId::ONE,
            angle: 0.0,
            power: CRAFT_MAX_POWER,
        },
        PlayerCommand::Fire {
            player: PlayerId::ONE,
        },
    ]);

    let mut round_over = None;
    for _ in 0..400 {
        let snap = engine.tick(DT);
        if let Some(SimEvent::RoundOver { winner }) = snap
            .events
            .iter()
            .find(|e| matches!(e, SimEvent::RoundOver { .. }))
        {
            round_over = Some(*winner);
            assert!(snap.events.iter().any(|e| matches!(
                e,
                SimEvent::CraftDestroyed {
                    player: PlayerId::TWO,
                    ..
                }
            )));
            assert_eq!(snap.craft.len(), 1);
            break;
        }
    }
    assert_eq!(round_over, Some(Some(PlayerId::ONE)));
    assert_eq!(
        engine.phase(),
        RoundPhase::Over {
            winner: Some(PlayerId::ONE)
        }
    );
}

#[test]
fn test_own_shot_does_not_destroy_own_craft() {
    let mut engine = empty_arena();
    let home = craft_body(&engine, PlayerId::ONE).unwrap().position;
    engine
        .spawn_projectile(
            PlayerId::ONE,
            WeaponKind::Ballistic,
            Launch {
                position: home,
                velocity: Vector2D::new(10.0, 0.0),
            },
        )
        .unwrap();
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, RoundPhase::Active);
    assert_eq!(snap.craft.len(), 2);
    assert_eq!(snap.projectiles.len(), 1);
}

#[test]
fn test_double_kill_is_draw() {
    let mut engine = empty_arena();
    let p1 = craft_body(&engine, PlayerId::ONE).unwrap().position;
    let p2 = craft_body(&engine, PlayerId::TWO).unwrap().position;
    for (owner, at) in [(PlayerId::TWO, p1), (PlayerId::ONE, p2)] {
        engine
            .spawn_projectile(
                owner,
                WeaponKind::Ballistic,
                Launch {
                    position: at,
                    velocity: Vector2D::ZERO,
                },
            )
            .unwrap();
    }
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, RoundPhase::Over { winner: None });
    assert!(snap.craft.is_empty());
    assert!(snap
        .events
        .contains(&SimEvent::RoundOver { winner: None }));
}

#[test]
fn test_finished_round_is_frozen_until_reset() {
    let mut engine = empty_arena();
    let p2 = craft_body(&engine, PlayerId::TWO).unwrap().position;
    engine
        .spawn_projectile(
            PlayerId::ONE,
            WeaponKind::Ballistic,
            Launch {
                position: p2,
                velocity: Vector2D::ZERO,
            },
        )
        .unwrap();
    engine.tick(DT);
    let frozen = engine.time();

    engine.queue_command(PlayerCommand::Fire {
        player: PlayerId::ONE,
    });
    engine.queue_command(PlayerCommand::Fire {
        player: PlayerId::TWO,
    });
    let snap = engine.tick(DT);
    assert_eq!(engine.time().tick, frozen.tick);
    assert!(snap.events.contains(&SimEvent::FireRefused {
        player: PlayerId::ONE,
        weapon: Some(WeaponKind::Ballistic),
    }));
    // Player two's craft is gone, so there is no weapon to report.
    assert!(snap.events.contains(&SimEvent::FireRefused {
        player: PlayerId::TWO,
        weapon: None,
    }));
    assert_eq!(craft_ammo(&engine, PlayerId::ONE).bullets, STARTING_BULLETS);

    engine.queue_command(PlayerCommand::ResetRound);
    let snap = engine.tick(DT);
    assert_eq!(snap.phase, RoundPhase::Active);
    assert_eq!(snap.craft.len(), 2);
    assert_eq!(engine.time().tick, 1);
}

// ---- Guidance ----

#[test]
fn test_homing_missile_turns_toward_target() {
    let mut engine = empty_arena();
    engine.queue_commands([
        PlayerCommand::SelectWeapon {
            player: PlayerId::ONE,
            weapon: WeaponKind::StandardHoming,
        },
        PlayerCommand::SetAim {
            player: PlayerId::ONE,
            angle: std::f64::consts::FRAC_PI_2,
            power: 100.0,
        },
        PlayerCommand::Fire {
            player: PlayerId::ONE,
        },
    ]);
    let snap = engine.tick(DT);
    assert_eq!(craft_ammo(&engine, PlayerId::ONE).missiles, STARTING_MISSILES - 1);

    let missile = &snap.projectiles[0];
    assert_eq!(missile.thrust_state, Some(ThrustState::Thrusting { window: 0 }));
    let diagnostics = missile.homing.as_ref().unwrap();
    assert!(diagnostics.homing_active);
    assert_eq!(diagnostics.phase_count, 3);
    assert!(missile.velocity.x > 0.0);

    let entity = projectile_entities(&engine)[0];
    let result = engine.homing_result(entity).unwrap();
    assert!(result.thrust.unwrap().x > 0.0);
    assert_eq!(result.phases.len(), 3);
}

#[test]
fn test_delayed_missile_coasts_first() {
    let mut engine = empty_arena();
    engine.queue_commands([
        PlayerCommand::SelectWeapon {
            player: PlayerId::ONE,
            weapon: WeaponKind::DelayedHoming,
        },
        PlayerCommand::SetAim {
            player: PlayerId::ONE,
            angle: std::f64::consts::FRAC_PI_2,
            power: 60.0,
        },
        PlayerCommand::Fire {
            player: PlayerId::ONE,
        },
    ]);
    let snap = engine.tick(DT);
    let missile = &snap.projectiles[0];
    assert_eq!(missile.thrust_state, Some(ThrustState::Delayed));
    assert!(missile.homing.is_none());
    assert_eq!(
        missile.velocity,
        Vector2D::from_angle(std::f64::consts::FRAC_PI_2, 60.0)
    );
    assert_eq!(missile.radius, DELAYED_MISSILE_RADIUS);
}

#[test]
fn test_trail_records_positions() {
    let mut engine = empty_arena();
    engine.queue_command(PlayerCommand::Fire {
        player: PlayerId::ONE,
    });
    let mut snap = engine.tick(DT);
    for _ in 0..(BULLET_TRAIL_LENGTH + 5) {
        snap = engine.tick(DT);
    }
    let bullet = &snap.projectiles[0];
    assert_eq!(bullet.trail.len(), BULLET_TRAIL_LENGTH);
    assert!(bullet.trail.last().unwrap().x < bullet.position.x);
}

#[test]
fn test_snapshot_with_doomed_missile_round_trips() {
    let mut engine = empty_arena();
    engine
        .spawn_well(Vector2D::new(400.0, 400.0), Vector2D::ZERO, 60.0)
        .unwrap();
    engine
        .spawn_projectile(
            PlayerId::ONE,
            WeaponKind::StandardHoming,
            Launch {
                position: Vector2D::new(200.0, 400.0),
                velocity: Vector2D::new(150.0, 0.0),
            },
        )
        .unwrap();
    let snap = engine.tick(DT);

    // Coasting runs straight into the well.
    let diagnostics = snap.projectiles[0].homing.as_ref().unwrap();
    assert_eq!(diagnostics.baseline_distance, None);

    let json = serde_json::to_string(&snap).unwrap();
    let restored: GameSnapshot = serde_json::from_str(&json).unwrap();
    let restored_diagnostics = restored.projectiles[0].homing.as_ref().unwrap();
    assert_eq!(restored_diagnostics.baseline_distance, None);
    assert_eq!(restored_diagnostics.phase_count, diagnostics.phase_count);
    assert_eq!(
        restored_diagnostics.best_distance.is_some(),
        diagnostics.best_distance.is_some()
    );
}

// ---- Preview ----

#[test]
fn test_preview_follows_aim() {
    let mut engine = empty_arena();
    engine.queue_command(PlayerCommand::SetAim {
        player: PlayerId::ONE,
        angle: 0.0,
        power: 400.0,
    });
    engine.tick(DT);
    let path = engine.preview_shot(PlayerId::ONE).unwrap();
    assert_eq!(path[0], Vector2D::new(85.0, 400.0));
    assert!(path.iter().all(|p| (p.y - 400.0).abs() < 1e-9));
    assert!(path.last().unwrap().x > ARENA_WIDTH + PROJECTILE_BOUNDS_MARGIN);
    assert!(engine.preview_shot(PlayerId(3)).is_none());
}

#[test]
fn test_homing_preview_steers_toward_opponent() {
    let mut engine = empty_arena();
    engine.queue_command(PlayerCommand::SetAim {
        player: PlayerId::ONE,
        angle: std::f64::consts::FRAC_PI_2,
        power: 100.0,
    });
    engine.apply_commands();
    let ballistic = engine.preview_shot(PlayerId::ONE).unwrap();

    engine.queue_command(PlayerCommand::SelectWeapon {
        player: PlayerId::ONE,
        weapon: WeaponKind::StandardHoming,
    });
    engine.apply_commands();
    let homing = engine.preview_shot(PlayerId::ONE).unwrap();

    assert_eq!(homing[0], ballistic[0]);
    assert!(ballistic.iter().all(|p| (p.x - 50.0).abs() < 1e-6));
    // Pulled toward player two on the right.
    assert!(homing.iter().any(|p| p.x > 120.0));
}

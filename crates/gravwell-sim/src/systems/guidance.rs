//! Projectile bookkeeping and homing guidance.
//!
//! Each tick every live projectile records its trail and ages by `dt`.
//! Homing projectiles whose timing window is open re-plan at most once per
//! recalculation interval and otherwise keep thrusting along their last
//! chosen direction.

use std::collections::HashMap;

use hecs::World;
use log::debug;

use gravwell_core::components::{Body, Craft, Projectile};
use gravwell_core::config::HomingConfig;
use gravwell_core::homing::{HomingContext, TargetSnapshot};
use gravwell_core::types::PlayerId;

use crate::homing;
use crate::systems::well_snapshots;

pub fn run(world: &mut World, homing_config: &HomingConfig, gravity_constant: f64, dt_ms: f64) {
    let wells = well_snapshots(world);
    let targets: HashMap<PlayerId, TargetSnapshot> = world
        .query::<(&Body, &Craft)>()
        .iter()
        .map(|(_, (body, craft))| {
            (
                craft.player,
                TargetSnapshot {
                    position: body.position,
                    destroyed: body.destroyed,
                },
            )
        })
        .collect();

    for (_entity, (body, projectile)) in world.query_mut::<(&mut Body, &mut Projectile)>() {
        if body.destroyed {
            continue;
        }
        projectile.trail.push(body.position);
        projectile.time_alive += dt_ms;

        let time_alive = projectile.time_alive;
        let owner = projectile.owner;
        let Some(guidance) = projectile.guidance.as_mut() else {
            continue;
        };

        let window = guidance.policy.window(time_alive);
        if !window.allowed {
            continue;
        }

        if guidance.recalculation_due(time_alive) {
            let context = HomingContext {
                position: body.position,
                velocity: body.velocity,
                target: guidance.target.and_then(|p| targets.get(&p).copied()),
                wells: &wells,
                window,
                thrust_force: guidance.thrust_force,
                gravity_constant,
            };
            let result = homing::plan(&context, homing_config);
            let was_active = guidance.current_thrust().is_some();
            if result.thrust.is_some() != was_active {
                debug!(
                    "{owner} missile at {time_alive:.0}ms: homing {}",
                    if was_active { "released" } else { "engaged" }
                );
            }
            guidance.last_calculation_ms = Some(time_alive);
            guidance.last_result = Some(result);
        }

        if let Some(direction) = guidance.current_thrust() {
            body.velocity += direction * (guidance.thrust_force * dt_ms / 1000.0);
        }
    }
}

//! Snapshot system: builds the `GameSnapshot` handed to the renderer.

use hecs::World;

use gravwell_core::components::{Body, Craft, Projectile, Serial};
use gravwell_core::enums::RoundPhase;
use gravwell_core::events::SimEvent;
use gravwell_core::state::*;
use gravwell_core::types::SimTime;

use crate::systems::live_wells;

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: RoundPhase,
    arena: (f64, f64),
    events: Vec<SimEvent>,
) -> GameSnapshot {
    let wells = live_wells(world)
        .into_iter()
        .map(|(_, body)| WellView {
            position: body.position,
            velocity: body.velocity,
            radius: body.radius(),
            mass: body.mass(),
        })
        .collect();

    let mut craft: Vec<(Serial, CraftView)> = world
        .query::<(&Serial, &Body, &Craft)>()
        .iter()
        .filter(|(_, (_, body, _))| !body.destroyed)
        .map(|(_, (serial, body, craft))| {
            (
                *serial,
                CraftView {
                    player: craft.player,
                    position: body.position,
                    radius: body.radius(),
                    aim_angle: craft.aim_angle,
                    aim_power: craft.aim_power,
                    weapon: craft.weapon,
                    ammo: craft.ammo,
                },
            )
        })
        .collect();
    craft.sort_by_key(|(serial, _)| *serial);

    let mut projectiles: Vec<(Serial, ProjectileView)> = world
        .query::<(&Serial, &Body, &Projectile)>()
        .iter()
        .filter(|(_, (_, body, _))| !body.destroyed)
        .map(|(_, (serial, body, projectile))| {
            let guidance = projectile.guidance.as_ref();
            (
                *serial,
                ProjectileView {
                    owner: projectile.owner,
                    weapon: projectile.weapon,
                    position: body.position,
                    velocity: body.velocity,
                    radius: body.radius(),
                    time_alive: projectile.time_alive,
                    trail: projectile.trail.points().copied().collect(),
                    thrust_state: guidance.map(|g| g.policy.state(projectile.time_alive)),
                    homing: guidance
                        .and_then(|g| g.last_result.as_ref())
                        .map(|r| r.diagnostics.clone()),
                },
            )
        })
        .collect();
    projectiles.sort_by_key(|(serial, _)| *serial);

    GameSnapshot {
        time: *time,
        phase,
        arena_width: arena.0,
        arena_height: arena.1,
        wells,
        craft: craft.into_iter().map(|(_, c)| c).collect(),
        projectiles: projectiles.into_iter().map(|(_, p)| p).collect(),
        events,
    }
}

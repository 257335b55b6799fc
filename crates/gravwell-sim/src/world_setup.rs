//! Entity spawn factories for setting up a round.
//!
//! Creates the two craft and the well field, and spawns fired projectiles.
//! Every entity gets a `Serial` so systems can walk bodies in spawn order.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use gravwell_core::components::*;
use gravwell_core::config::SimConfig;
use gravwell_core::constants::*;
use gravwell_core::enums::WeaponKind;
use gravwell_core::error::BodyError;
use gravwell_core::types::{PlayerId, Vector2D};

use crate::trajectory::Launch;

/// Source of spawn serials. Monotonic for the life of the engine.
#[derive(Debug, Default)]
pub struct SerialCounter(u64);

impl SerialCounter {
    pub fn issue(&mut self) -> Serial {
        let serial = Serial(self.0);
        self.0 += 1;
        serial
    }
}

/// Placement of one generated well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellPlacement {
    pub position: Vector2D,
    pub radius: f64,
}

/// Populate an empty world with both craft and a freshly generated well field.
pub fn setup_round(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    serials: &mut SerialCounter,
    config: &SimConfig,
) -> Result<(), BodyError> {
    let mid_y = config.arena_height / 2.0;
    spawn_craft(
        world,
        serials,
        PlayerId::ONE,
        Vector2D::new(CRAFT_WALL_OFFSET, mid_y),
        0.0,
    )?;
    spawn_craft(
        world,
        serials,
        PlayerId::TWO,
        Vector2D::new(config.arena_width - CRAFT_WALL_OFFSET, mid_y),
        std::f64::consts::PI,
    )?;

    for placement in generate_wells(rng, config) {
        let drift = Vector2D::new(
            (rng.gen::<f64>() - 0.5) * WELL_DRIFT_RANGE,
            (rng.gen::<f64>() - 0.5) * WELL_DRIFT_RANGE,
        );
        spawn_well(world, serials, placement.position, drift, placement.radius)?;
    }
    Ok(())
}

/// Rejection-sample up to `config.well_count` non-overlapping wells.
///
/// Each well gets `WELL_PLACEMENT_ATTEMPTS` tries; a well that never fits is
/// skipped, so the field may come out smaller than requested.
pub fn generate_wells(rng: &mut ChaCha8Rng, config: &SimConfig) -> Vec<WellPlacement> {
    let mut placed: Vec<WellPlacement> = Vec::with_capacity(config.well_count);
    let span_x = (config.arena_width - 2.0 * WELL_SPAWN_MARGIN_X).max(0.0);
    let span_y = (config.arena_height - 2.0 * WELL_SPAWN_MARGIN_Y).max(0.0);

    for _ in 0..config.well_count {
        for _ in 0..WELL_PLACEMENT_ATTEMPTS {
            let position = Vector2D::new(
                WELL_SPAWN_MARGIN_X + rng.gen::<f64>() * span_x,
                WELL_SPAWN_MARGIN_Y + rng.gen::<f64>() * span_y,
            );
            let radius = roll_well_radius(rng);
            let clear = placed.iter().all(|other| {
                position.distance(&other.position) >= radius + other.radius + WELL_MIN_SPACING
            });
            if clear {
                placed.push(WellPlacement { position, radius });
                break;
            }
        }
    }
    placed
}

/// Size class draw: 60% small, 30% medium, 10% large.
fn roll_well_radius(rng: &mut ChaCha8Rng) -> f64 {
    let roll = rng.gen::<f64>();
    if roll < 0.6 {
        10.0 + rng.gen::<f64>() * 20.0
    } else if roll < 0.9 {
        30.0 + rng.gen::<f64>() * 25.0
    } else {
        55.0 + rng.gen::<f64>() * 25.0
    }
}

pub fn spawn_craft(
    world: &mut World,
    serials: &mut SerialCounter,
    player: PlayerId,
    position: Vector2D,
    aim_angle: f64,
) -> Result<Entity, BodyError> {
    let body = Craft::body(position)?;
    Ok(world.spawn((body, Craft::new(player, aim_angle), serials.issue())))
}

pub fn spawn_well(
    world: &mut World,
    serials: &mut SerialCounter,
    position: Vector2D,
    velocity: Vector2D,
    radius: f64,
) -> Result<Entity, BodyError> {
    let body = Well::body(position, velocity, radius)?;
    Ok(world.spawn((body, Well, serials.issue())))
}

/// Spawn a projectile. Homing variants hunt `target`.
pub fn spawn_projectile(
    world: &mut World,
    serials: &mut SerialCounter,
    owner: PlayerId,
    weapon: WeaponKind,
    launch: Launch,
    target: Option<PlayerId>,
) -> Result<Entity, BodyError> {
    let body = Projectile::body(weapon, launch.position, launch.velocity)?;
    Ok(insert_projectile(
        world,
        serials,
        body,
        Projectile::new(owner, weapon, target),
    ))
}

/// Spawn a projectile from an already validated body.
pub fn insert_projectile(
    world: &mut World,
    serials: &mut SerialCounter,
    body: Body,
    projectile: Projectile,
) -> Entity {
    world.spawn((body, projectile, serials.issue()))
}

//! Gravity system: wells pull projectiles (and free craft) each tick.

use hecs::{Entity, World};

use gravwell_core::components::{Body, Craft, Projectile, Serial};

use crate::physics;
use crate::systems::live_wells;

/// Apply one tick of well gravity. Craft are only affected when
/// `include_craft` is set.
pub fn run(world: &mut World, gravity_constant: f64, dt_ms: f64, include_craft: bool) {
    let wells: Vec<Body> = live_wells(world).into_iter().map(|(_, b)| b).collect();
    if wells.is_empty() {
        return;
    }

    // Gather attracted bodies.
    let mut attracted: Vec<(Serial, Entity, Body)> = world
        .query::<(&Serial, &Body, &Projectile)>()
        .iter()
        .map(|(e, (s, b, _))| (*s, e, *b))
        .collect();
    if include_craft {
        attracted.extend(
            world
                .query::<(&Serial, &Body, &Craft)>()
                .iter()
                .map(|(e, (s, b, _))| (*s, e, *b)),
        );
    }
    attracted.sort_by_key(|(s, _, _)| *s);

    let mut bodies: Vec<Body> = attracted.iter().map(|(_, _, b)| *b).collect();
    physics::apply_gravity(&mut bodies, &wells, gravity_constant, dt_ms);

    // Write back velocities.
    for ((_, entity, _), updated) in attracted.iter().zip(&bodies) {
        if let Ok(mut body) = world.get::<&mut Body>(*entity) {
            body.velocity = updated.velocity;
        }
    }
}

//! Arena bounds system.

use hecs::World;

use gravwell_core::components::{Body, Projectile, Well};
use gravwell_core::enums::BodyKind;
use gravwell_core::events::SimEvent;

use crate::physics::check_bounds;

/// Flag projectiles that left the arena margin and keep wells inside.
pub fn run(world: &mut World, width: f64, height: f64, events: &mut Vec<SimEvent>) {
    for (_entity, (body, projectile)) in world.query_mut::<(&mut Body, &Projectile)>() {
        let owner = projectile.owner;
        if check_bounds(body, BodyKind::Projectile { owner }, width, height) {
            events.push(SimEvent::ProjectileLeftArena { owner });
        }
    }

    for (_entity, (body, _well)) in world.query_mut::<(&mut Body, &Well)>() {
        check_bounds(body, BodyKind::Well, width, height);
    }
}

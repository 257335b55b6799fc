//! Collision system: all-pairs contact resolution in spawn order.

use hecs::{Entity, World};

use gravwell_core::components::{Body, Craft, Projectile, Serial, Well};
use gravwell_core::constants::WELL_RESTITUTION;
use gravwell_core::enums::BodyKind;
use gravwell_core::events::SimEvent;

use crate::physics::{resolve_collisions, CollisionBody};

/// Resolve contacts between every pair of live bodies and write the
/// outcome back to the world.
pub fn run(world: &mut World, events: &mut Vec<SimEvent>) {
    // Gather: (serial, entity, body + kind)
    let mut gathered: Vec<(Serial, Entity, CollisionBody)> = Vec::new();
    for (entity, (serial, body, well, craft, projectile)) in world
        .query::<(
            &Serial,
            &Body,
            Option<&Well>,
            Option<&Craft>,
            Option<&Projectile>,
        )>()
        .iter()
    {
        if body.destroyed {
            continue;
        }
        let kind = match (well, craft, projectile) {
            (Some(_), _, _) => BodyKind::Well,
            (_, Some(c), _) => BodyKind::Craft { player: c.player },
            (_, _, Some(p)) => BodyKind::Projectile { owner: p.owner },
            _ => continue,
        };
        gathered.push((*serial, entity, CollisionBody { body: *body, kind }));
    }
    gathered.sort_by_key(|(serial, _, _)| *serial);

    let mut bodies: Vec<CollisionBody> = gathered.iter().map(|(_, _, c)| *c).collect();
    events.extend(resolve_collisions(&mut bodies, WELL_RESTITUTION));

    // Apply: positions and velocities change on bounces, flags on hits.
    for ((_, entity, _), resolved) in gathered.iter().zip(&bodies) {
        if let Ok(mut body) = world.get::<&mut Body>(*entity) {
            *body = resolved.body;
        }
    }
}

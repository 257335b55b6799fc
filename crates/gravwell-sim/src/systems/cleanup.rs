//! Cleanup system: despawns bodies flagged destroyed.

use hecs::{Entity, World};

use gravwell_core::components::Body;

/// Remove every destroyed body. The only place entities leave the world.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, body) in world.query_mut::<&Body>() {
        if body.destroyed {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

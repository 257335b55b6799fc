//! Kinematic integration system: position += velocity × dt.

use hecs::World;

use gravwell_core::components::{Body, Craft};

/// Move every live body. Craft stay put unless `include_craft` is set.
pub fn run(world: &mut World, dt_ms: f64, include_craft: bool) {
    for (_entity, (body, craft)) in world.query_mut::<(&mut Body, Option<&Craft>)>() {
        if craft.is_some() && !include_craft {
            continue;
        }
        body.integrate(dt_ms);
    }
}

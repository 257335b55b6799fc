//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state; all state lives in components.

pub mod bounds;
pub mod cleanup;
pub mod collision;
pub mod gravity;
pub mod guidance;
pub mod movement;
pub mod snapshot;

use hecs::World;

use gravwell_core::components::{Body, Serial, Well};
use gravwell_core::homing::WellSnapshot;

/// Live wells in spawn order.
pub fn live_wells(world: &World) -> Vec<(Serial, Body)> {
    let mut wells: Vec<(Serial, Body)> = world
        .query::<(&Serial, &Body, &Well)>()
        .iter()
        .filter(|(_, (_, body, _))| !body.destroyed)
        .map(|(_, (serial, body, _))| (*serial, *body))
        .collect();
    wells.sort_by_key(|(serial, _)| *serial);
    wells
}

/// Frozen well views for forward simulation, in spawn order.
pub fn well_snapshots(world: &World) -> Vec<WellSnapshot> {
    live_wells(world)
        .iter()
        .map(|(_, body)| WellSnapshot::from(body))
        .collect()
}

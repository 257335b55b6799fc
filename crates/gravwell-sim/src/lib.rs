//! Simulation engine for the gravity-well duel.
//!
//! Owns the hecs ECS world, runs the tick pipeline, and hosts the pure
//! physics, trajectory evaluation and homing planner it is built on.

pub mod engine;
pub mod homing;
pub mod physics;
pub mod systems;
pub mod trajectory;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use gravwell_core as core;

#[cfg(test)]
mod tests;

//! Game state snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::components::Ammo;
use crate::enums::{RoundPhase, WeaponKind};
use crate::events::SimEvent;
use crate::homing::HomingDiagnostics;
use crate::timing::ThrustState;
use crate::types::{PlayerId, SimTime, Vector2D};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub time: SimTime,
    pub phase: RoundPhase,
    pub arena_width: f64,
    pub arena_height: f64,
    pub wells: Vec<WellView>,
    pub craft: Vec<CraftView>,
    pub projectiles: Vec<ProjectileView>,
    /// Events raised during this tick.
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellView {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub radius: f64,
    pub mass: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CraftView {
    pub player: PlayerId,
    pub position: Vector2D,
    pub radius: f64,
    pub aim_angle: f64,
    pub aim_power: f64,
    pub weapon: WeaponKind,
    pub ammo: Ammo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub owner: PlayerId,
    pub weapon: WeaponKind,
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub radius: f64,
    pub time_alive: f64,
    pub trail: Vec<Vector2D>,
    /// `None` for ballistic projectiles.
    pub thrust_state: Option<ThrustState>,
    /// Last planner diagnostics, homing variants only.
    pub homing: Option<HomingDiagnostics>,
}

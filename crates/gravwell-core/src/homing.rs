//! Data exchanged with the homing planner: the per-call context and its result.

use serde::{Deserialize, Serialize};

use crate::components::Body;
use crate::timing::ThrustWindow;
use crate::types::Vector2D;

/// Frozen view of a well for forward simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WellSnapshot {
    pub position: Vector2D,
    pub radius: f64,
    pub mass: f64,
}

impl From<&Body> for WellSnapshot {
    fn from(body: &Body) -> Self {
        Self {
            position: body.position,
            radius: body.radius(),
            mass: body.mass(),
        }
    }
}

/// Frozen view of the target craft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub position: Vector2D,
    pub destroyed: bool,
}

/// One leg of a thrust plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Unit thrust direction; `None` coasts through the leg.
    pub direction: Option<Vector2D>,
    pub duration_ms: f64,
}

/// Immutable input to one planner invocation.
#[derive(Debug, Clone, Copy)]
pub struct HomingContext<'a> {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// `None` when the projectile has no target at all.
    pub target: Option<TargetSnapshot>,
    pub wells: &'a [WellSnapshot],
    /// Timing policy answer for this tick.
    pub window: ThrustWindow,
    /// Thrust acceleration, units/s².
    pub thrust_force: f64,
    pub gravity_constant: f64,
}

/// Planner diagnostics for visualization. Never needed for correctness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomingDiagnostics {
    /// Coarse single-phase sample directions, in sampling order.
    pub sampled_directions: Vec<Vector2D>,
    /// Best direction found, even if it was not adopted.
    pub best_direction: Option<Vector2D>,
    /// Best phase sequence found, even if it was not adopted.
    pub planned_phases: Vec<Phase>,
    pub homing_active: bool,
    pub phase_count: usize,
    pub evaluation_count: usize,
    /// Coasting baseline the candidates had to beat. `None` when coasting
    /// runs into a well.
    pub baseline_distance: Option<f64>,
    /// Score of the best candidate. `None` when every candidate hits a well.
    pub best_distance: Option<f64>,
}

/// Planner output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomingResult {
    /// Thrust direction for this tick; `None` means coast.
    pub thrust: Option<Vector2D>,
    /// Adopted phase sequence (advisory, recomputed next interval).
    pub phases: Vec<Phase>,
    pub diagnostics: HomingDiagnostics,
}

impl HomingResult {
    /// "Nothing to do" result.
    pub fn no_thrust() -> Self {
        Self::default()
    }
}

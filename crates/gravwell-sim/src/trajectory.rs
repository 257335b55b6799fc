//! Forward simulation used to score candidate thrust plans and to draw the
//! aiming preview.
//!
//! Works on copies of position and velocity only. The gravity law is the one
//! in [`crate::physics`], so the planner and preview see the same forces the
//! live simulation applies.

use gravwell_core::config::TrajectoryParams;
use gravwell_core::constants::*;
use gravwell_core::homing::{Phase, WellSnapshot};
use gravwell_core::timing::TimingPolicy;
use gravwell_core::types::Vector2D;

use crate::physics::gravity_impulse;

/// Starting kinematics of a simulated probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

/// Score of one simulated candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryEvaluation {
    /// Closest approach to the target plus any grazing penalty.
    /// `f64::INFINITY` when the path runs into a well.
    pub min_distance: f64,
    /// Elapsed ms at the closest approach (or at well contact).
    pub time_to_closest: f64,
}

impl TrajectoryEvaluation {
    pub fn is_hit(&self) -> bool {
        self.min_distance == f64::INFINITY
    }
}

/// Simulate coasting or constant thrust toward `target`.
///
/// `thrust` is a unit direction applied at `thrust_magnitude` (units/s²)
/// while elapsed time is below `thrust_duration_ms`. `None` coasts.
pub fn evaluate_trajectory(
    launch: Launch,
    thrust: Option<Vector2D>,
    thrust_magnitude: f64,
    thrust_duration_ms: f64,
    target: Vector2D,
    wells: &[WellSnapshot],
    params: &TrajectoryParams,
) -> TrajectoryEvaluation {
    let schedule = |elapsed: f64| thrust.filter(|_| elapsed < thrust_duration_ms);
    run(launch, schedule, thrust_magnitude, target, wells, params)
}

/// Simulate a sequence of thrust phases, then coast to the horizon.
pub fn evaluate_multi_phase_trajectory(
    launch: Launch,
    phases: &[Phase],
    thrust_magnitude: f64,
    target: Vector2D,
    wells: &[WellSnapshot],
    params: &TrajectoryParams,
) -> TrajectoryEvaluation {
    let step = params.time_step_ms;
    let mut index = 0;
    let mut phase_time = 0.0;

    let schedule = move |_elapsed: f64| {
        let phase = phases.get(index)?;
        let direction = phase.direction.filter(|_| phase_time < phase.duration_ms);
        phase_time += step;
        if phase_time >= phase.duration_ms {
            index += 1;
            phase_time = 0.0;
        }
        direction
    };
    run(launch, schedule, thrust_magnitude, target, wells, params)
}

/// Integration state shared by the evaluators and the preview.
#[derive(Debug, Clone)]
struct Probe<'a> {
    position: Vector2D,
    velocity: Vector2D,
    wells: &'a [WellSnapshot],
    gravity_constant: f64,
    /// Smallest distance to any well surface seen so far.
    min_clearance: f64,
}

impl<'a> Probe<'a> {
    fn new(launch: Launch, wells: &'a [WellSnapshot], gravity_constant: f64) -> Self {
        Self {
            position: launch.position,
            velocity: launch.velocity,
            wells,
            gravity_constant,
            min_clearance: f64::INFINITY,
        }
    }

    /// Apply gravity from every well, recording clearance. Returns false as
    /// soon as the probe is within `contact_buffer` of a well surface.
    fn gravitate(&mut self, contact_buffer: f64, dt_ms: f64) -> bool {
        for well in self.wells {
            let distance = self.position.distance(&well.position);
            if distance < well.radius + contact_buffer {
                return false;
            }
            self.min_clearance = self.min_clearance.min(distance - well.radius);
            self.velocity += gravity_impulse(self.position, well, self.gravity_constant, dt_ms);
        }
        true
    }

    fn thrust(&mut self, direction: Vector2D, magnitude: f64, dt_ms: f64) {
        self.velocity += direction * (magnitude * dt_ms / 1000.0);
    }

    fn advance(&mut self, dt_ms: f64) {
        self.position += self.velocity * (dt_ms / 1000.0);
    }
}

fn run(
    launch: Launch,
    mut schedule: impl FnMut(f64) -> Option<Vector2D>,
    thrust_magnitude: f64,
    target: Vector2D,
    wells: &[WellSnapshot],
    params: &TrajectoryParams,
) -> TrajectoryEvaluation {
    let step = params.time_step_ms;
    let mut probe = Probe::new(launch, wells, params.gravity_constant);
    let mut elapsed = 0.0;
    let mut min_distance = f64::INFINITY;
    let mut time_to_closest = 0.0;

    while elapsed < params.max_time_ms {
        if !probe.gravitate(WELL_IMPACT_BUFFER, step) {
            return TrajectoryEvaluation {
                min_distance: f64::INFINITY,
                time_to_closest: elapsed,
            };
        }
        if let Some(direction) = schedule(elapsed) {
            probe.thrust(direction, thrust_magnitude, step);
        }
        probe.advance(step);
        elapsed += step;

        let distance = probe.position.distance(&target);
        if distance < min_distance {
            min_distance = distance;
            time_to_closest = elapsed;
        }
        if distance > DIVERGENCE_FACTOR * min_distance
            && elapsed > time_to_closest + DIVERGENCE_GRACE_MS
        {
            break;
        }
    }

    if probe.min_clearance < GRAZE_CLEARANCE && min_distance.is_finite() {
        min_distance += (GRAZE_CLEARANCE - probe.min_clearance) * GRAZE_PENALTY_PER_UNIT;
    }

    TrajectoryEvaluation {
        min_distance,
        time_to_closest,
    }
}

/// Thrust model of a previewed homing shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewGuidance {
    pub policy: TimingPolicy,
    /// Thrust acceleration, units/s².
    pub thrust_force: f64,
    /// Target position. `None` thrusts straight along the velocity.
    pub target: Option<Vector2D>,
}

impl PreviewGuidance {
    /// Thrust direction at `time_alive`, or `None` outside the policy's windows.
    fn direction(
        &self,
        position: Vector2D,
        velocity: Vector2D,
        time_alive: f64,
    ) -> Option<Vector2D> {
        if !self.policy.window(time_alive).allowed {
            return None;
        }
        let heading = velocity.normalize();
        Some(match self.target {
            Some(target) => (heading * (1.0 - PREVIEW_HOMING_BLEND)
                + (target - position).normalize() * PREVIEW_HOMING_BLEND)
                .normalize(),
            None => heading,
        })
    }
}

/// Predicted positions of a shot, for the aiming preview.
///
/// Ballistic shots pass `guidance: None`. Homing shots thrust inside their
/// policy's windows, steering partly toward the target.
///
/// Yields the start position first, then one point per step. Ends after
/// `max_steps` points, on well contact, or once the path leaves the arena
/// margin. Clone it to replay the path from the start.
pub fn predict_path<'a>(
    launch: Launch,
    guidance: Option<PreviewGuidance>,
    wells: &'a [WellSnapshot],
    params: &TrajectoryParams,
    arena: (f64, f64),
    max_steps: usize,
) -> PredictedPath<'a> {
    PredictedPath {
        probe: Probe::new(launch, wells, params.gravity_constant),
        guidance,
        time_alive: 0.0,
        time_step_ms: params.time_step_ms,
        arena,
        remaining: max_steps,
        finished: false,
    }
}

#[derive(Debug, Clone)]
pub struct PredictedPath<'a> {
    probe: Probe<'a>,
    guidance: Option<PreviewGuidance>,
    time_alive: f64,
    time_step_ms: f64,
    arena: (f64, f64),
    remaining: usize,
    finished: bool,
}

impl PredictedPath<'_> {
    fn outside_arena(&self) -> bool {
        let m = PROJECTILE_BOUNDS_MARGIN;
        let (w, h) = self.arena;
        let p = self.probe.position;
        p.x < -m || p.x > w + m || p.y < -m || p.y > h + m
    }
}

impl Iterator for PredictedPath<'_> {
    type Item = Vector2D;

    fn next(&mut self) -> Option<Vector2D> {
        if self.finished || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.probe.position;

        if self.outside_arena() || !self.probe.gravitate(0.0, self.time_step_ms) {
            self.finished = true;
            return Some(current);
        }
        let thrust = self.guidance.and_then(|g| {
            g.direction(self.probe.position, self.probe.velocity, self.time_alive)
                .map(|dir| (dir, g.thrust_force))
        });
        if let Some((direction, force)) = thrust {
            self.probe.thrust(direction, force, self.time_step_ms);
        }
        self.probe.advance(self.time_step_ms);
        self.time_alive += self.time_step_ms;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

//! Simulation constants and tuning parameters.
//!
//! Time values are milliseconds, distances are arena units, velocities are
//! units per second.

// --- Arena ---

/// Default arena width.
pub const ARENA_WIDTH: f64 = 1200.0;

/// Default arena height.
pub const ARENA_HEIGHT: f64 = 800.0;

/// Projectiles further than this outside the arena are destroyed.
pub const PROJECTILE_BOUNDS_MARGIN: f64 = 50.0;

/// Largest tick delta the engine accepts (one 60 Hz frame).
pub const MAX_TICK_DELTA_MS: f64 = 16.67;

// --- Gravity ---

/// Global gravitational constant.
pub const GRAVITY_CONSTANT: f64 = 6000.0;

/// Gravity is not applied within `well.radius + GRAVITY_DEAD_ZONE`.
pub const GRAVITY_DEAD_ZONE: f64 = 5.0;

/// Well mass law: `mass = radius² × WELL_MASS_FACTOR`.
pub const WELL_MASS_FACTOR: f64 = 0.1;

/// Restitution applied to well-vs-well bounces.
pub const WELL_RESTITUTION: f64 = 0.8;

// --- Wells (round generation) ---

/// Number of wells attempted per round.
pub const WELL_COUNT: usize = 40;

/// Placement attempts per well before giving up on it.
pub const WELL_PLACEMENT_ATTEMPTS: u32 = 50;

/// Minimum surface gap between generated wells.
pub const WELL_MIN_SPACING: f64 = 10.0;

/// Horizontal keep-out from each side wall (craft live there).
pub const WELL_SPAWN_MARGIN_X: f64 = 150.0;

/// Vertical keep-out from the top and bottom walls.
pub const WELL_SPAWN_MARGIN_Y: f64 = 30.0;

/// Initial drift speed range per axis (uniform in ±half of this).
pub const WELL_DRIFT_RANGE: f64 = 15.5;

// --- Craft ---

pub const CRAFT_RADIUS: f64 = 15.0;
pub const CRAFT_MASS: f64 = 100.0;

/// Distance of each craft from its side wall at round start.
pub const CRAFT_WALL_OFFSET: f64 = 50.0;

/// Upper clamp on aim power.
pub const CRAFT_MAX_POWER: f64 = 500.0;

/// Launch speed never drops below this.
pub const MIN_LAUNCH_SPEED: f64 = 50.0;

/// Extra spawn distance beyond the craft radius along the aim line.
pub const MUZZLE_OFFSET: f64 = 20.0;

pub const STARTING_BULLETS: u32 = 10;
pub const STARTING_MISSILES: u32 = 5;
pub const STARTING_DELAYED_MISSILES: u32 = 3;
pub const STARTING_BURST_MISSILES: u32 = 2;

// --- Projectiles ---

pub const BULLET_RADIUS: f64 = 2.0;
pub const BULLET_MASS: f64 = 10.0;
pub const BULLET_TRAIL_LENGTH: usize = 20;

pub const MISSILE_RADIUS: f64 = 2.0;
pub const DELAYED_MISSILE_RADIUS: f64 = 4.0;
pub const MISSILE_MASS: f64 = 15.0;
pub const MISSILE_TRAIL_LENGTH: usize = 30;

/// Thrust acceleration of every homing variant (units/s²).
pub const MISSILE_THRUST_FORCE: f64 = 100.0;

/// Total thrust budget of every homing variant.
pub const MISSILE_THRUST_TIME_MS: f64 = 2000.0;

/// Dead period before a delayed missile may thrust.
pub const DELAYED_MISSILE_DELAY_MS: f64 = 2000.0;

/// Burst missile thrust windows `[start, end)`.
pub const BURST_WINDOWS_MS: [(f64, f64); 2] = [(0.0, 1000.0), (3000.0, 4000.0)];

/// Minimum lifetime between two planner invocations of one projectile.
pub const HOMING_RECALC_INTERVAL_MS: f64 = 100.0;

// --- Trajectory evaluation ---

pub const TRAJECTORY_TIME_STEP_MS: f64 = 20.0;
pub const TRAJECTORY_MAX_TIME_MS: f64 = 3000.0;

/// A simulated path within `well.radius + WELL_IMPACT_BUFFER` is a hit.
pub const WELL_IMPACT_BUFFER: f64 = 3.0;

/// Clearance below which a grazing penalty is charged.
pub const GRAZE_CLEARANCE: f64 = 10.0;

/// Penalty per unit of clearance below `GRAZE_CLEARANCE`.
pub const GRAZE_PENALTY_PER_UNIT: f64 = 10.0;

/// Divergence cutoff: stop once distance exceeds this multiple of the best.
pub const DIVERGENCE_FACTOR: f64 = 2.0;

/// Divergence cutoff only fires this long after the closest approach.
pub const DIVERGENCE_GRACE_MS: f64 = 500.0;

/// Preview paths stop after this many integration steps.
pub const PREVIEW_MAX_STEPS: usize = 500;

/// Share of the to-target direction blended into previewed homing thrust.
pub const PREVIEW_HOMING_BLEND: f64 = 0.3;

// --- Homing planner ---

/// Thrust budget at or above which three phases are planned.
pub const THREE_PHASE_MIN_REMAINING_MS: f64 = 600.0;

/// Thrust budget at or above which two phases are planned.
pub const TWO_PHASE_MIN_REMAINING_MS: f64 = 300.0;

/// Full sampling arc around the velocity heading (270°).
pub const FULL_THRUST_ARC: f64 = std::f64::consts::PI * 1.5;

pub const SINGLE_PHASE_SAMPLES: usize = 16;

/// Refinement arc for the single-phase search (total width, ±22.5°).
pub const SINGLE_PHASE_REFINE_ARC: f64 = std::f64::consts::FRAC_PI_4;

pub const SINGLE_PHASE_REFINE_SAMPLES: usize = 8;

/// Refinement only runs when the coarse best beats baseline × this.
pub const SINGLE_PHASE_REFINE_THRESHOLD: f64 = 0.9;

/// Single-phase thrust is adopted only below baseline × this.
pub const SINGLE_PHASE_ACCEPT_THRESHOLD: f64 = 0.95;

pub const MULTI_PHASE_FIRST_SAMPLES: usize = 12;
pub const MULTI_PHASE_SECOND_SAMPLES: usize = 6;
pub const MULTI_PHASE_THIRD_SAMPLES: usize = 4;

/// Half-width of the follow-up phase arcs (±45°).
pub const MULTI_PHASE_FOLLOW_ARC: f64 = std::f64::consts::FRAC_PI_4;

/// Multi-phase plans are adopted only below baseline × this.
pub const MULTI_PHASE_ACCEPT_THRESHOLD: f64 = 0.95;

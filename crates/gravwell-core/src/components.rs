//! ECS components for hecs entities.
//!
//! Every simulated body carries a `Body` plus exactly one of `Well`, `Craft`
//! or `Projectile`. Game logic lives in systems; methods here only guard
//! the component's own invariants.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::WeaponKind;
use crate::error::BodyError;
use crate::homing::HomingResult;
use crate::timing::TimingPolicy;
use crate::types::{PlayerId, Vector2D};

/// Kinematic state shared by all bodies. Only constructible through
/// `Body::new`, so radius and mass are always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Body {
    pub position: Vector2D,
    /// Units per second.
    pub velocity: Vector2D,
    radius: f64,
    mass: f64,
    /// Set on destruction; the cleanup system despawns flagged bodies.
    pub destroyed: bool,
}

impl Body {
    /// Build a body, rejecting parameters that would poison the physics with NaN.
    pub fn new(
        position: Vector2D,
        velocity: Vector2D,
        radius: f64,
        mass: f64,
    ) -> Result<Self, BodyError> {
        if !position.is_finite() {
            return Err(BodyError::NonFinite { field: "position" });
        }
        if !velocity.is_finite() {
            return Err(BodyError::NonFinite { field: "velocity" });
        }
        if !radius.is_finite() {
            return Err(BodyError::NonFinite { field: "radius" });
        }
        if !mass.is_finite() {
            return Err(BodyError::NonFinite { field: "mass" });
        }
        if radius <= 0.0 {
            return Err(BodyError::NonPositiveRadius { radius });
        }
        if mass <= 0.0 {
            return Err(BodyError::NonPositiveMass { mass });
        }
        Ok(Self {
            position,
            velocity,
            radius,
            mass,
            destroyed: false,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Euler step: position += velocity × dt.
    pub fn integrate(&mut self, dt_ms: f64) {
        if self.destroyed {
            return;
        }
        self.position += self.velocity * (dt_ms / 1000.0);
    }

    /// Circle overlap test. Destroyed bodies never collide.
    pub fn overlaps(&self, other: &Body) -> bool {
        if self.destroyed || other.destroyed {
            return false;
        }
        self.position.distance(&other.position) < self.radius + other.radius
    }
}

/// Marks a body as a gravity well. Its mass follows `radius² × WELL_MASS_FACTOR`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Well;

impl Well {
    pub fn mass_for_radius(radius: f64) -> f64 {
        radius * radius * WELL_MASS_FACTOR
    }

    /// Body for a well of `radius` at `position`, mass derived from the radius.
    pub fn body(position: Vector2D, velocity: Vector2D, radius: f64) -> Result<Body, BodyError> {
        Body::new(position, velocity, radius, Self::mass_for_radius(radius))
    }
}

/// Per-weapon ammunition counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ammo {
    pub bullets: u32,
    pub missiles: u32,
    pub delayed_missiles: u32,
    pub burst_missiles: u32,
}

impl Default for Ammo {
    fn default() -> Self {
        Self {
            bullets: STARTING_BULLETS,
            missiles: STARTING_MISSILES,
            delayed_missiles: STARTING_DELAYED_MISSILES,
            burst_missiles: STARTING_BURST_MISSILES,
        }
    }
}

impl Ammo {
    pub fn get(&self, weapon: WeaponKind) -> u32 {
        match weapon {
            WeaponKind::Ballistic => self.bullets,
            WeaponKind::StandardHoming => self.missiles,
            WeaponKind::DelayedHoming => self.delayed_missiles,
            WeaponKind::BurstHoming => self.burst_missiles,
        }
    }

    fn get_mut(&mut self, weapon: WeaponKind) -> &mut u32 {
        match weapon {
            WeaponKind::Ballistic => &mut self.bullets,
            WeaponKind::StandardHoming => &mut self.missiles,
            WeaponKind::DelayedHoming => &mut self.delayed_missiles,
            WeaponKind::BurstHoming => &mut self.burst_missiles,
        }
    }
}

/// Player-controlled craft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craft {
    pub player: PlayerId,
    pub ammo: Ammo,
    /// Radians, atan2 convention.
    pub aim_angle: f64,
    /// Launch speed request, clamped to `CRAFT_MAX_POWER`.
    pub aim_power: f64,
    pub weapon: WeaponKind,
}

impl Craft {
    pub fn new(player: PlayerId, aim_angle: f64) -> Self {
        Self {
            player,
            ammo: Ammo::default(),
            aim_angle,
            aim_power: 0.0,
            weapon: WeaponKind::default(),
        }
    }

    pub fn body(position: Vector2D) -> Result<Body, BodyError> {
        Body::new(position, Vector2D::ZERO, CRAFT_RADIUS, CRAFT_MASS)
    }

    /// Update the aim. Power is clamped to `[0, CRAFT_MAX_POWER]`. A
    /// non-finite angle or NaN power leaves the aim untouched and returns false.
    pub fn set_aim(&mut self, angle: f64, power: f64) -> bool {
        if !angle.is_finite() || power.is_nan() {
            return false;
        }
        self.aim_angle = angle;
        self.aim_power = power.clamp(0.0, CRAFT_MAX_POWER);
        true
    }

    pub fn select_weapon(&mut self, weapon: WeaponKind) {
        self.weapon = weapon;
    }

    pub fn can_fire(&self) -> bool {
        self.ammo.get(self.weapon) > 0
    }

    /// Spend one round of the selected weapon. Returns false (and spends
    /// nothing) when the counter is already empty.
    pub fn consume_ammo(&mut self) -> bool {
        let counter = self.ammo.get_mut(self.weapon);
        if *counter == 0 {
            return false;
        }
        *counter -= 1;
        true
    }
}

/// Bounded history of past positions, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Vector2D>,
    max_len: usize,
}

impl Trail {
    pub fn new(max_len: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    pub fn push(&mut self, point: Vector2D) {
        if self.max_len == 0 {
            return;
        }
        if self.points.len() == self.max_len {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &Vector2D> {
        self.points.iter()
    }
}

/// Guidance state of a homing projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guidance {
    /// Player whose craft is being hunted. `None` if nobody was alive at launch.
    pub target: Option<PlayerId>,
    pub policy: TimingPolicy,
    /// Thrust acceleration, units/s².
    pub thrust_force: f64,
    pub recalc_interval_ms: f64,
    /// Lifetime at the last planner invocation.
    pub last_calculation_ms: Option<f64>,
    /// Last planner output, kept for diagnostics and reused between invocations.
    pub last_result: Option<HomingResult>,
}

impl Guidance {
    pub fn new(target: Option<PlayerId>, policy: TimingPolicy) -> Self {
        Self {
            target,
            policy,
            thrust_force: MISSILE_THRUST_FORCE,
            recalc_interval_ms: HOMING_RECALC_INTERVAL_MS,
            last_calculation_ms: None,
            last_result: None,
        }
    }

    /// Whether the planner should run at `time_alive`.
    pub fn recalculation_due(&self, time_alive: f64) -> bool {
        match self.last_calculation_ms {
            None => true,
            Some(last) => time_alive - last >= self.recalc_interval_ms,
        }
    }

    /// Direction chosen at the last invocation, if any.
    pub fn current_thrust(&self) -> Option<Vector2D> {
        self.last_result.as_ref().and_then(|r| r.thrust)
    }
}

/// A fired projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: PlayerId,
    pub weapon: WeaponKind,
    pub trail: Trail,
    /// Lifetime in ms.
    pub time_alive: f64,
    /// Present for homing variants only.
    pub guidance: Option<Guidance>,
}

impl Projectile {
    /// Projectile state for `weapon` fired by `owner` at `target`.
    pub fn new(owner: PlayerId, weapon: WeaponKind, target: Option<PlayerId>) -> Self {
        let trail_len = if weapon.is_homing() {
            MISSILE_TRAIL_LENGTH
        } else {
            BULLET_TRAIL_LENGTH
        };
        Self {
            owner,
            weapon,
            trail: Trail::new(trail_len),
            time_alive: 0.0,
            guidance: TimingPolicy::for_weapon(weapon).map(|policy| Guidance::new(target, policy)),
        }
    }

    /// Body for a projectile of `weapon`.
    pub fn body(
        weapon: WeaponKind,
        position: Vector2D,
        velocity: Vector2D,
    ) -> Result<Body, BodyError> {
        let (radius, mass) = match weapon {
            WeaponKind::Ballistic => (BULLET_RADIUS, BULLET_MASS),
            WeaponKind::StandardHoming | WeaponKind::BurstHoming => (MISSILE_RADIUS, MISSILE_MASS),
            WeaponKind::DelayedHoming => (DELAYED_MISSILE_RADIUS, MISSILE_MASS),
        };
        Body::new(position, velocity, radius, mass)
    }
}

/// Monotonic spawn order; reproduces the container's stable iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Serial(pub u64);

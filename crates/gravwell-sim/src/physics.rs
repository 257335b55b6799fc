//! Gravity and collision math on plain bodies.
//!
//! Nothing here touches the ECS world. Systems gather bodies into slices,
//! call these functions, and write the results back.

use log::debug;

use gravwell_core::components::Body;
use gravwell_core::constants::{GRAVITY_DEAD_ZONE, PROJECTILE_BOUNDS_MARGIN};
use gravwell_core::enums::{BodyKind, ImpactKind};
use gravwell_core::events::SimEvent;
use gravwell_core::homing::WellSnapshot;
use gravwell_core::types::Vector2D;

/// Velocity change one well imparts on a body at `position` over `dt_ms`.
///
/// Zero inside the `radius + GRAVITY_DEAD_ZONE` buffer.
pub fn gravity_impulse(
    position: Vector2D,
    well: &WellSnapshot,
    gravity_constant: f64,
    dt_ms: f64,
) -> Vector2D {
    let distance = position.distance(&well.position);
    if distance <= well.radius + GRAVITY_DEAD_ZONE {
        return Vector2D::ZERO;
    }
    let force = gravity_constant * well.mass / (distance * distance);
    let direction = (well.position - position).normalize();
    direction * (force * dt_ms / 1000.0)
}

/// Pull every live body toward every live well. Wells are not moved.
pub fn apply_gravity(bodies: &mut [Body], wells: &[Body], gravity_constant: f64, dt_ms: f64) {
    let wells: Vec<WellSnapshot> = wells
        .iter()
        .filter(|w| !w.destroyed)
        .map(WellSnapshot::from)
        .collect();

    for body in bodies.iter_mut().filter(|b| !b.destroyed) {
        for well in &wells {
            body.velocity += gravity_impulse(body.position, well, gravity_constant, dt_ms);
        }
    }
}

/// A body paired with its kind tag for the all-pairs collision scan.
#[derive(Debug, Clone, Copy)]
pub struct CollisionBody {
    pub body: Body,
    pub kind: BodyKind,
}

/// Resolve every overlapping pair once, in slice order.
///
/// Bodies destroyed earlier in the pass are skipped for later pairs.
pub fn resolve_collisions(bodies: &mut [CollisionBody], restitution: f64) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let n = bodies.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = pair_mut(bodies, i, j);
            if !a.body.overlaps(&b.body) {
                continue;
            }
            resolve_pair(a, b, restitution, &mut events);
        }
    }

    events
}

fn resolve_pair(
    a: &mut CollisionBody,
    b: &mut CollisionBody,
    restitution: f64,
    events: &mut Vec<SimEvent>,
) {
    match (a.kind, b.kind) {
        (BodyKind::Well, BodyKind::Well) => {
            if elastic_bounce(&mut a.body, &mut b.body, restitution) {
                let midpoint = (a.body.position + b.body.position) * 0.5;
                events.push(SimEvent::WellBounce { position: midpoint });
            }
        }
        (BodyKind::Projectile { owner }, BodyKind::Craft { player })
        | (BodyKind::Craft { player }, BodyKind::Projectile { owner })
            if owner == player => {}
        (ka, kb) if ka.is_projectile() || kb.is_projectile() => {
            if ka.is_projectile() {
                destroy(a, Some(impact_kind(kb)), events);
            } else if !ka.is_well() {
                destroy(a, None, events);
            }
            if kb.is_projectile() {
                destroy(b, Some(impact_kind(ka)), events);
            } else if !kb.is_well() {
                destroy(b, None, events);
            }
        }
        (ka, kb) => {
            if !ka.is_well() {
                destroy(a, None, events);
            }
            if !kb.is_well() {
                destroy(b, None, events);
            }
        }
    }
}

fn impact_kind(other: BodyKind) -> ImpactKind {
    match other {
        BodyKind::Well => ImpactKind::Well,
        BodyKind::Craft { .. } => ImpactKind::Craft,
        BodyKind::Projectile { .. } => ImpactKind::Projectile,
    }
}

fn destroy(target: &mut CollisionBody, hit: Option<ImpactKind>, events: &mut Vec<SimEvent>) {
    target.body.destroyed = true;
    let position = target.body.position;
    match target.kind {
        BodyKind::Projectile { owner } => {
            let hit = hit.unwrap_or(ImpactKind::Projectile);
            debug!("{owner} projectile destroyed on {hit:?} at {position:?}");
            events.push(SimEvent::ProjectileImpact {
                owner,
                hit,
                position,
            });
        }
        BodyKind::Craft { player } => {
            debug!("{player} craft destroyed at {position:?}");
            events.push(SimEvent::CraftDestroyed { player, position });
        }
        BodyKind::Well => {}
    }
}

/// Elastic bounce between two overlapping bodies. Returns false (and changes
/// nothing) when they are already separating.
pub fn elastic_bounce(a: &mut Body, b: &mut Body, restitution: f64) -> bool {
    let offset = b.position - a.position;
    let distance = offset.magnitude();
    let normal = if distance > 0.0 {
        offset * (1.0 / distance)
    } else {
        Vector2D::new(1.0, 0.0)
    };

    let closing = (b.velocity - a.velocity).dot(&normal);
    if closing > 0.0 {
        return false;
    }

    let inv_a = 1.0 / a.mass();
    let inv_b = 1.0 / b.mass();
    let impulse = -(1.0 + restitution) * closing / (inv_a + inv_b);
    a.velocity -= normal * (impulse * inv_a);
    b.velocity += normal * (impulse * inv_b);

    let overlap = a.radius() + b.radius() - distance;
    if overlap > 0.0 {
        let push = normal * (overlap / 2.0);
        a.position -= push;
        b.position += push;
    }
    true
}

/// Arena boundary handling. Projectiles beyond the margin are flagged
/// destroyed (returns true); wells are clamped inside with the outward
/// velocity component reflected. Craft are left alone.
pub fn check_bounds(body: &mut Body, kind: BodyKind, width: f64, height: f64) -> bool {
    if body.destroyed {
        return false;
    }
    match kind {
        BodyKind::Projectile { .. } => {
            let m = PROJECTILE_BOUNDS_MARGIN;
            let p = body.position;
            if p.x < -m || p.x > width + m || p.y < -m || p.y > height + m {
                body.destroyed = true;
                return true;
            }
            false
        }
        BodyKind::Well => {
            let r = body.radius();
            if body.position.x < r {
                body.position.x = r;
                body.velocity.x = body.velocity.x.abs();
            } else if body.position.x > width - r {
                body.position.x = width - r;
                body.velocity.x = -body.velocity.x.abs();
            }
            if body.position.y < r {
                body.position.y = r;
                body.velocity.y = body.velocity.y.abs();
            } else if body.position.y > height - r {
                body.position.y = height - r;
                body.velocity.y = -body.velocity.y.abs();
            }
            false
        }
        BodyKind::Craft { .. } => false,
    }
}

/// Two distinct mutable elements of a slice. Requires `i < j`.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

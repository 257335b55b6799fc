//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::types::PlayerId;

/// Weapon selected on a craft; also identifies the projectile variant it fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Unguided shot, gravity only.
    #[default]
    Ballistic,
    /// Homing missile that may thrust from launch.
    StandardHoming,
    /// Homing missile that coasts through a dead period before thrusting.
    DelayedHoming,
    /// Homing missile with two fixed thrust windows.
    BurstHoming,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Ballistic,
        WeaponKind::StandardHoming,
        WeaponKind::DelayedHoming,
        WeaponKind::BurstHoming,
    ];

    pub fn is_homing(self) -> bool {
        !matches!(self, WeaponKind::Ballistic)
    }
}

/// Closed set of simulated body kinds. Collision response and gravity
/// participation are dispatched on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BodyKind {
    /// Gravity-emitting hazard.
    Well,
    /// Player-controlled craft.
    Craft { player: PlayerId },
    /// Any projectile variant, tagged with the player who fired it.
    Projectile { owner: PlayerId },
}

impl BodyKind {
    pub fn is_well(self) -> bool {
        matches!(self, BodyKind::Well)
    }

    pub fn is_projectile(self) -> bool {
        matches!(self, BodyKind::Projectile { .. })
    }
}

/// What a destroyed projectile ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactKind {
    Craft,
    Well,
    Projectile,
}

/// Top-level round state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoundPhase {
    #[default]
    Active,
    /// Round finished. `winner` is `None` when both craft died together.
    Over { winner: Option<PlayerId> },
}

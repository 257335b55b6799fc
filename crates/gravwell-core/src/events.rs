//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::{ImpactKind, WeaponKind};
use crate::types::{PlayerId, Vector2D};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A projectile left the muzzle.
    Fired {
        player: PlayerId,
        weapon: WeaponKind,
        position: Vector2D,
    },
    /// Fire command refused: empty magazine, bad aim, dead craft or round over.
    /// `weapon` is `None` when the player has no craft left.
    FireRefused {
        player: PlayerId,
        weapon: Option<WeaponKind>,
    },
    /// A projectile was destroyed by contact.
    ProjectileImpact {
        owner: PlayerId,
        hit: ImpactKind,
        position: Vector2D,
    },
    /// A projectile drifted out of the arena margin.
    ProjectileLeftArena { owner: PlayerId },
    /// Two wells bounced off each other.
    WellBounce { position: Vector2D },
    CraftDestroyed { player: PlayerId, position: Vector2D },
    /// `winner` is `None` on a draw.
    RoundOver { winner: Option<PlayerId> },
}

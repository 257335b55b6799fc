//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::WeaponKind;
use crate::types::PlayerId;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Point the craft and set the launch power (clamped to the craft maximum).
    SetAim {
        player: PlayerId,
        angle: f64,
        power: f64,
    },
    /// Switch the selected weapon.
    SelectWeapon { player: PlayerId, weapon: WeaponKind },
    /// Fire the selected weapon along the current aim.
    Fire { player: PlayerId },
    /// Tear down the arena and generate a fresh round.
    ResetRound,
}

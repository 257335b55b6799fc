//! Thrust timing policies for homing projectiles.
//!
//! A policy is a pure function of the projectile's lifetime. Windows are
//! driven only by `time_alive` crossing fixed thresholds.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::WeaponKind;

/// Timing rule of one homing variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimingPolicy {
    /// Thrust allowed while `time_alive < total_thrust_ms`.
    Standard { total_thrust_ms: f64 },
    /// Thrust allowed in `(delay_ms, delay_ms + total_thrust_ms]`.
    Delayed { delay_ms: f64, total_thrust_ms: f64 },
    /// Thrust allowed inside each `[start, end)` window.
    Burst {
        windows: [(f64, f64); 2],
        total_thrust_ms: f64,
    },
}

/// Answer of a policy for one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrustWindow {
    /// Whether thrust may be applied right now.
    pub allowed: bool,
    /// Thrust time still available, in ms.
    pub remaining_ms: f64,
}

impl ThrustWindow {
    pub const CLOSED: ThrustWindow = ThrustWindow {
        allowed: false,
        remaining_ms: 0.0,
    };
}

/// Thrust availability state, for display and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ThrustState {
    /// Not thrusting: before, between or after windows.
    Idle,
    /// Waiting out a delay period.
    Delayed,
    /// Inside thrust window `window` (0-based).
    Thrusting { window: u8 },
}

impl TimingPolicy {
    /// Policy carried by projectiles fired with `weapon`, or `None` for ballistic.
    pub fn for_weapon(weapon: WeaponKind) -> Option<Self> {
        match weapon {
            WeaponKind::Ballistic => None,
            WeaponKind::StandardHoming => Some(Self::Standard {
                total_thrust_ms: MISSILE_THRUST_TIME_MS,
            }),
            WeaponKind::DelayedHoming => Some(Self::Delayed {
                delay_ms: DELAYED_MISSILE_DELAY_MS,
                total_thrust_ms: MISSILE_THRUST_TIME_MS,
            }),
            WeaponKind::BurstHoming => Some(Self::Burst {
                windows: BURST_WINDOWS_MS,
                total_thrust_ms: MISSILE_THRUST_TIME_MS,
            }),
        }
    }

    /// Whether thrust is allowed at `time_alive` and how much budget is left.
    pub fn window(&self, time_alive: f64) -> ThrustWindow {
        match *self {
            Self::Standard { total_thrust_ms } => ThrustWindow {
                allowed: time_alive < total_thrust_ms,
                remaining_ms: (total_thrust_ms - time_alive).max(0.0),
            },
            Self::Delayed {
                delay_ms,
                total_thrust_ms,
            } => {
                let allowed = time_alive > delay_ms && time_alive <= delay_ms + total_thrust_ms;
                let remaining_ms = if time_alive <= delay_ms {
                    0.0
                } else {
                    (total_thrust_ms - (time_alive - delay_ms)).max(0.0)
                };
                ThrustWindow {
                    allowed,
                    remaining_ms,
                }
            }
            Self::Burst {
                windows,
                total_thrust_ms,
            } => {
                let allowed = windows
                    .iter()
                    .any(|&(start, end)| time_alive >= start && time_alive < end);
                let unused: f64 = windows
                    .iter()
                    .filter(|&&(_, end)| end > time_alive)
                    .map(|&(start, end)| end - start.max(time_alive))
                    .sum();
                ThrustWindow {
                    allowed,
                    remaining_ms: unused.min(total_thrust_ms),
                }
            }
        }
    }

    pub fn state(&self, time_alive: f64) -> ThrustState {
        match *self {
            Self::Standard { .. } => {
                if self.window(time_alive).allowed {
                    ThrustState::Thrusting { window: 0 }
                } else {
                    ThrustState::Idle
                }
            }
            Self::Delayed { delay_ms, .. } => {
                if time_alive <= delay_ms {
                    ThrustState::Delayed
                } else if self.window(time_alive).allowed {
                    ThrustState::Thrusting { window: 0 }
                } else {
                    ThrustState::Idle
                }
            }
            Self::Burst { windows, .. } => windows
                .iter()
                .position(|&(start, end)| time_alive >= start && time_alive < end)
                .map_or(ThrustState::Idle, |i| ThrustState::Thrusting { window: i as u8 }),
        }
    }
}

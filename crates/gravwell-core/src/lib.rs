//! Core types and definitions for the gravity-well duel simulation.
//!
//! This crate defines the vocabulary shared across the workspace:
//! vectors, body components, timing policies, planner data, commands,
//! events, snapshots, configuration and constants. It has no dependency
//! on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod homing;
pub mod state;
pub mod timing;
pub mod types;

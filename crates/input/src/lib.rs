//! Input mapping: per-frame keyboard snapshots turned into drive actions.
//!
//! # Invariants
//! - The core only reads snapshots; polling and key events live outside.
//! - Steering consumes actions, never raw keys.

mod action;
mod controller;

pub use action::{DriveAction, KeyboardState};
pub use controller::{ControllerConfig, TankController};

//! Procedural per-frame motion that writes into transform nodes.
//!
//! # Invariants
//! - Every animator owns its own phase; nothing is shared between instances.
//! - Increments are per reference frame and scaled by the caller's `FrameStep`.
//! - Animators only touch local fields; world matrices stay the graph's job.

mod motion;
mod orbit;

pub use motion::{Oscillator, OscillatorConfig, Spinner, SpinnerConfig};
pub use orbit::{
    Direction, OrbitAnimator, PhaseAccumulator, RingConfig, RingFormation, orbit_position,
};

//! Cameras: a look-at camera with a perspective lens, and the rigs that move it.
//!
//! # Invariants
//! - View = look-at(eye, reference, up), rebuilt on every update.
//! - Projection uses a fixed vertical field of view; only the aspect follows the viewport.
//! - A follow rig keeps no state of its own between frames beyond its target.

mod camera;
mod rig;

pub use camera::{Camera, Lens, Viewport};
pub use rig::{CameraRig, FixedRig, FollowRig, FreeFlyRig, RigCamera};

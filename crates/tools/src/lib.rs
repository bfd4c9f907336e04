//! Developer tooling: read-only scene and camera inspector.
//!
//! # Invariants
//! - Inspection never mutates the scene or the camera.

mod inspector;

pub use inspector::{CameraInfo, NodeInfo, SceneInspector, SceneSummary};

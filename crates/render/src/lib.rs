//! Rendering adapter: the boundary where scene and camera matrices leave the core.
//!
//! # Invariants
//! - Renderers read the scene and a frame view; they never mutate either.
//! - Every matrix handed over is computed after all of the frame's mutations.
//!
//! No GPU backend lives here. `UniformCollector` produces the per-draw uniform
//! blocks a backend would upload, and `DebugTextRenderer` prints them.

mod renderer;

pub use renderer::{DebugTextRenderer, DrawCall, DrawUniforms, FrameView, Renderer, UniformCollector};

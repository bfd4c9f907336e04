use glam::Vec3;
use scenecam_common::FrameStep;
use scenecam_scene::{NodeDriver, TransformNode};
use serde::{Deserialize, Serialize};

use crate::orbit::PhaseAccumulator;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorConfig {
    /// Phase advance per reference frame, in radians.
    pub phase_step: f32,
    /// Per-axis swing. X and Y follow the sine of the phase, Z the cosine.
    pub amplitude: Vec3,
    pub center: Vec3,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            phase_step: 0.1,
            amplitude: Vec3::new(1.0, 0.0, 3.0),
            center: Vec3::ZERO,
        }
    }
}

/// Swings a node's translation back and forth around a center point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    config: OscillatorConfig,
    phase: PhaseAccumulator,
}

impl Oscillator {
    pub fn new(config: OscillatorConfig) -> Self {
        Self {
            config,
            phase: PhaseAccumulator::new(config.phase_step),
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase.phase()
    }

    pub fn offset(&self) -> Vec3 {
        let (sin, cos) = self.phase().sin_cos();
        let a = self.config.amplitude;
        self.config.center + Vec3::new(a.x * sin, a.y * sin, a.z * cos)
    }
}

impl NodeDriver for Oscillator {
    fn update(&mut self, node: &mut TransformNode, step: FrameStep) {
        self.phase.advance(step);
        node.set_translation(self.offset());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinnerConfig {
    /// Euler increment per reference frame (pitch, yaw, roll), in radians.
    pub step: Vec3,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            step: Vec3::new(0.2, 0.1, 0.0),
        }
    }
}

/// Adds a constant Euler increment to a node's rotation each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spinner {
    config: SpinnerConfig,
}

impl Spinner {
    pub fn new(config: SpinnerConfig) -> Self {
        Self { config }
    }
}

impl NodeDriver for Spinner {
    fn update(&mut self, node: &mut TransformNode, step: FrameStep) {
        let rotation = node.rotation() + self.config.step * step.frames();
        node.set_rotation(rotation);
    }
}

use glam::{Mat3, Vec3};
use scenecam_common::FrameStep;
use scenecam_scene::{NodeDriver, TransformNode};
use serde::{Deserialize, Serialize};

use crate::action::{DriveAction, KeyboardState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Heading change per reference frame while a turn key is held, in radians.
    pub turn_step: f32,
    /// Distance per reference frame while a move key is held.
    pub move_step: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            turn_step: 0.03,
            move_step: 0.1,
        }
    }
}

/// Tank-style steering: turn keys yaw the node, move keys drive it along
/// its facing direction (local -Z rotated by the heading).
#[derive(Debug, Clone, Default)]
pub struct TankController {
    config: ControllerConfig,
    keys: KeyboardState,
}

impl TankController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            keys: KeyboardState::default(),
        }
    }

    /// Snapshot used by the next update.
    pub fn set_keys(&mut self, keys: KeyboardState) {
        self.keys = keys;
    }

    pub fn keys(&self) -> KeyboardState {
        self.keys
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Facing direction for a heading.
    pub fn facing(heading: f32) -> Vec3 {
        Mat3::from_rotation_y(heading) * Vec3::NEG_Z
    }

    pub fn apply(node: &mut TransformNode, action: DriveAction) {
        match action {
            DriveAction::Turn(delta) => {
                let r = node.rotation();
                node.set_rotation(Vec3::new(r.x, r.y + delta, r.z));
            }
            DriveAction::Advance(distance) => {
                let moved = node.translation() + Self::facing(node.heading()) * distance;
                node.set_translation(moved);
            }
        }
    }
}

impl NodeDriver for TankController {
    fn update(&mut self, node: &mut TransformNode, step: FrameStep) {
        let actions = self.keys.actions(
            step.scale(self.config.turn_step),
            step.scale(self.config.move_step),
        );
        for action in actions {
            Self::apply(node, action);
        }
        if self.keys.any() {
            let p = node.translation();
            tracing::trace!(p.x, p.z, heading = node.heading(), "steered");
        }
    }
}

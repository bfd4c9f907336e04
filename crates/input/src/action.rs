/// Snapshot of the steering keys for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardState {
    /// W
    pub forward: bool,
    /// S
    pub backward: bool,
    /// A
    pub turn_left: bool,
    /// D
    pub turn_right: bool,
}

impl KeyboardState {
    /// Build a snapshot from held key letters, e.g. `"wa"`. Unknown characters are ignored.
    pub fn from_keys(keys: &str) -> Self {
        let mut state = Self::default();
        for c in keys.chars() {
            match c.to_ascii_lowercase() {
                'w' => state.forward = true,
                's' => state.backward = true,
                'a' => state.turn_left = true,
                'd' => state.turn_right = true,
                _ => {}
            }
        }
        state
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.turn_left || self.turn_right
    }

    /// Actions for this snapshot, turns first so movement uses the new heading.
    pub fn actions(&self, turn_step: f32, move_step: f32) -> Vec<DriveAction> {
        let mut actions = Vec::new();
        if self.turn_left {
            actions.push(DriveAction::Turn(turn_step));
        }
        if self.turn_right {
            actions.push(DriveAction::Turn(-turn_step));
        }
        if self.forward {
            actions.push(DriveAction::Advance(move_step));
        }
        if self.backward {
            actions.push(DriveAction::Advance(-move_step));
        }
        actions
    }
}

/// A steering action applied to a heading-driven node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveAction {
    /// Add to the heading (yaw), in radians. Positive turns left.
    Turn(f32),
    /// Move along the current facing direction. Positive moves forward.
    Advance(f32),
}
